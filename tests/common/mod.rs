#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    middleware::Logger,
    test, web, App, Error,
};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};

use todo_api::{
    auth::Credentials,
    config::AuthConfig,
    cors::cors_policy,
    repository::{InMemoryTaskRepository, InMemoryUserRepository},
    routes,
    state::AppState,
};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";

/// State backed by in-memory repositories and the cheapest bcrypt cost.
pub fn test_state() -> AppState {
    let auth = AuthConfig::new(TEST_SECRET, Algorithm::HS256, Duration::hours(24), 4)
        .expect("valid test auth config");
    let credentials = Credentials::new(&auth).expect("credentials");
    AppState::new(
        Arc::new(InMemoryUserRepository::default()),
        Arc::new(InMemoryTaskRepository::default()),
        credentials,
    )
}

/// Builds the full application the same way `main` does.
pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let origins = vec!["http://localhost:3000".to_string()];
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .app_data(routes::path_config())
            .wrap(cors_policy(&origins))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

/// Sends a request and returns the status, the `WWW-Authenticate` header and
/// the JSON body (`Null` when the body is empty).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Option<String>, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let challenge = resp
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("non-JSON body: {}", String::from_utf8_lossy(&body))
        })
    };
    (status, challenge, json)
}

/// Signs up `email` and returns `(user_id, token)`.
pub async fn signup<S, B>(app: &S, email: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let (status, _, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

    (
        body["id"].as_str().expect("id").to_string(),
        body["token"].as_str().expect("token").to_string(),
    )
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
