use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    web, Error, HttpMessage,
};
use chrono::Utc;
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{debug, error};

use crate::auth::extractors::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Rejects requests without a valid bearer token for an existing account.
///
/// On success the resolved `AuthenticatedUser` is stored in the request
/// extensions for the `AuthenticatedUser` extractor to pick up.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let user = authenticate(&req).await?;
            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req.app_data::<web::Data<AppState>>().cloned().ok_or_else(|| {
        error!("AppState is not registered; refusing authenticated request");
        AppError::InternalServerError("Authentication is not configured".into())
    })?;

    let token = bearer_token(req.headers()).ok_or_else(|| {
        debug!("Missing or malformed Authorization header on {}", req.path());
        AppError::invalid_credentials()
    })?;

    let identity = state.credentials.verify_token(token, Utc::now())?;
    let user_id = identity.to_uuid().ok_or_else(AppError::invalid_credentials)?;

    match state.users.find_by_id(user_id).await? {
        Some(_) => Ok(AuthenticatedUser { user_id, identity }),
        None => {
            debug!("Token subject {} no longer exists", identity);
            Err(AppError::Unauthorized("User not found".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("BEARER  abc ")), Some("abc"));
    }

    #[test]
    fn test_bearer_token_rejects_other_forms() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("abc.def.ghi")), None);
    }
}
