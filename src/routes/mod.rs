pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route of the API.
///
/// `/` and `/health` are public, as is `/api/v1/auth`. Everything under
/// `/api/v1/{user_id}/tasks` goes through `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::root).service(health::health).service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .service(auth::signup)
                    .service(auth::signin),
            )
            .service(
                web::scope("/{user_id}/tasks")
                    .wrap(AuthMiddleware)
                    .service(tasks::list_tasks)
                    .service(tasks::create_task)
                    .service(tasks::toggle_task_completion)
                    .service(tasks::get_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            ),
    );
}

/// Malformed JSON bodies become `400` with the `AppError` body shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Unparseable query strings become `400` with the `AppError` body shape.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Path segments that fail to deserialize become `404` with the `AppError` body shape.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _req| {
        AppError::NotFound(err.to_string()).into()
    })
}
