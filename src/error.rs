//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler or middleware can hit is funnelled into one of its variants,
//! which `actix_web::ResponseError` then renders as a JSON body of the form
//! `{"error": <message>, "code": <machine readable code>}`.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `bcrypt::BcryptError`, `BlockingError` and `InvalidToken` allow the `?` operator
//! to be used directly in handlers.

use actix_web::{
    error::{BlockingError, ResponseError},
    http::{header, StatusCode},
    HttpResponse,
};
use log::error;
use serde_json::json;
use validator::ValidationErrors;

use crate::auth::token::InvalidToken;

/// Message returned for every bearer-token failure, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Authentication failed or is missing (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The caller is authenticated but does not own the resource (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Malformed request or a request that conflicts with existing state (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// The requested resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Failure reported by the database driver (HTTP 500).
    /// The driver message is logged but never sent to the client.
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input failed validation (HTTP 422 Unprocessable Entity).
    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl AppError {
    /// The generic authentication failure used for every token problem.
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized(INVALID_CREDENTIALS.into())
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "AUTHENTICATION_ERROR",
            AppError::Forbidden(_) => "AUTHORIZATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "RESOURCE_NOT_FOUND",
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => "INTERNAL_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    fn client_message(&self) -> &str {
        match self {
            AppError::DatabaseError(_) => "Database error",
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::ValidationError(msg) => msg,
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::DatabaseError(detail) = self {
            error!("Database error: {}", detail);
        }

        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, AppError::Unauthorized(_)) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(json!({
            "error": self.client_message(),
            "code": self.code(),
        }))
    }
}

/// `RowNotFound` becomes `NotFound`, everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<BlockingError> for AppError {
    fn from(_: BlockingError) -> AppError {
        AppError::InternalServerError("Worker pool unavailable".into())
    }
}

impl From<InvalidToken> for AppError {
    fn from(_: InvalidToken) -> AppError {
        AppError::invalid_credentials()
    }
}
