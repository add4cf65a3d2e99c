use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Maps every lower-crate error onto spec.md §7's HTTP contract:
/// Configuration/Environment-shaped failures are the caller's fault (400),
/// anything else reaching the surface is a bug (500). Either way the body
/// is `{"errors": [...]}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    errors: Vec<String>,
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody { errors: vec![self.to_string()] };
        match self {
            ApiError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            ApiError::Internal(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

impl From<common::error::ConfigError> for ApiError {
    fn from(err: common::error::ConfigError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<sessions::SessionError> for ApiError {
    fn from(err: sessions::SessionError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<orchestrator::MigrationError> for ApiError {
    fn from(err: orchestrator::MigrationError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
