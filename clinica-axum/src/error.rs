use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinica_core::error::{
    AuthError, Error, FieldErrors, SessionError, StorageError, ValidationError,
};
use serde_json::json;
use thiserror::Error;

/// An error as the HTTP API reports it
///
/// Every variant renders as `{"error": <message>, "code": <status>}`;
/// validation failures add a `fields` array.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(ValidationError::Fields(fields)) => ApiError::Validation(fields),
            Error::Validation(e) => ApiError::BadRequest(e.to_string()),
            Error::Auth(AuthError::InvalidCredentials) => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            Error::Auth(AuthError::Forbidden(msg)) => ApiError::Forbidden(msg),
            Error::Session(SessionError::Expired) => {
                ApiError::Unauthorized("Token expired".to_string())
            }
            Error::Session(SessionError::InvalidToken(_)) => {
                ApiError::Unauthorized("Invalid token".to_string())
            }
            Error::Storage(StorageError::NotFound(entity)) => {
                ApiError::NotFound(format!("{entity} not found"))
            }
            Error::Storage(StorageError::Conflict(msg)) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Validation(fields) => json!({
                "error": self.to_string(),
                "code": status.as_u16(),
                "fields": fields,
            }),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                json!({
                    "error": self.to_string(),
                    "code": status.as_u16(),
                })
            }
            _ => json!({
                "error": self.to_string(),
                "code": status.as_u16(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
