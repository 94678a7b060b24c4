//! Custom error types for the booking service
//!
//! Every failure surfaced to a caller goes through `ApiError`, which maps
//! the domain taxonomy onto an HTTP status and a structured JSON body.
//! Store-level failures are translated here and never leaked raw.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;

/// Custom error type for the booking service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Referenced entity absent (room, reservation, user)
    #[error("{0}")]
    NotFound(String),

    /// Duplicate entity, e.g. registering an email twice
    #[error("{0}")]
    AlreadyExists(String),

    /// Bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Invalid, expired or revoked token; ownership mismatch
    #[error("{0}")]
    Forbidden(String),

    /// Reservation window collides with an existing reservation
    #[error("{0}")]
    Conflict(String),

    /// Dangling foreign key, e.g. a room id that does not exist
    #[error("{0}")]
    InvalidReference(String),

    /// Malformed input (non-positive capacity, inverted window, ...)
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidReference(_) | ApiError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Database(_) | ApiError::InternalServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // Constraint violations carry domain meaning; everything else
            // stays a store failure.
            match db_err.code().as_deref() {
                Some("23505") => {
                    return ApiError::AlreadyExists("Registro já existente".to_string());
                }
                Some("23503") => {
                    return ApiError::InvalidReference(
                        "Referência a um registro inexistente".to_string(),
                    );
                }
                _ => {}
            }
        }

        ApiError::Database(DatabaseError::Query(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            ApiError::Database(e) => {
                tracing::error!("Database failure: {}", e);
                "Internal server error".to_string()
            }
            ApiError::InternalServerError => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
