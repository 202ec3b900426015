//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// The core lifecycle and repository types carry no HTTP semantics;
/// this is the only place failure kinds map to status codes.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed client input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown resource identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error, details stay in the logs
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
            "timestamp": Utc::now(),
        }));

        (status, body).into_response()
    }
}
