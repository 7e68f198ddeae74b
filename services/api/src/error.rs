//! Custom error types for the API service
//!
//! Authentication (401), authorization (403), not-found (404), and
//! validation (422) failures are reported precisely; everything else
//! collapses to a generic 500 so internals never leak to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to human-readable message mapping for validation failures
pub type FieldErrors = BTreeMap<String, String>;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// No or invalid session on an authenticated route
    #[error("Unauthorized")]
    Unauthorized,

    /// No or invalid session on an admin route
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Valid session but insufficient role
    #[error("Unauthorized: Admin access required")]
    Forbidden,

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Per-field constraint violations
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Malformed request (e.g., missing upload file)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Store or object-storage operation failed unexpectedly
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Bare 401, matching the authenticated gate's contract.
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            ApiError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Authentication required"})),
            )
                .into_response(),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Unauthorized: Admin access required"})),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({"error": message}))).into_response()
            }
            // The 422 body is the flat field-to-message map itself.
            ApiError::Validation(fields) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(fields)).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response(),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
