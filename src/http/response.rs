//! Response shaping and error mapping.
//!
//! # Responsibilities
//! - Map handler failures to status codes and JSON error payloads
//! - Keep upstream error detail out of client responses
//!
//! # Design Decisions
//! - Validation messages are surfaced verbatim (400)
//! - Authentication failures carry only "Unauthorized" (401)
//! - Upstream failures carry a short fixed description (500)

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::search::Product;

/// Error surfaced to API callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, empty or malformed input. Raised before any upstream call.
    #[error("{0}")]
    Validation(String),

    /// Missing or rejected credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// An upstream call failed. Holds the public description only; the
    /// detail is logged where the failure happened.
    #[error("{0}")]
    Downstream(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::Validation("Invalid request body".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Error from the search route: same mapping as [`ApiError`], plus the
/// empty `products` placeholder clients render from.
#[derive(Debug)]
pub struct SearchFailure(pub ApiError);

impl From<ApiError> for SearchFailure {
    fn from(e: ApiError) -> Self {
        SearchFailure(e)
    }
}

impl From<JsonRejection> for SearchFailure {
    fn from(rejection: JsonRejection) -> Self {
        SearchFailure(rejection.into())
    }
}

#[derive(Serialize)]
struct SearchFailureBody {
    error: String,
    products: Vec<Product>,
}

impl IntoResponse for SearchFailure {
    fn into_response(self) -> Response {
        let body = SearchFailureBody {
            error: self.0.to_string(),
            products: Vec::new(),
        };
        (self.0.status(), Json(body)).into_response()
    }
}

/// `{ "success": true }`
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn new() -> Self {
        Self { success: true }
    }
}

impl Default for Success {
    fn default() -> Self {
        Self::new()
    }
}
