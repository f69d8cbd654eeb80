//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::chat::FAILURE_MESSAGE;
use crate::gemini::ChatError;

// Errors

pub enum ApiError {
    BadRequest(String),
    Upstream(ChatError),
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Upstream(e) => {
                // The client already logged the failure. Callers get
                // the same message no matter what went wrong.
                tracing::debug!("Responding with bad gateway: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": FAILURE_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

/// Enables using `?` on a chat reply inside a handler
impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyPrompt => Self::BadRequest(err.to_string()),
            other => Self::Upstream(other),
        }
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}
