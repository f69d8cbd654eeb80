//! Router for the chat API

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Relay a single prompt to the model and return its reply. Nothing
/// from earlier requests is sent along with it.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let prompt = payload.message.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest(String::from("Message is empty")));
    }

    let reply = state.client.send(prompt).await?;

    Ok(Json(reply.into()))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
