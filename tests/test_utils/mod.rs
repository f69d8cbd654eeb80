//! Test utilities for integration tests
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body};

use gemchat::api::AppState;
use gemchat::api::app;
use gemchat::gemini::{Backoff, ChatClient};

pub const TEST_MODEL: &str = "test-model";
pub const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

/// Creates a test application router that relays to `api_hostname`,
/// usually a `mockito` server. Backoff is shortened so retries don't
/// slow the tests down.
pub fn test_app(api_hostname: &str) -> Router {
    let client = ChatClient::builder(api_hostname, "test-api-key", TEST_MODEL)
        .system_message("You are a helpful assistant.")
        .backoff(Backoff::new(Duration::from_millis(1)))
        .build();
    app(Arc::new(AppState::new(client)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
