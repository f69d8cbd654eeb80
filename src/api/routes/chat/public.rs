//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::gemini::{Reply, Source};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub text: String,
    pub sources: Vec<Source>,
}

impl From<Reply> for ChatResponse {
    fn from(reply: Reply) -> Self {
        Self {
            text: reply.text,
            sources: reply.sources,
        }
    }
}
