use thiserror::Error;

/// Every way a single call to the generation endpoint can end without
/// a usable reply. Rate limiting and network failures are retried
/// internally and only show up here once the attempts run out.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("API returned status {status}")]
    UnrecoverableApi { status: u16, body: String },

    #[error("Rate limited on all {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Failed to connect to the AI service after {attempts} attempts")]
    ConnectionExhausted { attempts: u32 },

    #[error("AI did not provide a text response (reason: {reason})")]
    EmptyOrBlocked { reason: String },

    #[error("Response body was not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
}
