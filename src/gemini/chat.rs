use std::sync::Arc;
use std::time::Duration;

use anyhow::Error;
use async_trait::async_trait;
use serde_json::Value;

use super::backoff::Backoff;
use super::core::{GenerateRequest, Reply, interpret};
use super::error::ChatError;
use super::transport::{HttpReply, HttpTransport, Transport};

/// Total number of requests made for one prompt, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

/// Failures worth trying again after a pause.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryableKind {
    RateLimited,
    Network(String),
}

/// What a single request to the endpoint amounted to.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(String),
    Retryable(RetryableKind),
    Permanent(ChatError),
}

impl AttemptOutcome {
    /// Only rate limiting and requests that never got a response are
    /// retried. Every other non-2xx status ends the call.
    pub fn classify(result: Result<HttpReply, Error>) -> Self {
        match result {
            Err(e) => AttemptOutcome::Retryable(RetryableKind::Network(e.to_string())),
            Ok(reply) if reply.is_success() => AttemptOutcome::Success(reply.body),
            Ok(reply) if reply.status == 429 => {
                AttemptOutcome::Retryable(RetryableKind::RateLimited)
            }
            Ok(HttpReply { status, body }) => {
                AttemptOutcome::Permanent(ChatError::UnrecoverableApi { status, body })
            }
        }
    }
}

/// Hooks for watching a call progress. Nothing here affects the
/// outcome.
#[async_trait]
pub trait AttemptObserver {
    async fn on_attempt_start(&self, _attempt: u32) {}
    async fn on_backoff(&self, _attempt: u32, _kind: &RetryableKind, _delay: Duration) {}
    async fn on_terminal_outcome(&self, _result: &Result<Reply, ChatError>) {}
}

pub type BoxedObserver = Arc<dyn AttemptObserver + Send + Sync + 'static>;

/// Logs each step of a call with `tracing`.
pub struct LogObserver;

#[async_trait]
impl AttemptObserver for LogObserver {
    async fn on_attempt_start(&self, attempt: u32) {
        tracing::debug!("Attempt {}: Fetching response from Gemini...", attempt + 1);
    }

    async fn on_backoff(&self, _attempt: u32, kind: &RetryableKind, delay: Duration) {
        match kind {
            RetryableKind::RateLimited => tracing::warn!(
                "Rate limit (429) hit. Retrying in {}s...",
                delay.as_secs_f32()
            ),
            RetryableKind::Network(msg) => tracing::warn!(
                "Network failure: {}. Retrying in {}s...",
                msg,
                delay.as_secs_f32()
            ),
        }
    }

    async fn on_terminal_outcome(&self, result: &Result<Reply, ChatError>) {
        match result {
            Ok(reply) => tracing::debug!(
                "Received response with {} source(s)",
                reply.sources.len()
            ),
            Err(ChatError::UnrecoverableApi { status, body }) => {
                tracing::error!("API returned status {}. Error details: {}", status, body)
            }
            Err(e) => tracing::error!("{}", e),
        }
    }
}

/// Sends one prompt at a time to the generation endpoint, retrying
/// rate limits and network failures with exponential backoff.
///
/// Use `ChatClient::builder()` to construct a `ChatClient`.
pub struct ChatClient<T = HttpTransport> {
    transport: T,
    system_message: String,
    backoff: Backoff,
    max_attempts: u32,
    observer: BoxedObserver,
}

impl ChatClient<HttpTransport> {
    pub fn builder(api_hostname: &str, api_key: &str, model: &str) -> ChatClientBuilder {
        ChatClientBuilder::new(api_hostname, api_key, model)
    }
}

impl<T: Transport + Send + Sync> ChatClient<T> {
    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a reply for `prompt`. Requests are made strictly one after
    /// another and the call always runs until it succeeds or fails
    /// for good.
    pub async fn send(&self, prompt: &str) -> Result<Reply, ChatError> {
        let result = self.send_inner(prompt).await;
        self.observer.on_terminal_outcome(&result).await;
        result
    }

    async fn send_inner(&self, prompt: &str) -> Result<Reply, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let request = GenerateRequest::new(prompt, &self.system_message);
        let mut success = None;
        let mut last_kind = None;

        for attempt in 0..self.max_attempts {
            self.observer.on_attempt_start(attempt).await;

            match AttemptOutcome::classify(self.transport.post(&request).await) {
                AttemptOutcome::Success(body) => {
                    success = Some(body);
                    break;
                }
                AttemptOutcome::Permanent(err) => return Err(err),
                AttemptOutcome::Retryable(kind) => {
                    // No point waiting after the last attempt
                    if attempt + 1 < self.max_attempts {
                        let delay = self.backoff.delay(attempt);
                        self.observer.on_backoff(attempt, &kind, delay).await;
                        tokio::time::sleep(delay).await;
                    }
                    last_kind = Some(kind);
                }
            }
        }

        let Some(body) = success else {
            let attempts = self.max_attempts;
            return Err(match last_kind {
                Some(RetryableKind::Network(_)) => ChatError::ConnectionExhausted { attempts },
                _ => ChatError::RetriesExhausted { attempts },
            });
        };

        let body: Value = serde_json::from_str(&body)?;
        interpret(&body)
    }
}

pub struct ChatClientBuilder<T = HttpTransport> {
    transport: T,
    system_message: String,
    backoff: Backoff,
    max_attempts: u32,
    observer: BoxedObserver,
}

impl ChatClientBuilder<HttpTransport> {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self::with_transport(HttpTransport::new(api_hostname, api_key, model))
    }
}

impl<T: Transport + Send + Sync> ChatClientBuilder<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            system_message: String::from("You are a helpful assistant."),
            backoff: Backoff::default(),
            max_attempts: MAX_ATTEMPTS,
            observer: Arc::new(LogObserver),
        }
    }

    pub fn build(self) -> ChatClient<T> {
        ChatClient {
            transport: self.transport,
            system_message: self.system_message,
            backoff: self.backoff,
            max_attempts: self.max_attempts,
            observer: self.observer,
        }
    }

    pub fn system_message(mut self, message: &str) -> Self {
        self.system_message = message.to_string();
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        // Always make at least one request
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn observer(mut self, observer: BoxedObserver) -> Self {
        self.observer = observer;
        self
    }
}
