//! Client for the Gemini `generateContent` API.

pub mod backoff;
pub use backoff::Backoff;

mod chat;
pub use chat::{
    AttemptObserver, AttemptOutcome, BoxedObserver, ChatClient, ChatClientBuilder, LogObserver,
    MAX_ATTEMPTS, RetryableKind,
};

mod core;
pub use self::core::{GenerateRequest, Reply, Source, UNKNOWN_REASON, interpret};

mod error;
pub use error::ChatError;

pub mod transport;
pub use transport::{HttpReply, HttpTransport, Transport};
