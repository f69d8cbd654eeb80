pub mod models;
pub use models::{ChatMessage, Sender, Transcript};

pub mod session;
pub use session::{ChatSession, ChatView, FAILURE_MESSAGE, FAILURE_TRANSCRIPT_TEXT};
