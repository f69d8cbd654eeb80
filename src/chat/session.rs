use crate::gemini::{ChatClient, HttpTransport, Source, Transport};

use super::models::{ChatMessage, Sender, Transcript};

/// Shown to the user whenever a reply could not be fetched. The
/// specific failure only goes to the logs.
pub const FAILURE_MESSAGE: &str =
    "Sorry, an error occurred while fetching the response. Please try again.";

/// What gets recorded in the transcript in place of a failed reply.
pub const FAILURE_TRANSCRIPT_TEXT: &str = "Error: Failed to fetch response.";

/// Whatever displays the conversation and collects input.
pub trait ChatView {
    fn append_message(&mut self, msg: &ChatMessage, sources: &[Source]);
    fn set_loading(&mut self, loading: bool);
    fn read_input(&self) -> String;
    fn clear_input(&mut self);
}

/// One conversation: sends what the user typed, shows the reply and
/// keeps the transcript.
///
/// The transcript is recorded but never sent back to the model. Each
/// prompt goes out on its own.
pub struct ChatSession<V, T = HttpTransport> {
    client: ChatClient<T>,
    view: V,
    transcript: Transcript,
}

impl<V: ChatView, T: Transport + Send + Sync> ChatSession<V, T> {
    pub fn new(client: ChatClient<T>, view: V) -> Self {
        Self {
            client,
            view,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Send whatever is in the input field. Taking `&mut self` means a
    /// session can only have one request in flight.
    pub async fn handle_send(&mut self) {
        let prompt = self.view.read_input().trim().to_string();
        if prompt.is_empty() {
            return;
        }

        let user_msg = ChatMessage::new(Sender::User, &prompt);
        self.view.append_message(&user_msg, &[]);
        self.transcript.push(user_msg);
        self.view.clear_input();
        self.view.set_loading(true);

        let result = self.client.send(&prompt).await;

        self.view.set_loading(false);

        match result {
            Ok(reply) => {
                let msg = ChatMessage::new(Sender::Assistant, &reply.text);
                self.view.append_message(&msg, &reply.sources);
                self.transcript.push(msg);
            }
            Err(e) => {
                tracing::debug!("Showing failure message for: {:?}", e);
                self.view
                    .append_message(&ChatMessage::new(Sender::Assistant, FAILURE_MESSAGE), &[]);
                self.transcript
                    .push(ChatMessage::new(Sender::Assistant, FAILURE_TRANSCRIPT_TEXT));
            }
        }
    }
}
