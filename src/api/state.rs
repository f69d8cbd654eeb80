use crate::gemini::ChatClient;

pub struct AppState {
    pub client: ChatClient,
}

impl AppState {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }
}
