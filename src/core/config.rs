use std::env;

/// Used when `GEMCHAT_SYSTEM_MESSAGE` is not set.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a concise and helpful chat assistant. Answer the user's questions clearly based on the provided search results.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_hostname: String,
    pub api_key: String,
    pub model: String,
    pub system_message: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        // The key is injected by whatever hosts the process. An empty
        // key still lets the request go out so the endpoint can reject it.
        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        let api_hostname = env::var("GEMCHAT_API_HOST")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let model = env::var("GEMCHAT_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash-preview-09-2025".to_string());
        let system_message = env::var("GEMCHAT_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_MESSAGE.to_string());

        Self {
            api_hostname,
            api_key,
            model,
            system_message,
        }
    }
}

impl AppConfig {
    /// Build a client for the generation endpoint from this config.
    pub fn chat_client(&self) -> crate::gemini::ChatClient {
        crate::gemini::ChatClient::builder(&self.api_hostname, &self.api_key, &self.model)
            .system_message(&self.system_message)
            .build()
    }
}
