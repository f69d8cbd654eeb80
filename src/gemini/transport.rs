use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;

use super::core::GenerateRequest;

/// Status and raw body of whatever the endpoint answered with.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single POST to the generation endpoint. Implementations return
/// `Err` only when no HTTP response was received at all. Non-2xx
/// statuses are still `Ok` so the caller can decide what to do with
/// them.
#[async_trait]
pub trait Transport {
    async fn post(&self, request: &GenerateRequest) -> Result<HttpReply, Error>;
}

/// Talks to the Gemini `generateContent` API over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            api_hostname.trim_end_matches("/"),
            model
        );
        Self {
            client: reqwest::Client::new(),
            url,
            api_key: api_key.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &GenerateRequest) -> Result<HttpReply, Error> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("key", &self.api_key)])
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(60 * 2))
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const MODEL: &str = "gemini-2.5-flash";

    #[test]
    fn test_url_from_hostname() {
        let transport = HttpTransport::new("https://example.com/", "k", MODEL);
        assert_eq!(
            transport.url(),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_post_sends_key_and_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"parts": [{"text": "Hi"}]}],
                "tools": [{"google_search": {}}]
            })))
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url(), "test-key", MODEL);
        let reply = transport
            .post(&GenerateRequest::new("Hi", "Be brief."))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(reply.is_success());
        assert_eq!(reply.body, r#"{"candidates": []}"#);
    }

    #[tokio::test]
    async fn test_post_returns_error_statuses() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url(), "test-key", MODEL);
        let reply = transport
            .post(&GenerateRequest::new("Hi", "Be brief."))
            .await
            .unwrap();

        assert_eq!(
            reply,
            HttpReply {
                status: 429,
                body: "slow down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_post_connection_refused_is_err() {
        // Nothing listens on port 1
        let transport = HttpTransport::new("http://127.0.0.1:1", "test-key", MODEL);
        let result = transport.post(&GenerateRequest::new("Hi", "Be brief.")).await;
        assert!(result.is_err());
    }
}
