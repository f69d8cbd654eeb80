use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ChatError;

/// Reason reported when the endpoint gives no text and no finish
/// reason either.
pub const UNKNOWN_REASON: &str = "UNKNOWN";

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub enum Tool {
    /// Lets the model ground its answer with a web search and report
    /// the pages it used.
    #[serde(rename = "google_search")]
    GoogleSearch {},
}

// {
//   "contents": [{"parts": [{"text": "..."}]}],
//   "tools": [{"google_search": {}}],
//   "systemInstruction": {"parts": [{"text": "..."}]}
// }
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    #[serde(rename = "systemInstruction")]
    pub system_instruction: Content,
}

impl GenerateRequest {
    /// Only the current prompt is sent. Earlier turns are never
    /// included so every call is stateless from the endpoint's side.
    pub fn new(prompt: &str, system_message: &str) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            tools: vec![Tool::GoogleSearch {}],
            system_instruction: Content::text(system_message),
        }
    }
}

/// A page the model cited when answering.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Source {
    pub uri: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Source {
    /// What to show for a link: the title if there is one, otherwise
    /// the uri itself.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.uri)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub sources: Vec<Source>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct GroundingMetadata {
    grounding_attributions: Vec<GroundingAttribution>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct GroundingAttribution {
    web: Option<WebSource>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

impl Candidate {
    fn first_text(&self) -> Option<&str> {
        self.content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    fn sources(&self) -> Vec<Source> {
        let Some(metadata) = &self.grounding_metadata else {
            return Vec::new();
        };
        metadata
            .grounding_attributions
            .iter()
            .filter_map(|attribution| {
                let web = attribution.web.as_ref()?;
                let uri = web.uri.as_deref().filter(|uri| !uri.is_empty())?;
                Some(Source {
                    uri: uri.to_string(),
                    title: web.title.clone(),
                })
            })
            .collect()
    }
}

/// Pull the reply text and cited sources out of a successful
/// `generateContent` response.
///
/// Only the first candidate is considered and it must carry non-empty
/// text in its first part. Otherwise the response was empty or blocked
/// and the candidate's `finishReason` (or `UNKNOWN`) is returned as the
/// reason.
pub fn interpret(body: &Value) -> Result<Reply, ChatError> {
    let response = match GenerateResponse::deserialize(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Unexpected response shape: {}", e);
            let reason = body["candidates"][0]["finishReason"]
                .as_str()
                .unwrap_or(UNKNOWN_REASON);
            return Err(ChatError::EmptyOrBlocked {
                reason: reason.to_string(),
            });
        }
    };

    let candidate = response.candidates.first();
    match candidate.and_then(|c| c.first_text().map(|text| (c, text))) {
        Some((candidate, text)) => Ok(Reply {
            text: text.to_string(),
            sources: candidate.sources(),
        }),
        None => {
            let reason = candidate
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| UNKNOWN_REASON.to_string());
            tracing::debug!(
                "AI response lacked text content. Reason: {} {}",
                reason,
                body
            );
            Err(ChatError::EmptyOrBlocked { reason })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest::new("What is Rust?", "Be concise.");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "contents": [{"parts": [{"text": "What is Rust?"}]}],
                "tools": [{"google_search": {}}],
                "systemInstruction": {"parts": [{"text": "Be concise."}]}
            })
        );
    }

    #[test]
    fn test_interpret_text_and_sources() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Rust is a systems language."}], "role": "model"},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingAttributions": [
                        {"web": {"uri": "https://www.rust-lang.org", "title": "Rust"}},
                        {"web": {"title": "No link"}},
                        {"segment": {"startIndex": 0}}
                    ]
                }
            }]
        });
        let reply = interpret(&body).unwrap();
        assert_eq!(reply.text, "Rust is a systems language.");
        assert_eq!(
            reply.sources,
            vec![Source {
                uri: "https://www.rust-lang.org".to_string(),
                title: Some("Rust".to_string()),
            }]
        );
    }

    #[test]
    fn test_interpret_without_metadata_has_no_sources() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "Hello!"}]}}]
        });
        let reply = interpret(&body).unwrap();
        assert_eq!(reply.text, "Hello!");
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn test_interpret_drops_empty_uri() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hi"}]},
                "groundingMetadata": {
                    "groundingAttributions": [{"web": {"uri": "", "title": "Blank"}}]
                }
            }]
        });
        assert!(interpret(&body).unwrap().sources.is_empty());
    }

    #[test]
    fn test_interpret_empty_text_is_blocked() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": ""}]}, "finishReason": "SAFETY"}]
        });
        match interpret(&body) {
            Err(ChatError::EmptyOrBlocked { reason }) => assert_eq!(reason, "SAFETY"),
            other => panic!("Expected EmptyOrBlocked, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_missing_text_is_unknown() {
        let body = json!({"candidates": [{"content": {"parts": []}}]});
        match interpret(&body) {
            Err(ChatError::EmptyOrBlocked { reason }) => assert_eq!(reason, UNKNOWN_REASON),
            other => panic!("Expected EmptyOrBlocked, got {:?}", other),
        }
    }

    #[test]
    fn test_interpret_no_candidates() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert!(matches!(
            interpret(&body),
            Err(ChatError::EmptyOrBlocked { reason }) if reason == UNKNOWN_REASON
        ));
    }

    #[test]
    fn test_interpret_unexpected_shape_keeps_finish_reason() {
        let body = json!({
            "candidates": [{"content": "not an object", "finishReason": "RECITATION"}]
        });
        assert!(matches!(
            interpret(&body),
            Err(ChatError::EmptyOrBlocked { reason }) if reason == "RECITATION"
        ));
    }

    #[test]
    fn test_interpret_is_repeatable() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Same"}]},
                "groundingMetadata": {
                    "groundingAttributions": [{"web": {"uri": "https://a.example"}}]
                }
            }]
        });
        assert_eq!(interpret(&body).unwrap(), interpret(&body).unwrap());
    }

    #[test]
    fn test_source_label() {
        let titled = Source {
            uri: "https://a.example".to_string(),
            title: Some("A".to_string()),
        };
        let bare = Source {
            uri: "https://b.example".to_string(),
            title: None,
        };
        assert_eq!(titled.label(), "A");
        assert_eq!(bare.label(), "https://b.example");
    }

    #[test]
    fn test_source_label_empty_title_falls_back_to_uri() {
        let source = Source {
            uri: "https://c.example".to_string(),
            title: Some(String::new()),
        };
        assert_eq!(source.label(), "https://c.example");
    }
}
