//! Completion provider trait and request/response types.
//!
//! Message content follows the chat completions shape: either a plain string
//! or a list of typed parts (`text`, `image_url`).

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BOX_BEGIN: &str = "<|begin_of_box|>";
const BOX_END: &str = "<|end_of_box|>";

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Image reference inside a content part: an `http(s)` URL or a data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One typed part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

/// Message body: plain text or typed parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message carrying a prompt and one image.
    pub fn user_with_image(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.into(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

/// A chat completion request. Unset sampling fields are left to the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            top_p: None,
            max_tokens: None,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32, max_tokens: u32) -> Self {
        self.temperature = Some(temperature);
        self.top_p = Some(top_p);
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// The response from a completion call.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text, untrimmed
    pub text: String,
    /// Model identifier reported by the API
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that completion providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (nodes hold `Box<dyn CompletionProvider>`).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Send one completion request.
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, LlmError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Creates a provider once the API key for the call is known.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, api_key: &str) -> Result<Box<dyn CompletionProvider>, LlmError>;
}

/// Return the text between the box markers, or the whole text if either is absent.
///
/// An end marker that only appears before the begin marker does not count, so the
/// whole text comes back rather than an empty string.
pub fn extract_boxed(text: &str) -> String {
    if let (Some(begin), true) = (text.find(BOX_BEGIN), text.contains(BOX_END)) {
        let start = begin + BOX_BEGIN.len();
        if let Some(len) = text[start..].find(BOX_END) {
            return text[start..start + len].trim().to_string();
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_boxed() {
        assert_eq!(extract_boxed("<|begin_of_box|>answer<|end_of_box|>"), "answer");
        assert_eq!(
            extract_boxed("thinking...<|begin_of_box|>  a cat \n<|end_of_box|> trailing"),
            "a cat"
        );
    }

    #[test]
    fn test_extract_boxed_requires_both_markers() {
        assert_eq!(extract_boxed("<|begin_of_box|>open"), "<|begin_of_box|>open");
        assert_eq!(extract_boxed("close<|end_of_box|>"), "close<|end_of_box|>");
        assert_eq!(extract_boxed("  plain text  "), "  plain text  ");
    }

    #[test]
    fn test_extract_boxed_end_before_begin() {
        let text = "<|end_of_box|>x<|begin_of_box|>y";
        assert_eq!(extract_boxed(text), text);
    }

    #[test]
    fn test_text_request_serialization() {
        let request = CompletionRequest::new(
            "GLM-4.5-Flash",
            vec![ChatMessage::system("be brief"), ChatMessage::user("a girl")],
        )
        .with_sampling(0.9, 0.7, 1024);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "GLM-4.5-Flash");
        assert_eq!(value["messages"][0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["max_tokens"], 1024);
    }

    #[test]
    fn test_vision_request_omits_sampling() {
        let request = CompletionRequest::new(
            "GLM-4v-flash",
            vec![ChatMessage::user_with_image("describe", "https://x/y.png")],
        );
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("temperature").is_none());
        assert!(value.get("max_tokens").is_none());
        assert_eq!(
            value["messages"][0]["content"],
            json!([
                {"type": "text", "text": "describe"},
                {"type": "image_url", "image_url": {"url": "https://x/y.png"}}
            ])
        );
    }
}
