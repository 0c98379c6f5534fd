//! GLM provider using the Zhipu chat completions API.
//!
//! The API is OpenAI-compatible: images travel as `image_url` parts holding a
//! URL or a data URI.

use super::provider::{CompletionProvider, CompletionRequest, CompletionResponse, ProviderFactory};
use crate::config::DEFAULT_BASE_URL;
use crate::error::LlmError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Zhipu provider bound to one API key.
pub struct ZhipuProvider {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl ZhipuProvider {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            client,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Message content is normally a string; anything else is rendered as JSON text.
fn content_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn parse_response(body: &str, started: Instant) -> Result<CompletionResponse, LlmError> {
    let chat: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;

    let text = chat
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .and_then(content_text)
        .ok_or(LlmError::EmptyResponse)?;

    Ok(CompletionResponse {
        text,
        model: chat.model,
        tokens_used: chat.usage.map(|u| u.total_tokens),
        latency_ms: started.elapsed().as_millis() as u64,
    })
}

#[async_trait]
impl CompletionProvider for ZhipuProvider {
    fn name(&self) -> &str {
        "zhipu"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();
        tracing::debug!(
            "POST {} model={} messages={}",
            self.endpoint,
            request.model,
            request.messages.len()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response = parse_response(&body, start)?;
        tracing::debug!(
            "{} answered in {}ms ({:?} tokens)",
            response.model,
            response.latency_ms,
            response.tokens_used
        );
        Ok(response)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builds [`ZhipuProvider`]s with a shared base URL and timeout.
#[derive(Debug, Clone)]
pub struct ZhipuFactory {
    base_url: String,
    timeout: Duration,
}

impl ZhipuFactory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ZhipuFactory {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(120))
    }
}

impl ProviderFactory for ZhipuFactory {
    fn create(&self, api_key: &str) -> Result<Box<dyn CompletionProvider>, LlmError> {
        Ok(Box::new(ZhipuProvider::new(
            api_key,
            &self.base_url,
            self.timeout,
        )?))
    }
}
