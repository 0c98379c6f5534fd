//! Prompt expansion: a user idea plus a system preset, sent to a GLM text model.

use serde::Deserialize;
use std::sync::Arc;

use super::{effective_seed, warn_unknown_model, NodeContext};
use crate::error::{NodeError, NodeResult};
use crate::llm::{
    extract_boxed, ChatMessage, CompletionRequest, DEFAULT_TEXT_MODEL, TEXT_MODELS,
};
use crate::presets::{resolve_prompt, PresetMap};

/// Inputs of the `GLM_Text_Chat` node.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextChatInputs {
    /// The idea to expand
    pub text_input: String,
    /// Call-time API key; blank falls back to environment and credential file
    pub api_key: String,
    pub model_name: String,
    /// 0 picks a random seed
    pub seed: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    /// Highest-priority system prompt; blank uses the preset
    pub system_prompt_override: String,
    pub text_system_prompt_preset: String,
}

impl Default for TextChatInputs {
    fn default() -> Self {
        Self {
            text_input: "a girl.".to_string(),
            api_key: String::new(),
            model_name: DEFAULT_TEXT_MODEL.to_string(),
            seed: 0,
            temperature: 0.9,
            top_p: 0.7,
            max_tokens: 1024,
            system_prompt_override: String::new(),
            text_system_prompt_preset: String::new(),
        }
    }
}

impl TextChatInputs {
    /// Check the declared ranges: temperature and top_p in [0, 1], max_tokens in 1..=4096.
    pub fn validate(&self) -> NodeResult<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(NodeError::InvalidInput(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(NodeError::InvalidInput(format!(
                "top_p must be between 0.0 and 1.0, got {}",
                self.top_p
            )));
        }
        if !(1..=4096).contains(&self.max_tokens) {
            return Err(NodeError::InvalidInput(format!(
                "max_tokens must be between 1 and 4096, got {}",
                self.max_tokens
            )));
        }
        Ok(())
    }
}

/// The `GLM_Text_Chat` node.
pub struct TextChatNode {
    ctx: Arc<NodeContext>,
}

impl TextChatNode {
    pub fn new(ctx: Arc<NodeContext>) -> Self {
        Self { ctx }
    }

    /// Presets currently on disk (or the builtin fallback).
    pub fn presets(&self) -> PresetMap {
        self.ctx.text_presets.load()
    }

    pub async fn run(&self, inputs: &TextChatInputs) -> NodeResult<String> {
        inputs.validate()?;
        let provider = self.ctx.provider_for(&inputs.api_key)?;

        let presets = self.presets();
        let system = resolve_prompt(
            &inputs.system_prompt_override,
            &inputs.text_system_prompt_preset,
            &presets,
            self.ctx.text_presets.builtin(),
            "system",
        )?;

        let seed = effective_seed(inputs.seed);
        tracing::debug!("Effective seed {seed}");
        warn_unknown_model(&inputs.model_name, TEXT_MODELS);

        let request = CompletionRequest::new(
            inputs.model_name.clone(),
            vec![
                ChatMessage::system(system.text),
                ChatMessage::user(inputs.text_input.clone()),
            ],
        )
        .with_sampling(inputs.temperature, inputs.top_p, inputs.max_tokens);

        tracing::info!("Calling {} via {}", inputs.model_name, provider.name());
        let response = provider
            .complete(&request)
            .await
            .map_err(|source| NodeError::Llm {
                api: "GLM-4",
                source,
            })?;

        let text = extract_boxed(&response.text);
        tracing::info!("GLM response received ({} chars)", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticConfigProvider;
    use crate::error::LlmError;
    use crate::llm::{MessageContent, Role};
    use crate::nodes::testing::{context, context_with_credentials, MockFactory};

    fn node(dir: &std::path::Path, factory: Arc<MockFactory>) -> TextChatNode {
        TextChatNode::new(Arc::new(context(dir, factory)))
    }

    #[tokio::test]
    async fn test_sends_system_and_user_messages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("text_prompts.txt"),
            "[Short]\nOne sentence only.\n[Long]\nBe verbose.\n",
        )
        .unwrap();
        let factory = Arc::new(MockFactory::replying("expanded"));

        let inputs = TextChatInputs {
            text_input: "a cat".into(),
            text_system_prompt_preset: "Long".into(),
            ..TextChatInputs::default()
        };
        let out = node(dir.path(), factory.clone()).run(&inputs).await.unwrap();
        assert_eq!(out, "expanded");

        let request = factory.last_request().unwrap();
        assert_eq!(request.model, "GLM-4.5-Flash");
        assert_eq!(request.temperature, Some(0.9));
        assert_eq!(request.max_tokens, Some(1024));
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(
            request.messages[0].content,
            MessageContent::Text("Be verbose.".into())
        );
        assert_eq!(request.messages[1].content, MessageContent::Text("a cat".into()));
        assert_eq!(factory.keys.lock().unwrap().as_slice(), ["env-key"]);
    }

    #[tokio::test]
    async fn test_override_and_call_time_key() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying("ok"));
        let inputs = TextChatInputs {
            api_key: " call-key ".into(),
            system_prompt_override: "custom system".into(),
            ..TextChatInputs::default()
        };
        node(dir.path(), factory.clone()).run(&inputs).await.unwrap();

        let request = factory.last_request().unwrap();
        assert_eq!(
            request.messages[0].content,
            MessageContent::Text("custom system".into())
        );
        assert_eq!(factory.keys.lock().unwrap().as_slice(), ["call-key"]);
    }

    #[tokio::test]
    async fn test_builtin_prompt_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying("ok"));
        node(dir.path(), factory.clone())
            .run(&TextChatInputs::default())
            .await
            .unwrap();

        let request = factory.last_request().unwrap();
        match &request.messages[0].content {
            MessageContent::Text(text) => assert!(text.contains("video")),
            other => panic!("unexpected content {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_strips_box_markers() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying(
            "<|begin_of_box|>answer<|end_of_box|>",
        ));
        let out = node(dir.path(), factory)
            .run(&TextChatInputs::default())
            .await
            .unwrap();
        assert_eq!(out, "answer");
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_call() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying("never"));
        let ctx = context_with_credentials(dir.path(), factory.clone(), StaticConfigProvider::new());
        let err = TextChatNode::new(Arc::new(ctx))
            .run(&TextChatInputs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::MissingApiKey));
        assert_eq!(factory.call_count(), 0);
        assert!(factory.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_failure_becomes_error() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::with(|_| {
            Err(LlmError::Status {
                status: 401,
                body: "bad key".into(),
            })
        }));
        let err = node(dir.path(), factory)
            .run(&TextChatInputs::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "GLM-4 API call failed: HTTP 401: bad key");
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying("never"));
        let inputs = TextChatInputs {
            max_tokens: 0,
            ..TextChatInputs::default()
        };
        let err = node(dir.path(), factory.clone()).run(&inputs).await.unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
        assert_eq!(factory.call_count(), 0);
    }

    #[test]
    fn test_inputs_deserialize_with_defaults() {
        let inputs: TextChatInputs =
            serde_json::from_value(serde_json::json!({"text_input": "a dog", "seed": 5}))
                .unwrap();
        assert_eq!(inputs.text_input, "a dog");
        assert_eq!(inputs.seed, 5);
        assert_eq!(inputs.top_p, 0.7);
        assert_eq!(inputs.model_name, DEFAULT_TEXT_MODEL);
    }
}
