//! Image to prompt: describe an image with a GLM vision model.

use serde::Deserialize;
use std::sync::Arc;

use super::{effective_seed, warn_unknown_model, NodeContext};
use crate::error::{NodeError, NodeResult};
use crate::imaging::{normalize_image, ImageBatch};
use crate::llm::{
    extract_boxed, ChatMessage, CompletionRequest, DEFAULT_VISION_MODEL, VISION_MODELS,
};
use crate::presets::{resolve_prompt, PresetMap};

/// Inputs of the `GLM_Vision_ImageToPrompt` node.
///
/// Exactly one image source is used: `image_input`, then `image_base64`, then
/// `image_url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisionInputs {
    pub image_prompt_preset: String,
    pub prompt_override: String,
    pub model_name: String,
    pub api_key: String,
    pub seed: u64,
    pub image_url: String,
    pub image_base64: String,
    /// IMAGE values only arrive from other nodes, never from serialized inputs
    #[serde(skip)]
    pub image_input: Option<ImageBatch>,
}

impl Default for VisionInputs {
    fn default() -> Self {
        Self {
            image_prompt_preset: String::new(),
            prompt_override: String::new(),
            model_name: DEFAULT_VISION_MODEL.to_string(),
            api_key: String::new(),
            seed: 0,
            image_url: String::new(),
            image_base64: String::new(),
            image_input: None,
        }
    }
}

impl VisionInputs {
    fn has_image_source(&self) -> bool {
        self.image_input.is_some()
            || !self.image_base64.trim().is_empty()
            || !self.image_url.trim().is_empty()
    }
}

/// The `GLM_Vision_ImageToPrompt` node.
pub struct VisionNode {
    ctx: Arc<NodeContext>,
}

impl VisionNode {
    pub fn new(ctx: Arc<NodeContext>) -> Self {
        Self { ctx }
    }

    /// Presets currently on disk (or the builtin fallback).
    pub fn presets(&self) -> PresetMap {
        self.ctx.image_presets.load()
    }

    pub async fn run(&self, inputs: &VisionInputs) -> NodeResult<String> {
        let provider = self.ctx.provider_for(&inputs.api_key)?;

        if !inputs.has_image_source() {
            tracing::error!("No image source provided");
            return Err(NodeError::MissingImageSource);
        }

        let seed = effective_seed(inputs.seed);
        tracing::debug!("Effective seed {seed}");

        let image = normalize_image(
            inputs.image_input.as_ref(),
            Some(inputs.image_base64.as_str()),
            Some(inputs.image_url.as_str()),
        )?;

        let presets = self.presets();
        let prompt = resolve_prompt(
            &inputs.prompt_override,
            &inputs.image_prompt_preset,
            &presets,
            self.ctx.image_presets.builtin(),
            "image",
        )?;

        warn_unknown_model(&inputs.model_name, VISION_MODELS);
        let request = CompletionRequest::new(
            inputs.model_name.clone(),
            vec![ChatMessage::user_with_image(prompt.text, image)],
        );

        tracing::info!("Calling {} via {}", inputs.model_name, provider.name());
        let response = provider.complete(&request).await.map_err(|source| {
            let err = NodeError::Llm {
                api: "GLM-4V",
                source,
            };
            tracing::error!("{err}");
            err
        })?;

        let text = extract_boxed(&response.text);
        tracing::info!("GLM vision response received ({} chars)", text.chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ContentPart, MessageContent};
    use crate::nodes::testing::{context, MockFactory};

    fn node(dir: &std::path::Path, factory: Arc<MockFactory>) -> VisionNode {
        VisionNode::new(Arc::new(context(dir, factory)))
    }

    fn parts(request: &CompletionRequest) -> Vec<ContentPart> {
        match &request.messages[0].content {
            MessageContent::Parts(parts) => parts.clone(),
            other => panic!("expected parts, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_image_source_makes_no_call() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying("never"));
        let err = node(dir.path(), factory.clone())
            .run(&VisionInputs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::MissingImageSource));
        assert_eq!(
            err.to_string(),
            "An image URL, base64 data, or IMAGE input is required."
        );
        assert_eq!(factory.call_count(), 0);
    }

    #[tokio::test]
    async fn test_url_request_shape() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("image_prompts.txt"),
            "[Tags]\nList tags.\n[Scene]\nDescribe the scene.\n",
        )
        .unwrap();
        let factory = Arc::new(MockFactory::replying("a red car"));

        let inputs = VisionInputs {
            image_url: "https://example.com/car.jpg".into(),
            image_prompt_preset: "Scene".into(),
            ..VisionInputs::default()
        };
        let out = node(dir.path(), factory.clone()).run(&inputs).await.unwrap();
        assert_eq!(out, "a red car");

        let request = factory.last_request().unwrap();
        assert_eq!(request.model, DEFAULT_VISION_MODEL);
        assert_eq!(request.temperature, None);
        assert_eq!(
            parts(&request),
            vec![
                ContentPart::Text {
                    text: "Describe the scene.".into()
                },
                ContentPart::ImageUrl {
                    image_url: crate::llm::ImageUrl {
                        url: "https://example.com/car.jpg".into()
                    }
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_image_buffer_wins_over_url() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying("ok"));
        let inputs = VisionInputs {
            image_url: "https://example.com/ignored.jpg".into(),
            image_input: Some(ImageBatch::new(1, 2, 2, 3, vec![0.1; 12]).unwrap()),
            ..VisionInputs::default()
        };
        node(dir.path(), factory.clone()).run(&inputs).await.unwrap();

        let request = factory.last_request().unwrap();
        match &parts(&request)[1] {
            ContentPart::ImageUrl { image_url } => {
                assert!(image_url.url.starts_with("data:image/png;base64,"))
            }
            other => panic!("unexpected part {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_base64_makes_no_call() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying("never"));
        let inputs = VisionInputs {
            image_base64: "%%%".into(),
            ..VisionInputs::default()
        };
        let err = node(dir.path(), factory.clone()).run(&inputs).await.unwrap_err();
        assert!(matches!(err, NodeError::InvalidBase64(_)));
        assert_eq!(factory.call_count(), 0);
    }

    #[tokio::test]
    async fn test_thinking_output_is_unboxed() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(MockFactory::replying(
            "Let me look.<|begin_of_box|> a lighthouse at dusk <|end_of_box|>",
        ));
        let inputs = VisionInputs {
            image_base64: "aGVsbG8=".into(),
            ..VisionInputs::default()
        };
        let out = node(dir.path(), factory).run(&inputs).await.unwrap();
        assert_eq!(out, "a lighthouse at dusk");
    }
}
