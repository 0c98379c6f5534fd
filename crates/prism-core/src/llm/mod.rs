//! Chat completion integration for prompt expansion and image description.
//!
//! Provides a provider abstraction over the GLM chat completions API, the
//! message types it speaks, and the post-processing applied to its output.

pub(crate) mod models;
pub(crate) mod provider;
pub(crate) mod zhipu;

pub use models::{
    DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL, TEXT_MODELS, VISION_MODELS,
};
pub use provider::{
    extract_boxed, ChatMessage, CompletionProvider, CompletionRequest, CompletionResponse,
    ContentPart, ImageUrl, MessageContent, ProviderFactory, Role,
};
pub use zhipu::{ZhipuFactory, ZhipuProvider};
