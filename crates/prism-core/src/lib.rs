//! Prism Core - GLM prompt, vision and Aliyun OSS nodes.
//!
//! Each node is a thin adapter around one external capability: chat
//! completion for prompt expansion, vision captioning, object storage upload
//! and download, or loading an image from disk. Nodes return a tagged
//! [`NodeResult`]; the host's tuple shape is produced only by
//! [`NodeRegistry`].
//!
//! # Architecture
//!
//! ```text
//! Credentials → Presets → Prompt → (Image normalization) → Completion API → Text
//! Local file ⇄ OSS client
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism_core::{Config, NodeContext, TextChatInputs, TextChatNode};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> prism_core::Result<()> {
//!     let config = Config::load()?;
//!     let node = TextChatNode::new(Arc::new(NodeContext::from_config(&config)));
//!
//!     let inputs = TextChatInputs {
//!         text_input: "a lighthouse in a storm".into(),
//!         ..Default::default()
//!     };
//!     println!("{}", node.run(&inputs).await?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod imaging;
pub mod llm;
pub mod nodes;
pub mod oss;
pub mod presets;

// Re-exports for convenient access
pub use config::Config;
pub use credentials::{resolve_api_key, ConfigProvider, StaticConfigProvider, SystemConfigProvider};
pub use error::{ConfigError, LlmError, NodeError, NodeResult, OssError, PrismError, Result};
pub use imaging::{ImageBatch, LoadedImage};
pub use nodes::{
    HostValue, LoadImageInputs, LoadImageNode, NodeContext, NodeDescriptor, NodeKind,
    NodeRegistry, OssDownloadInputs, OssDownloadNode, OssUploadInputs, OssUploadNode,
    TextChatInputs, TextChatNode, VisionInputs, VisionNode,
};
pub use presets::{PresetMap, PresetStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
