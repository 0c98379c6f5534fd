//! Host-facing nodes.
//!
//! Each node resolves its inputs, performs one request against an external
//! service (or the filesystem), and returns a [`NodeResult`]. The conversion
//! to the host's tuple shape happens in [`host`] and [`NodeRegistry`].
//!
//! - **text_chat**: prompt expansion with a system preset
//! - **vision**: image to prompt
//! - **storage**: OSS upload and download
//! - **load_image**: read an image file into an IMAGE value

pub mod host;
pub mod load_image;
pub mod registry;
pub mod schema;
pub mod storage;
pub mod text_chat;
pub mod vision;

pub use host::HostValue;
pub use load_image::{LoadImageInputs, LoadImageNode};
pub use registry::{NodeKind, NodeRegistry};
pub use schema::{InputKind, InputSpec, NodeDescriptor};
pub use storage::{OssDownloadInputs, OssDownloadNode, OssUploadInputs, OssUploadNode};
pub use text_chat::{TextChatInputs, TextChatNode};
pub use vision::{VisionInputs, VisionNode};

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::credentials::{resolve_api_key, resolve_base_url, ConfigProvider, SystemConfigProvider};
use crate::error::{NodeError, NodeResult};
use crate::llm::{CompletionProvider, ProviderFactory, ZhipuFactory};
use crate::presets::PresetStore;

/// Shared dependencies of the nodes.
pub struct NodeContext {
    pub credentials: Arc<dyn ConfigProvider>,
    pub providers: Arc<dyn ProviderFactory>,
    pub text_presets: PresetStore,
    pub image_presets: PresetStore,
    pub oss_timeout: Duration,
}

impl NodeContext {
    /// Wire the real environment, credential file, preset files and GLM API.
    pub fn from_config(config: &Config) -> Self {
        let credentials: Arc<dyn ConfigProvider> =
            Arc::new(SystemConfigProvider::new(config.credentials_file()));

        let base_url = resolve_base_url(credentials.as_ref())
            .unwrap_or_else(|| config.llm.base_url.clone());
        tracing::debug!("GLM base URL: {base_url}");

        Self {
            credentials,
            providers: Arc::new(ZhipuFactory::new(
                base_url,
                Duration::from_millis(config.llm.timeout_ms),
            )),
            text_presets: PresetStore::text(config.text_presets_file()),
            image_presets: PresetStore::image(config.image_presets_file()),
            oss_timeout: Duration::from_millis(config.oss.timeout_ms),
        }
    }

    /// Resolve the key for this call and build a provider with it.
    fn provider_for(&self, call_time_key: &str) -> NodeResult<Box<dyn CompletionProvider>> {
        let api_key = resolve_api_key(call_time_key, self.credentials.as_ref()).ok_or_else(|| {
            tracing::error!("API key not provided");
            NodeError::MissingApiKey
        })?;

        tracing::info!("Initializing GLM client");
        self.providers.create(&api_key).map_err(|e| {
            tracing::error!("Client initialization failed: {e}");
            NodeError::ClientInit(e.to_string())
        })
    }
}

/// Seed 0 means "pick a random seed".
pub fn effective_seed(seed: u64) -> u64 {
    if seed == 0 {
        rand::random()
    } else {
        seed
    }
}

fn warn_unknown_model(model: &str, known: &[&str]) {
    if !known.contains(&model) {
        tracing::warn!("Model '{model}' is not in the known model list, sending it anyway");
    }
}
