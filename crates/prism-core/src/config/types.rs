//! Sub-configuration structs with defaults matching the node inputs.

use serde::{Deserialize, Serialize};

use crate::llm::{DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};

/// Default GLM API base URL.
pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL; `ZHIPUAI_BASE_URL` overrides it at runtime
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Default model for text expansion
    pub text_model: String,

    /// Default model for image description
    pub vision_model: String,

    /// Default sampling temperature (0.0 to 1.0)
    pub temperature: f32,

    /// Default nucleus sampling mass (0.0 to 1.0)
    pub top_p: f32,

    /// Default completion length limit
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 120_000,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            temperature: 0.9,
            top_p: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Where the JSON credential file lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Path to a JSON object with an optional `ZHIPUAI_API_KEY` field.
    /// Relative paths resolve against the config directory.
    pub file: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            file: "config.json".to_string(),
        }
    }
}

/// Prompt preset files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    /// Directory containing the preset files
    pub dir: String,

    /// File name of the text-expansion presets
    pub text_file: String,

    /// File name of the image-description presets
    pub image_file: String,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            dir: "prompt".to_string(),
            text_file: "text_prompts.txt".to_string(),
            image_file: "image_prompts.txt".to_string(),
        }
    }
}

/// Object storage defaults used when the CLI omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OssConfig {
    /// Endpoint, e.g. `https://oss-cn-hangzhou.aliyuncs.com`
    pub endpoint: String,

    /// Bucket name
    pub bucket: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for OssConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            bucket: String::new(),
            timeout_ms: 300_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
