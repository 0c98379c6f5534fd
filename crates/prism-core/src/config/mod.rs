//! Configuration management for Prism.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. API keys never live here: they come from the call, the
//! environment, or the JSON credential file named in `[credentials]`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Prism.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion API settings
    pub llm: LlmConfig,

    /// Credential file location
    pub credentials: CredentialsConfig,

    /// Prompt preset files
    pub presets: PresetsConfig,

    /// Object storage defaults
    pub oss: OssConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.prism.prism/config.toml
    /// - Linux: ~/.config/prism/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\prism\config\config.toml
    ///
    /// Falls back to ~/.prism/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Directory holding `config.toml`, the credential file and presets.
    pub fn config_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "prism", "prism")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".prism")
            })
    }

    /// Resolved path of the JSON credential file.
    ///
    /// Relative paths are taken relative to [`Config::config_dir`].
    pub fn credentials_file(&self) -> PathBuf {
        self.resolve_path(&self.credentials.file)
    }

    /// Resolved path of the text-expansion preset file.
    pub fn text_presets_file(&self) -> PathBuf {
        self.presets_dir().join(&self.presets.text_file)
    }

    /// Resolved path of the image-description preset file.
    pub fn image_presets_file(&self) -> PathBuf {
        self.presets_dir().join(&self.presets.image_file)
    }

    /// Resolved preset directory (with ~ expansion).
    pub fn presets_dir(&self) -> PathBuf {
        self.resolve_path(&self.presets.dir)
    }

    fn resolve_path(&self, raw: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
        if expanded.is_absolute() {
            expanded
        } else {
            Self::config_dir().join(expanded)
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
