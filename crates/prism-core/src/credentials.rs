//! API key resolution.
//!
//! A key is taken from the call itself, then the `ZHIPUAI_API_KEY` environment
//! variable, then the same field in a local JSON credential file. Lookups go
//! through a [`ConfigProvider`] so callers and tests decide where values come
//! from.

use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable and credential-file field holding the API key.
pub const API_KEY_VAR: &str = "ZHIPUAI_API_KEY";

/// Environment variable and credential-file field overriding the API base URL.
pub const BASE_URL_VAR: &str = "ZHIPUAI_BASE_URL";

/// Source of environment and credential-file values.
pub trait ConfigProvider: Send + Sync {
    /// Look up a process environment variable.
    fn env_var(&self, name: &str) -> Option<String>;

    /// Look up a string field of the credential file.
    fn file_value(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment and a JSON credential file on disk.
///
/// The file is re-read on every lookup so edits take effect immediately.
#[derive(Debug, Clone)]
pub struct SystemConfigProvider {
    file: PathBuf,
}

impl SystemConfigProvider {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &std::path::Path {
        &self.file
    }
}

impl ConfigProvider for SystemConfigProvider {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }

    fn file_value(&self, name: &str) -> Option<String> {
        let file_name = self.file.display();
        if !self.file.exists() {
            tracing::warn!("Credential file {file_name} not found");
            return None;
        }

        let content = match std::fs::read_to_string(&self.file) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read credential file {file_name}: {e}");
                return None;
            }
        };

        let json: serde_json::Value = match serde_json::from_str(&content) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Credential file {file_name} is not valid JSON: {e}");
                return None;
            }
        };

        match json.get(name).and_then(|v| v.as_str()) {
            Some(value) if !value.is_empty() => {
                tracing::info!("Read {name} from {file_name}");
                Some(value.to_string())
            }
            _ => {
                tracing::warn!("{name} not found in {file_name}");
                None
            }
        }
    }
}

/// Fixed in-memory values, for tests and for hosts that inject their own.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    env: HashMap<String, String>,
    file: HashMap<String, String>,
}

impl StaticConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file_value(mut self, name: &str, value: &str) -> Self {
        self.file.insert(name.to_string(), value.to_string());
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn file_value(&self, name: &str) -> Option<String> {
        self.file.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// Resolve the API key: call-time key, then environment, then credential file.
///
/// Returns `None` when no source has a non-empty key.
pub fn resolve_api_key(call_time_key: &str, provider: &dyn ConfigProvider) -> Option<String> {
    let trimmed = call_time_key.trim();
    if !trimmed.is_empty() {
        return Some(trimmed.to_string());
    }

    if let Some(key) = provider.env_var(API_KEY_VAR) {
        tracing::info!("Using API key from environment variable {API_KEY_VAR}");
        return Some(key);
    }

    let key = provider.file_value(API_KEY_VAR);
    if key.is_none() {
        tracing::warn!("{API_KEY_VAR} not found in the environment or the credential file");
    }
    key
}

/// Resolve an optional base-URL override from the environment or credential file.
pub fn resolve_base_url(provider: &dyn ConfigProvider) -> Option<String> {
    provider
        .env_var(BASE_URL_VAR)
        .or_else(|| provider.file_value(BASE_URL_VAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_time_key_wins() {
        let provider = StaticConfigProvider::new()
            .with_env(API_KEY_VAR, "env-key")
            .with_file_value(API_KEY_VAR, "file-key");
        assert_eq!(
            resolve_api_key("  call-key  ", &provider),
            Some("call-key".to_string())
        );
    }

    #[test]
    fn test_env_before_file() {
        let provider = StaticConfigProvider::new()
            .with_env(API_KEY_VAR, "env-key")
            .with_file_value(API_KEY_VAR, "file-key");
        assert_eq!(resolve_api_key("   ", &provider), Some("env-key".to_string()));
    }

    #[test]
    fn test_file_when_env_missing() {
        let provider = StaticConfigProvider::new().with_file_value(API_KEY_VAR, "file-key");
        assert_eq!(resolve_api_key("", &provider), Some("file-key".to_string()));
    }

    #[test]
    fn test_none_when_nothing_set() {
        let provider = StaticConfigProvider::new().with_env(API_KEY_VAR, "");
        assert_eq!(resolve_api_key("", &provider), None);
    }

    #[test]
    fn test_system_provider_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"ZHIPUAI_API_KEY": "from-json"}"#).unwrap();

        let provider = SystemConfigProvider::new(&path);
        assert_eq!(
            provider.file_value(API_KEY_VAR),
            Some("from-json".to_string())
        );
    }

    #[test]
    fn test_system_provider_tolerates_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = SystemConfigProvider::new(dir.path().join("absent.json"));
        assert_eq!(missing.file_value(API_KEY_VAR), None);

        let malformed_path = dir.path().join("bad.json");
        std::fs::write(&malformed_path, "{not json").unwrap();
        let malformed = SystemConfigProvider::new(&malformed_path);
        assert_eq!(malformed.file_value(API_KEY_VAR), None);

        let no_field_path = dir.path().join("empty.json");
        std::fs::write(&no_field_path, r#"{"OTHER": "x"}"#).unwrap();
        let no_field = SystemConfigProvider::new(&no_field_path);
        assert_eq!(no_field.file_value(API_KEY_VAR), None);

        let blank_path = dir.path().join("blank.json");
        std::fs::write(&blank_path, r#"{"ZHIPUAI_API_KEY": ""}"#).unwrap();
        let blank = SystemConfigProvider::new(&blank_path);
        assert_eq!(blank.file_value(API_KEY_VAR), None);
    }

    #[test]
    fn test_base_url_override() {
        let provider =
            StaticConfigProvider::new().with_file_value(BASE_URL_VAR, "http://localhost:9000/v4");
        assert_eq!(
            resolve_base_url(&provider),
            Some("http://localhost:9000/v4".to_string())
        );
        assert_eq!(resolve_base_url(&StaticConfigProvider::new()), None);
    }
}
