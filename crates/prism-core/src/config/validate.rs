//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.base_url must not be empty".into(),
            ));
        }
        if self.llm.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "llm.timeout_ms must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 1.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ConfigError::ValidationError(
                "llm.top_p must be between 0.0 and 1.0".into(),
            ));
        }
        if !(1..=4096).contains(&self.llm.max_tokens) {
            return Err(ConfigError::ValidationError(
                "llm.max_tokens must be between 1 and 4096".into(),
            ));
        }
        if self.oss.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "oss.timeout_ms must be > 0".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.llm.temperature = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_rejects_max_tokens_over_limit() {
        let mut config = Config::default();
        config.llm.max_tokens = 5000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.oss.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("oss.timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
