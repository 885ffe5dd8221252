// Configuration structs

use anyhow::{bail, Result};
use std::path::PathBuf;

use super::constants::{
    APP_DIR, DEFAULT_CLAUDE_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_REFLECTION_DELAY_MINUTES,
    DEFAULT_REQUEST_TIMEOUT_SECS, JOURNAL_DIR,
};

#[derive(Debug, Clone)]
pub struct Config {
    /// Anthropic API key
    pub api_key: String,

    /// Model for classification and insight requests
    pub model: String,

    /// Maximum tokens per API request
    pub max_tokens: u32,

    /// Alternative API gateway (e.g. a local proxy). None means api.anthropic.com
    pub api_base_url: Option<String>,

    /// HTTP timeout for API requests, in seconds
    pub request_timeout_secs: u64,

    /// Directory holding the three journal collections
    pub data_dir: PathBuf,

    /// Minutes an entry rests before it can be revisited
    pub reflection_delay_minutes: i64,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_CLAUDE_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_base_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_dir: default_data_dir(),
            reflection_delay_minutes: DEFAULT_REFLECTION_DELAY_MINUTES,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!(
                "API key is empty\n\n\
                 Set api_key in ~/{}/{} or:\n  \
                 export ANTHROPIC_API_KEY=\"sk-ant-...\"",
                APP_DIR,
                super::constants::CONFIG_FILE
            );
        }

        // Key format checks only apply to the real endpoint; gateways
        // issue their own key shapes.
        if self.api_base_url.is_none() {
            if !self.api_key.starts_with("sk-ant-") {
                bail!(
                    "Claude API key has incorrect format\n\n\
                     Claude API keys start with 'sk-ant-'\n\
                     Get a valid key from:\n  \
                     https://console.anthropic.com/"
                );
            }
            if self.api_key.len() < 20 {
                bail!("Claude API key is too short (should be ~100+ characters)");
            }
        }

        if self.max_tokens == 0 {
            bail!("max_tokens must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if self.reflection_delay_minutes < 0 {
            bail!("reflection_delay_minutes cannot be negative");
        }

        Ok(())
    }
}

/// `~/.unsent/journal`, or a relative fallback when home cannot be found.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(APP_DIR).join(JOURNAL_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR).join(JOURNAL_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_key() -> String {
        format!("sk-ant-{}", "a".repeat(40))
    }

    #[test]
    fn test_new_fills_defaults() {
        let config = Config::new(valid_key());
        assert_eq!(config.model, DEFAULT_CLAUDE_MODEL);
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.reflection_delay_minutes, 1);
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn test_validate_accepts_well_formed_config() {
        assert!(Config::new(valid_key()).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        assert!(Config::new("   ").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_key_prefix() {
        let err = Config::new("sk-proj-12345678901234567890")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("sk-ant-"));
    }

    #[test]
    fn test_validate_rejects_short_key() {
        assert!(Config::new("sk-ant-short").validate().is_err());
    }

    #[test]
    fn test_gateway_config_skips_key_format_checks() {
        let mut config = Config::new("local-dev-token");
        config.api_base_url = Some("http://127.0.0.1:8080".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let mut config = Config::new(valid_key());
        config.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_delay() {
        let mut config = Config::new(valid_key());
        config.reflection_delay_minutes = -1;
        assert!(config.validate().is_err());
    }
}
