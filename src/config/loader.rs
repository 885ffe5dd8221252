// Configuration loader
// Loads settings from ~/.unsent/config.toml or environment variable

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{APP_DIR, CONFIG_FILE};
use super::settings::Config;

/// Load configuration from the config file or environment
pub fn load_config() -> Result<Config> {
    // Try loading from ~/.unsent/config.toml first
    if let Some(config) = try_load_from_file()? {
        return Ok(config);
    }

    // Fall back to environment variable
    if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
        if !api_key.is_empty() {
            let config = Config::new(api_key);
            config
                .validate()
                .context("Configuration validation failed")?;
            return Ok(config);
        }
    }

    // No config found - explain how to set one up
    bail!(
        "No configuration found.\n\n\
         Create ~/{app_dir}/{config_file} with at least:\n\n\
         api_key = \"sk-ant-...\"\n\n\
         Optional keys: model, max_tokens, api_base_url, request_timeout_secs,\n\
         data_dir, reflection_delay_minutes.\n\n\
         Alternatively, set environment variable:\n\
         export ANTHROPIC_API_KEY=\"sk-ant-...\"",
        app_dir = APP_DIR,
        config_file = CONFIG_FILE
    );
}

/// Load configuration from an explicit path. Unlike [`load_config`], a
/// missing file here is an error: the path was asked for by name.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config =
        parse_config(&contents).with_context(|| format!("Failed to parse {}", path.display()))?;

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn try_load_from_file() -> Result<Option<Config>> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };
    let config_path = home.join(APP_DIR).join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(None);
    }

    Ok(Some(load_config_from(&config_path)?))
}

fn parse_config(contents: &str) -> Result<Config> {
    // Every key except api_key is optional; absent keys keep their defaults.
    #[derive(serde::Deserialize)]
    struct FileConfig {
        api_key: String,
        model: Option<String>,
        max_tokens: Option<u32>,
        api_base_url: Option<String>,
        request_timeout_secs: Option<u64>,
        data_dir: Option<PathBuf>,
        reflection_delay_minutes: Option<i64>,
    }

    let file: FileConfig = toml::from_str(contents).context("Invalid TOML in config file")?;

    let mut config = Config::new(file.api_key);
    if let Some(model) = file.model {
        config.model = model;
    }
    if let Some(max_tokens) = file.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(base_url) = file.api_base_url {
        config.api_base_url = Some(base_url);
    }
    if let Some(timeout) = file.request_timeout_secs {
        config.request_timeout_secs = timeout;
    }
    if let Some(data_dir) = file.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(delay) = file.reflection_delay_minutes {
        config.reflection_delay_minutes = delay;
    }

    Ok(config)
}
