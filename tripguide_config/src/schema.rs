use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tripguide_core::CompletionOptions;

use crate::ConfigError;

/// Optional settings read from `~/tripguide/config.json`.
///
/// Every section falls back to its defaults, so a missing file or a file
/// with only some keys is fine. The API key never lives here.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub history: HistoryLimits,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CompletionConfig {
    #[serde(default = "CompletionConfig::default_model")]
    pub model: String,
    #[serde(default = "CompletionConfig::default_temperature")]
    pub temperature: f32,
    #[serde(default = "CompletionConfig::default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            temperature: Self::default_temperature(),
            max_tokens: Self::default_max_tokens(),
        }
    }
}

impl CompletionConfig {
    fn default_model() -> String {
        CompletionOptions::DEFAULT_MODEL.to_string()
    }

    const fn default_temperature() -> f32 {
        CompletionOptions::DEFAULT_TEMPERATURE
    }

    const fn default_max_tokens() -> u32 {
        CompletionOptions::DEFAULT_MAX_TOKENS
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
        }
    }
}

impl ProviderConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }
}

/// Context window limits. `None` means unbounded.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

impl Config {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        Ok(dirs::home_dir()
            .ok_or(ConfigError::NoHomeDir)?
            .join("tripguide"))
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load from the default location, using defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature = self.completion.temperature;
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        if self.completion.max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }
        Ok(())
    }

    #[must_use]
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.completion.model.clone(),
            temperature: self.completion.temperature,
            max_tokens: self.completion.max_tokens,
        }
    }

    /// Write a template with the default settings, refusing to overwrite.
    pub fn create_config() -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        Self::create_config_at(&path)?;
        Ok(path)
    }

    pub fn create_config_at(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }

        let template = serde_json::to_string_pretty(&Self::default()).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, template).map_err(write_err)?;
        Ok(())
    }
}
