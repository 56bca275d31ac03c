use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("The {0} environment variable is not set.")]
    MissingApiKey(&'static str),

    #[error("temperature must be within [0, 1], got {0}")]
    InvalidTemperature(f32),

    #[error("max_tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("Cannot find home directory")]
    NoHomeDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file already exists at: {0}. Please edit it directly.")]
    AlreadyExists(PathBuf),
}
