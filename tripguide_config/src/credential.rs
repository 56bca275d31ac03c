//! API key loading and the superficial shape check done before the first request.
//!
//! The check only looks at the prefix and surrounding whitespace. Real
//! validation happens when the completion service answers the first call.

use std::fmt;

use crate::ConfigError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const EXPECTED_PREFIX: &str = "sk-proj-";

const PREVIEW_CHARS: usize = 8;

/// Result of the shape check, in the order the checks are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    LooksValid,
    MissingPrefix,
    SurroundingWhitespace,
}

#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the key through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match lookup(API_KEY_VAR) {
            Some(key) if !key.is_empty() => Ok(Self(key)),
            _ => Err(ConfigError::MissingApiKey(API_KEY_VAR)),
        }
    }

    #[must_use]
    pub fn shape(&self) -> KeyShape {
        if !self.0.starts_with(EXPECTED_PREFIX) {
            KeyShape::MissingPrefix
        } else if self.0.trim() != self.0 {
            KeyShape::SurroundingWhitespace
        } else {
            KeyShape::LooksValid
        }
    }

    /// The first few characters, safe to show on screen.
    #[must_use]
    pub fn preview(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(PREVIEW_CHARS)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({}...)", self.preview())
    }
}
