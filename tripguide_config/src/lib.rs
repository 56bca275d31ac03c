#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod credential;
mod error;
mod schema;

pub use credential::{API_KEY_VAR, ApiKey, EXPECTED_PREFIX, KeyShape};
pub use error::ConfigError;
pub use schema::{CompletionConfig, Config, HistoryLimits, ProviderConfig};
