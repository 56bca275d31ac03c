//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use tripguide_config::Config;
use tripguide_conversation::{ConversationConfig, HistoryConfig};

mod chat;
mod init;
mod version;

pub use chat::ChatStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Map the loaded config file onto conversation settings.
fn build_conversation_config(config: &Config) -> ConversationConfig {
    let history = HistoryConfig {
        max_turns: config.history.max_turns,
        max_chars: config.history.max_chars,
    };

    ConversationConfig::default()
        .with_options(config.completion_options())
        .with_history(history)
}

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
