//! Interactive travel-planning conversation.

use tracing::info;
use tripguide_config::{ApiKey, Config, EXPECTED_PREFIX, KeyShape};
use tripguide_conversation::{ConversationManager, ConversationSession};
use tripguide_providers::OpenAIProvider;

use super::build_conversation_config;

/// Strategy for executing the Chat command.
///
/// - Checks the API key before anything else; a missing key ends the run
/// - Loads the optional config file
/// - Runs the read/plan/print loop until the exit keyword
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let api_key = ApiKey::from_env().inspect_err(|_| println!("No API key was found"))?;
        println!("{}", key_shape_notice(&api_key));

        let config = Config::load()?;
        let provider =
            OpenAIProvider::new(api_key.into_inner()).with_base_url(config.provider.base_url.clone());
        let manager = ConversationManager::new(provider, build_conversation_config(&config));

        let mut session = ConversationSession::new();
        info!("Starting conversation session: {}", session.id);

        manager.run_interactive(&mut session).await?;

        info!(
            "Conversation ended: {} total messages",
            session.message_count()
        );
        Ok(())
    }
}

/// Advisory shown after the shape check. Execution continues in every case.
fn key_shape_notice(key: &ApiKey) -> String {
    match key.shape() {
        KeyShape::MissingPrefix => format!(
            "An API key was found, but it doesn't start with {EXPECTED_PREFIX}; please check you're using the right key"
        ),
        KeyShape::SurroundingWhitespace => "An API key was found, but it looks like it might have space or tab characters at the start or end - please remove them".to_string(),
        KeyShape::LooksValid => format!(
            "✅ API key found and looks good so far! Begins with {}",
            key.preview()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> ApiKey {
        ApiKey::from_lookup(|_| Some(value.to_string())).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_notice_for_each_shape() {
        assert_eq!(
            key_shape_notice(&key("sk-proj-abcdef")),
            "✅ API key found and looks good so far! Begins with sk-proj-"
        );
        assert!(key_shape_notice(&key("sk-abcdef")).contains("doesn't start with sk-proj-"));
        assert!(key_shape_notice(&key("sk-proj-abcdef\t")).contains("space or tab characters"));
    }
}
