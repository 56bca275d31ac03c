use tripguide_config::{API_KEY_VAR, Config};

/// Strategy for initializing the configuration.
///
/// Writes the default settings to `~/tripguide/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;

        println!("✅ Created config file at: {}", path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Export your API key: export {API_KEY_VAR}=sk-proj-...");
        println!("   2. Run 'tripguide' to start planning a trip");
        println!();
        println!("🔧 Configuration options:");
        println!("   - completion.model: chat model to use (gpt-4o-mini, gpt-4o, etc.)");
        println!("   - completion.temperature: 0 to 1, lower is more deterministic");
        println!("   - completion.max_tokens: cap on reply length");
        println!("   - history.max_turns / history.max_chars: limit the context sent per request");
        println!();
        Ok(())
    }
}
