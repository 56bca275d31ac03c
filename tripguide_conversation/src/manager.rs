//! Conversation manager for the travel-planning chat.
//!
//! The `ConversationManager` turns one user utterance into a reply and
//! records the exchange in the session it is handed.

use std::io::{BufRead, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use tripguide_core::{
    ChatMessage, CompletionError, CompletionOptions, LLMProvider, LLMResponse, SYSTEM_PROMPT,
    Usage,
};

use crate::history::{HistoryConfig, HistoryStats, HistoryWindow, build_request};
use crate::session::{ConversationSession, ReplyOutcome};

/// Prefix of every reply substituted for a failed completion call.
pub const FALLBACK_MARKER: &str = "⚠️ API Error:";

/// Word that ends the interactive loop, matched case-insensitively.
pub const EXIT_KEYWORD: &str = "exit";

const WELCOME: &str = "Welcome to the local city guide chatbot! 🌍";
const INSTRUCTIONS: &str =
    "Please provide your travel details (e.g., number of people, date, interests).";
const INPUT_PROMPT: &str = "Enter your travel details or type 'exit' to quit: ";
const REPLY_HEADER: &str = "Assistant's Plan:";
const FAREWELL: &str = "Thank you for using the Travel Guide Bot! Have a great trip! ✈️";

/// Configuration for conversation management.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// Model and sampling parameters
    pub options: CompletionOptions,
    /// Instruction template sent first with every request
    pub system_prompt: String,
    /// Context window applied when building requests
    pub history: HistoryConfig,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            options: CompletionOptions::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            history: HistoryConfig::default(),
        }
    }
}

impl ConversationConfig {
    #[must_use]
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }
}

/// Errors that can end the interactive loop.
///
/// Completion failures never show up here; they become fallback replies.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reply text for one request, with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub outcome: ReplyOutcome,
    pub usage: Option<Usage>,
}

impl Reply {
    /// Convert a completion result into display text, substituting the
    /// fallback message on failure.
    #[must_use]
    pub fn from_result(result: Result<LLMResponse, CompletionError>) -> Self {
        match result {
            Ok(response) => Self {
                text: response.content.trim().to_string(),
                outcome: ReplyOutcome::Completed,
                usage: response.usage,
            },
            Err(e) => Self {
                text: fallback_reply(&e),
                outcome: ReplyOutcome::Fallback,
                usage: None,
            },
        }
    }
}

#[must_use]
pub fn fallback_reply(err: &CompletionError) -> String {
    format!("{FALLBACK_MARKER} {err}")
}

#[must_use]
pub fn is_exit_keyword(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(EXIT_KEYWORD)
}

/// Result of processing a conversation turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub reply: String,
    pub outcome: ReplyOutcome,
    pub usage: Option<Usage>,
    pub turn_number: usize,
}

pub struct ConversationManager<P = Arc<dyn LLMProvider>>
where
    P: Send + Sync,
{
    provider: P,
    config: ConversationConfig,
    window: HistoryWindow,
}

impl<P> ConversationManager<P>
where
    P: LLMProvider + Send + Sync,
{
    pub fn new(provider: P, config: ConversationConfig) -> Self {
        info!(
            "Creating conversation manager: model={}, temperature={}, max_tokens={}",
            config.options.model, config.options.temperature, config.options.max_tokens
        );
        let window = HistoryWindow::with_config(config.history);
        Self {
            provider,
            config,
            window,
        }
    }

    /// Messages for the next request: system prompt, windowed history, new input.
    #[must_use]
    pub fn build_request(&self, session: &ConversationSession, user_input: &str) -> Vec<ChatMessage> {
        let history = self.window.select_messages(session.turns());
        build_request(&self.config.system_prompt, &history, user_input)
    }

    /// Send the messages to the completion service.
    pub async fn request_completion(
        &self,
        messages: &[ChatMessage],
    ) -> Result<LLMResponse, CompletionError> {
        for (i, msg) in messages.iter().enumerate() {
            debug!(
                "Message {}: role={:?}, content_len={}",
                i,
                msg.role,
                msg.content.len()
            );
        }
        self.provider.chat(messages, &self.config.options).await
    }

    /// Like [`Self::request_completion`], but failures come back as fallback text.
    pub async fn request_reply(&self, messages: &[ChatMessage]) -> Reply {
        let reply = Reply::from_result(self.request_completion(messages).await);
        if reply.outcome == ReplyOutcome::Fallback {
            warn!("Completion failed, showing fallback reply: {}", reply.text);
        }
        reply
    }

    /// Append the exchange to the session and return the turn number.
    pub fn record_turn(
        &self,
        session: &mut ConversationSession,
        user_input: &str,
        reply: &Reply,
    ) -> usize {
        session.record_turn(user_input, reply.text.as_str(), reply.outcome)
    }

    /// Process a single conversation turn.
    pub async fn run_turn(&self, session: &mut ConversationSession, user_input: &str) -> TurnResult {
        info!(
            "Processing turn {} for session: {}",
            session.turn_count() + 1,
            session.id
        );

        let messages = self.build_request(session, user_input);
        let reply = self.request_reply(&messages).await;
        let turn_number = self.record_turn(session, user_input, &reply);

        debug!("Turn {turn_number} completed ({:?})", reply.outcome);

        TurnResult {
            reply: reply.text,
            outcome: reply.outcome,
            usage: reply.usage,
            turn_number,
        }
    }

    /// Run the chat loop on stdin and stdout.
    pub async fn run_interactive(
        &self,
        session: &mut ConversationSession,
    ) -> Result<(), ConversationError> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run_loop(session, stdin.lock(), stdout.lock()).await
    }

    /// Run the chat loop until the exit keyword or end of input.
    pub async fn run_loop<R, W>(
        &self,
        session: &mut ConversationSession,
        mut input: R,
        mut output: W,
    ) -> Result<(), ConversationError>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(output, "{WELCOME}")?;
        writeln!(output, "{INSTRUCTIONS}")?;

        loop {
            write!(output, "\n{INPUT_PROMPT}")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            if is_exit_keyword(&line) {
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let result = self.run_turn(session, line).await;
            writeln!(output, "\n{REPLY_HEADER}")?;
            writeln!(output, "{}", result.reply)?;
        }

        writeln!(output, "{FAREWELL}")?;
        output.flush()?;

        let stats = HistoryStats::of(&session.protocol_history());
        info!(
            "Session {} ended: {} turns, {} characters (~{} tokens)",
            session.id,
            session.turn_count(),
            stats.total_characters,
            stats.estimated_tokens
        );

        Ok(())
    }
}
