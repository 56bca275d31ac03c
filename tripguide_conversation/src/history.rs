//! Request construction and the context window policy.
//!
//! The window decides how much of the transcript is sent with the next
//! request. It never removes anything from the session itself.

use tripguide_core::{ChatMessage, Role};

use crate::session::TurnRecord;

/// Assemble `[system] ++ history ++ [user]` for one request.
#[must_use]
pub fn build_request(
    system_prompt: &str,
    history: &[ChatMessage],
    user_input: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::user(user_input));
    messages
}

/// Limits on the context sent with each request.
///
/// Both limits default to `None`, which sends the whole transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of past turns to include
    pub max_turns: Option<usize>,
    /// Maximum characters across the included turns (approximate token limit)
    pub max_chars: Option<usize>,
}

impl HistoryConfig {
    #[must_use]
    pub const fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = Some(max);
        self
    }

    #[must_use]
    pub const fn with_max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.max_turns.is_none() && self.max_chars.is_none()
    }
}

/// A sliding window over the transcript.
///
/// Turns are dropped whole from the oldest end, so a user message is never
/// sent without the reply it received.
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    config: HistoryConfig,
}

impl HistoryWindow {
    #[must_use]
    pub const fn with_config(config: HistoryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn select_turns<'a>(&self, turns: &'a [TurnRecord]) -> &'a [TurnRecord] {
        let mut start = self
            .config
            .max_turns
            .map_or(0, |max| turns.len().saturating_sub(max));

        if let Some(max_chars) = self.config.max_chars {
            let mut total: usize = turns[start..].iter().map(TurnRecord::char_len).sum();
            while start < turns.len() && total > max_chars {
                total -= turns[start].char_len();
                start += 1;
            }
        }

        &turns[start..]
    }

    #[must_use]
    pub fn select_messages(&self, turns: &[TurnRecord]) -> Vec<ChatMessage> {
        self.select_turns(turns)
            .iter()
            .flat_map(TurnRecord::messages)
            .collect()
    }

    #[must_use]
    pub const fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

/// Statistics about a message history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub total_characters: usize,
    pub estimated_tokens: usize,
}

impl HistoryStats {
    #[must_use]
    pub fn of(history: &[ChatMessage]) -> Self {
        let total_characters: usize = history.iter().map(|m| m.content.chars().count()).sum();
        let user_messages = history.iter().filter(|m| m.role == Role::User).count();
        let assistant_messages = history.iter().filter(|m| m.role == Role::Assistant).count();

        Self {
            total_messages: history.len(),
            user_messages,
            assistant_messages,
            total_characters,
            estimated_tokens: total_characters / 4, // Rough estimate: 4 chars per token
        }
    }
}
