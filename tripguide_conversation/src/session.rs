//! Session state for one interactive run.
//!
//! The session keeps a single append-only log of turns. The role-tagged
//! message list sent to the completion service and the `(input, reply)`
//! pairs shown to the user are both derived from that log, so they can
//! never drift apart.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use tripguide_core::ChatMessage;

/// How the reply of a turn was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The completion service answered.
    Completed,
    /// The call failed and the reply is the error text shown instead.
    Fallback,
}

/// One user input paired with the reply it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub user_input: String,
    pub reply: String,
    pub outcome: ReplyOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl TurnRecord {
    /// The user message followed by the assistant message.
    #[must_use]
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::user(self.user_input.as_str()),
            ChatMessage::assistant(self.reply.as_str()),
        ]
    }

    /// Characters (not bytes) across both sides of the turn.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.user_input.chars().count() + self.reply.chars().count()
    }
}

#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    turns: Vec<TurnRecord>,
}

impl ConversationSession {
    /// Create a session with empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    /// Append a finished turn and return its 1-based number.
    pub fn record_turn(
        &mut self,
        user_input: impl Into<String>,
        reply: impl Into<String>,
        outcome: ReplyOutcome,
    ) -> usize {
        self.turns.push(TurnRecord {
            user_input: user_input.into(),
            reply: reply.into(),
            outcome,
            recorded_at: Utc::now(),
        });
        debug_assert!(self.histories_in_lockstep());
        self.turns.len()
    }

    #[must_use]
    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    /// Get the last N turns.
    #[must_use]
    pub fn last_n_turns(&self, n: usize) -> &[TurnRecord] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    #[must_use]
    pub const fn turn_count(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.turns.len() * 2
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Role-tagged context for the next request, oldest first.
    #[must_use]
    pub fn protocol_history(&self) -> Vec<ChatMessage> {
        self.turns.iter().flat_map(TurnRecord::messages).collect()
    }

    /// `(input, reply)` pairs for display, oldest first.
    #[must_use]
    pub fn display_history(&self) -> Vec<(&str, &str)> {
        self.turns
            .iter()
            .map(|t| (t.user_input.as_str(), t.reply.as_str()))
            .collect()
    }

    fn histories_in_lockstep(&self) -> bool {
        self.display_history().len() * 2 == self.protocol_history().len()
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
