#![warn(
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

//! Multi-turn conversation support for the travel guide.
//!
//! # Key Features
//! - Request assembly: system prompt, prior turns, new input
//! - One append-only turn log with protocol and display projections
//! - Optional context window over past turns
//! - Completion failures turned into fallback replies, never loop errors

mod history;
mod manager;
mod session;

pub use history::{HistoryConfig, HistoryStats, HistoryWindow, build_request};
pub use manager::{
    ConversationConfig, ConversationError, ConversationManager, EXIT_KEYWORD, FALLBACK_MARKER,
    Reply, TurnResult, fallback_reply, is_exit_keyword,
};
pub use session::{ConversationSession, ReplyOutcome, TurnRecord};
