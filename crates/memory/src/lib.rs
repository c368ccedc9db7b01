//! Conversation history for relaybot.
//!
//! Histories live for the lifetime of the process; nothing is persisted and
//! idle conversations are never evicted. Each conversation is capped at a
//! fixed number of turns, dropping the oldest first.

pub mod history;
pub mod store;

pub use history::ConversationHistory;
pub use store::{ConversationGuard, ConversationStore};

/// Turns kept per conversation unless configured otherwise.
pub const DEFAULT_MAX_TURNS: usize = 10;
