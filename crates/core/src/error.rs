//! Error types for the relaybot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type; callers convert at the
//! edges (config load, gateway startup) rather than through a shared enum.

use thiserror::Error;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Unknown conversation: {0}")]
    UnknownConversation(String),
}

/// Errors in the static business definition (schedule windows, knowledge entries).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Time window {start}..{end} starts after it ends")]
    InvertedWindow { start: String, end: String },

    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Duplicate knowledge topic: {0}")]
    DuplicateTopic(String),

    #[error("Knowledge entry '{0}' must set exactly one of `fact` or `from_schedule`")]
    AmbiguousEntry(String),

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}
