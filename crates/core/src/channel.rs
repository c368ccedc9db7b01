//! Channel trait — the abstraction over outbound delivery.
//!
//! A Channel knows how to push a generated reply back to the chat platform
//! the user wrote from. Inbound parsing lives with each adapter since every
//! platform shapes its webhook payload differently.

use crate::error::ChannelError;
use crate::message::ConversationId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A message received from an inbound webhook, already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Conversation the message belongs to
    pub conversation_id: ConversationId,

    /// The text content
    pub text: String,
}

/// The core Channel trait.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "telegram").
    fn name(&self) -> &str;

    /// Send a reply to a specific chat.
    async fn send(
        &self,
        chat_id: &ConversationId,
        text: &str,
    ) -> std::result::Result<(), ChannelError>;

    /// Health check — is the channel usable?
    async fn health_check(&self) -> std::result::Result<bool, ChannelError> {
        Ok(true)
    }
}
