//! # relaybot core
//!
//! Domain types, traits, and error definitions for the relaybot business
//! assistant. Every outbound seam (completion provider, delivery channel,
//! clock) is a trait here; implementations live in their own crates.
//!
//! The static business profile also lives here: the weekly opening
//! schedule and the knowledge base rendered into the assistant's prompt.

pub mod channel;
pub mod clock;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod provider;
pub mod schedule;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, InboundMessage};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ChannelError, MemoryError, ProfileError, ProviderError};
pub use knowledge::{FactSource, KnowledgeBase, KnowledgeEntry};
pub use message::{ConversationId, Role, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use schedule::{TimeWindow, WeeklySchedule};
