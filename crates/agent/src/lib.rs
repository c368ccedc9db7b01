//! Reply pipeline for relaybot.
//!
//! For every inbound message the assistant:
//!
//! 1. **Assembles context** — persona prompt, knowledge base, current local
//!    day/time and the open/closed verdict (recomputed on every call)
//! 2. **Calls the provider** with that instruction turn plus the history
//! 3. **Falls back** to a fixed friendly text when the call cannot succeed

pub mod context;
pub mod reply;

pub use context::{ContextAssembler, capitalize, day_name, status_word};
pub use reply::{Reply, ReplyGenerator, ReplyOutcome};
