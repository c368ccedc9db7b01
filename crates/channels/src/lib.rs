//! Channel adapters for relaybot.
//!
//! Each adapter knows how to read its platform's inbound webhook payload and,
//! where the platform expects a push, how to deliver the reply.
//!
//! Available channels:
//! - **Telegram** — Bot API webhook updates in, `sendMessage` out
//! - **Web** — form payloads answered inline in the HTTP response

pub mod telegram;
pub mod web;

pub use telegram::{TelegramChannel, TelegramUpdate};
pub use web::WebMessage;
