//! Telegram channel adapter.
//!
//! Inbound: the Bot API posts an `Update` to our webhook; only
//! `message.chat.id` and `message.text` are read, everything else is ignored.
//! Outbound: replies go through `sendMessage` over plain HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use relaybot_config::AppConfig;
use relaybot_core::channel::{Channel, InboundMessage};
use relaybot_core::error::ChannelError;
use relaybot_core::message::ConversationId;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Parser for Telegram webhook updates.
pub struct TelegramUpdate;

impl TelegramUpdate {
    /// Extract chat id and text; `None` when either is missing.
    ///
    /// Chat ids may be JSON integers or strings.
    pub fn parse(update: &Value) -> Option<InboundMessage> {
        let message = update.get("message")?;
        let text = message.get("text")?.as_str()?;
        let conversation_id = match message.get("chat")?.get("id")? {
            Value::Number(n) => ConversationId(n.to_string()),
            Value::String(s) => ConversationId(s.clone()),
            _ => return None,
        };
        Some(InboundMessage {
            conversation_id,
            text: text.to_string(),
        })
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Delivers replies through the Bot API `sendMessage` method.
pub struct TelegramChannel {
    api_base: String,
    token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("api_base", &self.api_base)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl TelegramChannel {
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChannelError::NotConfigured(format!("HTTP client: {e}")))?;
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    /// `None` when no bot token is configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, ChannelError> {
        let Some(token) = config.telegram_token.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        Self::new(
            &config.telegram.api_base,
            token,
            Duration::from_secs(config.telegram.timeout_secs),
        )
        .map(Some)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn delivery_failed(&self, reason: impl Into<String>) -> ChannelError {
        let reason: String = reason.into();
        ChannelError::DeliveryFailed {
            channel: "telegram".into(),
            reason: reason.replace(&self.token, "[REDACTED]"),
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &ConversationId, text: &str) -> Result<(), ChannelError> {
        debug!(chat_id = %chat_id, content_len = text.len(), "Sending Telegram message");

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessage {
                chat_id: chat_id.as_str(),
                text,
            })
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                if e.is_timeout() {
                    self.delivery_failed("sendMessage timed out")
                } else {
                    self.delivery_failed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.delivery_failed(format!("sendMessage returned {status}: {body}")));
        }

        info!(chat_id = %chat_id, "Reply delivered to Telegram");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, ChannelError> {
        let response = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| self.delivery_failed(e.without_url().to_string()))?;
        Ok(response.status().is_success())
    }
}
