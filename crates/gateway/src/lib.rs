//! HTTP webhook gateway for relaybot.
//!
//! Exposes the Telegram and web-form webhooks plus a health check.
//! Every failure on the way (bad payload, provider down, delivery refused)
//! is answered with a JSON body and a 200; the process keeps serving.
//!
//! Built on Axum.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use relaybot_agent::ReplyGenerator;
use relaybot_channels::{TelegramChannel, TelegramUpdate, WebMessage};
use relaybot_config::AppConfig;
use relaybot_core::channel::Channel;
use relaybot_core::clock::{Clock, SystemClock};
use relaybot_core::message::Turn;
use relaybot_memory::ConversationStore;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub store: Arc<ConversationStore>,
    pub replies: Arc<ReplyGenerator>,
    /// `None` when no bot token is configured
    pub telegram: Option<Arc<dyn Channel>>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Wire provider, channel, store and reply generator from configuration.
    pub fn from_config(
        config: AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let provider = relaybot_providers::build_from_config(&config)?;
        let replies = Arc::new(ReplyGenerator::from_config(&config, provider, clock)?);
        let telegram = match TelegramChannel::from_config(&config)? {
            Some(channel) => Some(Arc::new(channel) as Arc<dyn Channel>),
            None => {
                warn!("TELEGRAM_TOKEN is not set; Telegram webhooks will be refused");
                None
            }
        };
        let store = Arc::new(ConversationStore::new(config.memory.max_turns));
        Ok(Self {
            config,
            store,
            replies,
            telegram,
        })
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook/telegram", post(telegram_handler))
        .route("/webhook/web", post(web_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let clock = Arc::new(SystemClock::new(config.business.time_zone()?));
    let state = Arc::new(GatewayState::from_config(config, clock)?);

    info!(
        addr = %addr,
        openai = state.replies.is_configured(),
        telegram = state.telegram.is_some(),
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    openai_configured: bool,
    telegram_configured: bool,
    webhook_url: String,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        openai_configured: state.config.has_openai_key(),
        telegram_configured: state.config.has_telegram_token(),
        webhook_url: state.config.gateway.webhook_url.clone(),
    })
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detalle: Option<String>,
}

impl StatusResponse {
    fn ok() -> Json<Self> {
        Json(Self {
            status: "ok",
            detalle: None,
        })
    }

    fn ignored() -> Json<Self> {
        Json(Self {
            status: "ignored",
            detalle: None,
        })
    }

    fn error(detalle: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: "error",
            detalle: Some(detalle.into()),
        })
    }
}

async fn telegram_handler(State(state): State<SharedState>, body: Bytes) -> Json<StatusResponse> {
    let Some(telegram) = state.telegram.clone() else {
        error!("Telegram webhook received but TELEGRAM_TOKEN is not set");
        return StatusResponse::error("Token de Telegram no configurado");
    };

    let inbound = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|update| TelegramUpdate::parse(&update));
    let Some(inbound) = inbound else {
        warn!("Telegram update without text or chat id, ignored");
        return StatusResponse::ignored();
    };

    let chat_id = inbound.conversation_id;
    info!(chat_id = %chat_id, message_len = inbound.text.len(), "Telegram message received");

    // Held until the assistant turn is recorded, so exchanges for one chat never interleave.
    let reply = {
        let mut conversation = state.store.lock(&chat_id).await;
        conversation.push_user(inbound.text);
        let reply = state.replies.reply(&conversation.turns()).await;
        conversation.push_assistant(reply.text.clone());
        reply
    };

    info!(chat_id = %chat_id, fallback = reply.is_fallback(), "Replying on Telegram");
    match telegram.send(&chat_id, &reply.text).await {
        Ok(()) => StatusResponse::ok(),
        Err(e) => {
            error!(chat_id = %chat_id, error = %e, "Telegram delivery failed");
            StatusResponse::error(e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct WebReply {
    respuesta: String,
}

async fn web_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<WebReply>, Json<StatusResponse>> {
    let mensaje = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|payload| WebMessage::parse(&payload))
        .ok_or_else(|| StatusResponse::error("Falta el campo 'mensaje'"))?;

    let conversation = &state.config.assistant.web_conversation_id;
    info!(conversation = %conversation, message_len = mensaje.len(), "Web message received");

    // Stateless: one transient turn, nothing is written to the store.
    let reply = state.replies.reply(&[Turn::user(mensaje)]).await;
    Ok(Json(WebReply {
        respuesta: reply.text,
    }))
}
