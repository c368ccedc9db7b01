//! Reply generation: one provider call per inbound message.
//!
//! `generate` surfaces every failure as a [`ProviderError`]; `reply` is what
//! handlers call, and turns those failures into the configured fallback
//! text so a request never ends without something to send back.

use std::sync::Arc;
use std::time::Duration;

use relaybot_config::{AppConfig, ConfigError};
use relaybot_core::clock::Clock;
use relaybot_core::error::ProviderError;
use relaybot_core::message::Turn;
use relaybot_core::provider::{Provider, ProviderRequest};
use tracing::{debug, error, warn};

use crate::context::ContextAssembler;

/// How a [`Reply`] was produced.
#[derive(Debug, Clone)]
pub enum ReplyOutcome {
    /// Text came from the provider.
    Generated,
    /// Provider unavailable or failed; the text is a fixed fallback.
    Fallback(ProviderError),
}

/// Text to send back to the user.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub outcome: ReplyOutcome,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ReplyOutcome::Fallback(_))
    }
}

/// Sends persona + context + history to the provider.
pub struct ReplyGenerator {
    /// `None` when no API key is configured
    provider: Option<Arc<dyn Provider>>,
    assembler: Arc<ContextAssembler>,
    clock: Arc<dyn Clock>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
    fallback_unconfigured: String,
    fallback_error: String,
}

impl ReplyGenerator {
    /// Create a generator with default model settings (`gpt-3.5-turbo`, 0.3, 10 s).
    pub fn new(
        provider: Option<Arc<dyn Provider>>,
        assembler: Arc<ContextAssembler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let defaults = AppConfig::default();
        Self {
            provider,
            assembler,
            clock,
            model: defaults.provider.model,
            temperature: defaults.provider.temperature,
            max_tokens: Some(defaults.provider.max_tokens),
            timeout: Duration::from_secs(defaults.provider.timeout_secs),
            fallback_unconfigured: defaults.assistant.fallback_unconfigured,
            fallback_error: defaults.assistant.fallback_error,
        }
    }

    /// Build from configuration, with an already-constructed provider.
    pub fn from_config(
        config: &AppConfig,
        provider: Option<Arc<dyn Provider>>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let assembler = Arc::new(ContextAssembler::from_config(config)?);
        Ok(Self::new(provider, assembler, clock)
            .with_model(&config.provider.model, config.provider.temperature)
            .with_max_tokens(config.provider.max_tokens)
            .with_timeout(Duration::from_secs(config.provider.timeout_secs))
            .with_fallbacks(
                &config.assistant.fallback_unconfigured,
                &config.assistant.fallback_error,
            ))
    }

    pub fn with_model(mut self, model: impl Into<String>, temperature: f32) -> Self {
        self.model = model.into();
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Upper bound for one provider call, enforced independently of the HTTP client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallbacks(
        mut self,
        unconfigured: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        self.fallback_unconfigured = unconfigured.into();
        self.fallback_error = error.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    /// The full provider request for `history` at the current instant.
    pub fn build_request(&self, history: &[Turn]) -> ProviderRequest {
        let now = self.clock.now();
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Turn::system(self.assembler.system_prompt(&now)));
        messages.extend_from_slice(history);
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Ask the provider for a reply to `history`.
    pub async fn generate(&self, history: &[Turn]) -> Result<String, ProviderError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured("OPENAI_API_KEY is not set".into()))?;

        let request = self.build_request(history);
        debug!(
            provider = provider.name(),
            model = %request.model,
            turns = history.len(),
            "Requesting reply"
        );

        let response = tokio::time::timeout(self.timeout, provider.complete(request))
            .await
            .map_err(|_| ProviderError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            })??;

        if response.content.trim().is_empty() {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: "Empty completion".into(),
            });
        }
        Ok(response.content)
    }

    /// Generate a reply, substituting the fallback text on any failure.
    pub async fn reply(&self, history: &[Turn]) -> Reply {
        match self.generate(history).await {
            Ok(text) => Reply {
                text,
                outcome: ReplyOutcome::Generated,
            },
            Err(e @ ProviderError::NotConfigured(_)) => {
                warn!(error = %e, "Completion provider not configured");
                Reply {
                    text: self.fallback_unconfigured.clone(),
                    outcome: ReplyOutcome::Fallback(e),
                }
            }
            Err(e) => {
                error!(error = %e, "Completion call failed");
                Reply {
                    text: self.fallback_error.clone(),
                    outcome: ReplyOutcome::Fallback(e),
                }
            }
        }
    }
}
