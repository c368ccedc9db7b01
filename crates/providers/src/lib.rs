//! Completion provider implementations for relaybot.
//!
//! All providers implement the `relaybot_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use relaybot_config::AppConfig;
use relaybot_core::error::ProviderError;
use relaybot_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;

/// Build the completion provider from configuration.
///
/// Returns `Ok(None)` when no API key is configured; the reply generator
/// then answers with its "not configured" fallback instead of calling out.
pub fn build_from_config(config: &AppConfig) -> Result<Option<Arc<dyn Provider>>, ProviderError> {
    let Some(api_key) = config.openai_api_key.as_deref() else {
        tracing::warn!("OPENAI_API_KEY is not set; replies will use the fallback text");
        return Ok(None);
    };

    let provider = OpenAiCompatProvider::new(
        &config.provider.name,
        &config.provider.api_url,
        api_key,
        Duration::from_secs(config.provider.timeout_secs),
    )?;
    Ok(Some(Arc::new(provider)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_means_no_provider() {
        let config = AppConfig::default();
        assert!(build_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn key_builds_named_provider() {
        let config = AppConfig {
            openai_api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap().unwrap();
        assert_eq!(provider.name(), "openai");
    }
}
