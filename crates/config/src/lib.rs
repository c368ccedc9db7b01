//! Configuration loading, validation, and management for relaybot.
//!
//! Loads configuration from `~/.relaybot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

pub mod profile;

pub use profile::{BusinessConfig, KnowledgeEntryConfig, ScheduleConfig, WindowConfig};

use relaybot_core::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.relaybot/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion service API key (`OPENAI_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    /// Telegram bot token (`TELEGRAM_TOKEN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_token: Option<String>,

    /// HTTP server settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Completion service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Persona prompt and fallback texts
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Conversation history settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Opening hours and knowledge entries
    #[serde(default)]
    pub business: BusinessConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("gateway", &self.gateway)
            .field("provider", &self.provider)
            .field("telegram", &self.telegram)
            .field("assistant", &self.assistant)
            .field("memory", &self.memory)
            .field("business", &self.business)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Public URL registered with Telegram, reported by `/health`
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_webhook_url() -> String {
    "https://bot-go-waffles.onrender.com/webhook/telegram".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            webhook_url: default_webhook_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Label used in logs
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "openai".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    400
}
fn default_provider_timeout() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_provider_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    #[serde(default = "default_delivery_timeout")]
    pub timeout_secs: u64,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".into()
}
fn default_delivery_timeout() -> u64 {
    5
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            timeout_secs: default_delivery_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Persona and policy prompt; the assembled context is appended to it
    #[serde(default = "default_persona_prompt")]
    pub persona_prompt: String,

    /// Reply used when no completion API key is configured
    #[serde(default = "default_fallback_unconfigured")]
    pub fallback_unconfigured: String,

    /// Reply used when the completion call fails or times out
    #[serde(default = "default_fallback_error")]
    pub fallback_error: String,

    /// Identifier the stateless web-form exchanges are tagged with
    #[serde(default = "default_web_conversation_id")]
    pub web_conversation_id: String,
}

fn default_persona_prompt() -> String {
    DEFAULT_PERSONA_PROMPT.trim().into()
}
fn default_fallback_unconfigured() -> String {
    "⚠️ Ups, no tengo acceso a mi cerebro. Por favor avisa al equipo de Go Waffles.".into()
}
fn default_fallback_error() -> String {
    "¡Ups! Tuve un pequeño error al pensar mi respuesta. ¿Puedes repetirme tu pregunta? 🧇".into()
}
fn default_web_conversation_id() -> String {
    "web_test".into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona_prompt: default_persona_prompt(),
            fallback_unconfigured: default_fallback_unconfigured(),
            fallback_error: default_fallback_error(),
            web_conversation_id: default_web_conversation_id(),
        }
    }
}

const DEFAULT_PERSONA_PROMPT: &str = r#"
Eres el asistente virtual de Go Waffles 🍓.
Responde solo preguntas relacionadas con el negocio usando EXCLUSIVAMENTE la información proporcionada en el contexto a continuación.

❗ REGLAS ESTRICTAS:
- NO inventes nombres de productos, sabores, ingredientes, toppings, waffles, milkshakes, combos o promociones.
- Si el usuario pregunta por algo específico (ej: "¿tienen con frutilla?", "¿qué waffles tienen?", "¿recomiendas algo?"), NO menciones ejemplos ni descripciones.
- En su lugar, responde amablemente que puede ver TODOS los productos en gowaffles.cl/pedir.
- Si la información de referencia no contiene una lista explícita de productos o sabores, asume que NO puedes recomendar nada por nombre.
- Usa un tono juvenil, cercano y emojis cuando quede bien 😄, pero prioriza la exactitud sobre la creatividad.
- Si no sabes algo, di que escriba a contacto@gowaffles.cl ✉️.
- Si ya estás en medio de una conversación (el usuario ya te ha escrito antes), NO debes saludar con "¡Hola!" ni frases de bienvenida. Ve directo al punto.

✅ Tu única respuesta segura ante preguntas de productos es:
"¡Tenemos una variedad rica de waffles dulces, salados, milkshakes y más! Puedes ver todos los productos y armar tu pedido en gowaffles.cl/pedir 🧇"

No alteres los enlaces. Respétalos exactamente como aparecen.
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Turns kept per conversation; older turns are discarded
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

fn default_max_turns() -> usize {
    10
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.relaybot/config.toml).
    ///
    /// Environment variables override the file:
    /// - `OPENAI_API_KEY`, `TELEGRAM_TOKEN` (secrets)
    /// - `PORT` (listen port)
    /// - `RELAYBOT_MODEL` (completion model)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from `path`, then apply process environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Empty values count as unset, so `TELEGRAM_TOKEN=` disables Telegram.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(token) = non_empty("TELEGRAM_TOKEN") {
            self.telegram_token = Some(token);
        }
        if let Some(port) = non_empty("PORT") {
            self.gateway.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("PORT is not a port number: {port}")))?;
        }
        if let Some(model) = non_empty("RELAYBOT_MODEL") {
            self.provider.model = model;
        }

        // Blank secrets from the file are treated as missing too.
        self.openai_api_key = self.openai_api_key.take().filter(|v| !v.trim().is_empty());
        self.telegram_token = self.telegram_token.take().filter(|v| !v.trim().is_empty());
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".relaybot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.memory.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "memory.max_turns must be at least 1".into(),
            ));
        }

        if self.provider.timeout_secs == 0 || self.telegram.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be at least 1 second".into(),
            ));
        }

        self.business.time_zone()?;
        self.business.knowledge_base()?;
        Ok(())
    }

    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn has_telegram_token(&self) -> bool {
        self.telegram_token.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid business profile: {0}")]
    Profile(#[from] ProfileError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.memory.max_turns, 10);
        assert!((config.provider.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.telegram.timeout_secs, 5);
        assert!(!config.has_openai_key());
    }

    #[test]
    fn config_roundtrip_toml() {
        let toml_str = AppConfig::default_toml();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, 8000);
        assert_eq!(parsed.business.knowledge.len(), 13);
        assert!(parsed.business.knowledge[1].from_schedule);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.provider.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_history_rejected() {
        let mut config = AppConfig::default();
        config.memory.max_turns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.business.name, "Go Waffles");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[gateway]
port = 9090

[business.schedule.weekend]
start = "12:00"
end = "20:00"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.gateway.port, 9090);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.business.schedule.weekend.start, "12:00");
        assert_eq!(config.business.schedule.weekday.start, "16:00");
    }

    #[test]
    fn inverted_window_in_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[business.schedule.weekday]
start = "23:00"
end = "01:00"
"#,
        )
        .unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Profile(ProfileError::InvertedWindow { .. })));
    }

    #[test]
    fn duplicate_topic_in_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[[business.knowledge]]
topic = "carta"
fact = "uno"

[[business.knowledge]]
topic = "carta"
fact = "dos"
"#,
        )
        .unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("carta"));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "gateway = [not toml").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }

    #[test]
    fn env_overrides_applied() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("TELEGRAM_TOKEN", "123:abc"),
                ("PORT", "10000"),
                ("RELAYBOT_MODEL", "gpt-4o-mini"),
            ]))
            .unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert!(config.has_telegram_token());
        assert_eq!(config.gateway.port, 10000);
        assert_eq!(config.provider.model, "gpt-4o-mini");
    }

    #[test]
    fn empty_env_secret_counts_as_missing() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(!config.has_openai_key());
    }

    #[test]
    fn bad_port_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig {
            openai_api_key: Some("sk-very-secret".into()),
            telegram_token: Some("123:bot-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(!debug.contains("bot-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
