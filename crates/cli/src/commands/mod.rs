pub mod context;
pub mod doctor;
pub mod serve;
pub mod status;

use std::path::{Path, PathBuf};

use relaybot_config::{AppConfig, ConfigError};

pub type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Load the config file (explicit path or the default) with environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
}

pub fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}
