//! `relaybot serve` — Start the HTTP webhook server.

use std::path::Path;

use super::{CommandResult, load_config};

pub async fn run(config_path: Option<&Path>, port_override: Option<u16>) -> CommandResult {
    let mut config = load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🧇 relaybot gateway for {}", config.business.name);
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Telegram webhook: {}", config.gateway.webhook_url);

    relaybot_gateway::start(config).await?;

    Ok(())
}
