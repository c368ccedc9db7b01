//! `relaybot status` — Show the effective configuration.

use std::path::Path;

use super::{CommandResult, config_path, load_config};

fn configured(flag: bool) -> &'static str {
    if flag { "configured" } else { "missing" }
}

pub async fn run(path: Option<&Path>) -> CommandResult {
    let config = load_config(path).map_err(|e| format!("Failed to load config: {e}"))?;
    let business = &config.business;

    println!("🧇 relaybot Status");
    println!("==================");
    println!("  Business:     {} ({})", business.name, business.location);
    println!("  Time zone:    {}", business.timezone);
    println!(
        "  Weekdays:     {}-{}",
        business.schedule.weekday.start, business.schedule.weekday.end
    );
    println!(
        "  Weekends:     {}-{}",
        business.schedule.weekend.start, business.schedule.weekend.end
    );
    println!("  Knowledge:    {} entries", business.knowledge.len());
    println!("  Provider:     {} ({})", config.provider.name, config.provider.api_url);
    println!("  Model:        {}", config.provider.model);
    println!("  Temperature:  {}", config.provider.temperature);
    println!("  History:      {} turns per chat", config.memory.max_turns);
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  OpenAI key:   {}", configured(config.has_openai_key()));
    println!("  Telegram:     {}", configured(config.has_telegram_token()));

    let file = config_path(path);
    if file.exists() {
        println!("\n  ✅ Config file found at {}", file.display());
    } else {
        println!("\n  ⚠️  No config file at {} — using defaults", file.display());
    }

    Ok(())
}
