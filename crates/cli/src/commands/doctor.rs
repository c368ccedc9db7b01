//! `relaybot doctor` — Diagnose configuration and upstream reachability.

use std::path::Path;

use relaybot_channels::TelegramChannel;
use relaybot_core::channel::Channel;

use super::{CommandResult, config_path, load_config};

pub async fn run(path: Option<&Path>) -> CommandResult {
    println!("🩺 relaybot Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    let file = config_path(path);
    if file.exists() {
        println!("  ✅ Config file found at {}", file.display());
    } else {
        println!("  ⚠️  No config file at {} — using defaults", file.display());
    }

    let config = match load_config(path) {
        Ok(config) => {
            println!("  ✅ Config valid (schedule, knowledge base, time zone)");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running other checks.");
            return Ok(());
        }
    };

    match relaybot_providers::build_from_config(&config) {
        Ok(Some(provider)) => match provider.health_check().await {
            Ok(true) => println!("  ✅ {} reachable, API key accepted", provider.name()),
            Ok(false) => {
                println!("  ❌ {} rejected the request — check OPENAI_API_KEY", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ {} unreachable: {e}", provider.name());
                issues += 1;
            }
        },
        Ok(None) => {
            println!("  ⚠️  OPENAI_API_KEY not set — every reply will be the fallback text");
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Provider setup failed: {e}");
            issues += 1;
        }
    }

    match TelegramChannel::from_config(&config) {
        Ok(Some(channel)) => match channel.health_check().await {
            Ok(true) => println!("  ✅ Telegram bot token accepted"),
            Ok(false) => {
                println!("  ❌ Telegram rejected the bot token — check TELEGRAM_TOKEN");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Telegram unreachable: {e}");
                issues += 1;
            }
        },
        Ok(None) => {
            println!("  ⚠️  TELEGRAM_TOKEN not set — /webhook/telegram will refuse updates");
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Telegram setup failed: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
