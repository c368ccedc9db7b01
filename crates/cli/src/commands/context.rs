//! `relaybot context` — Print the system prompt for a given instant.
//!
//! Useful for checking what the assistant is told about opening hours
//! without sending anything to the provider.

use std::path::Path;
use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use relaybot_agent::ContextAssembler;
use relaybot_core::clock::{Clock, FixedClock, SystemClock};

use super::{CommandResult, load_config};

/// Parse an RFC 3339 instant and move it into the business's zone.
pub fn parse_instant(at: &str, zone: Tz) -> Result<DateTime<Tz>, String> {
    DateTime::parse_from_rfc3339(at)
        .map(|t| t.with_timezone(&zone))
        .map_err(|e| format!("Invalid --at value '{at}': {e} (expected e.g. 2025-01-15T18:00:00-03:00)"))
}

pub async fn run(path: Option<&Path>, at: Option<&str>) -> CommandResult {
    let config = load_config(path).map_err(|e| format!("Failed to load config: {e}"))?;
    let zone = config.business.time_zone()?;

    let clock: Arc<dyn Clock> = match at {
        Some(at) => Arc::new(FixedClock(parse_instant(at, zone)?)),
        None => Arc::new(SystemClock::new(zone)),
    };

    let assembler = ContextAssembler::from_config(&config)?;
    println!("{}", assembler.system_prompt(&clock.now()));

    Ok(())
}
