//! Wall-clock abstraction in the business's local time zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Source of "now" for anything that depends on the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

/// The real clock, converted into a fixed zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.zone)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Tz>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}
