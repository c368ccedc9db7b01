//! Weekly opening hours — the schedule oracle.
//!
//! The business runs on two fixed windows: one for Monday–Friday and one for
//! Saturday–Sunday. Windows never cross midnight and both ends are inclusive.

use crate::error::ProfileError;
use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Weekday};

/// A daily open/close pair. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ProfileError> {
        if start > end {
            return Err(ProfileError::InvertedWindow {
                start: format_hhmm(start),
                end: format_hhmm(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Build a window from two `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, ProfileError> {
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Inclusive on both ends; the date part of the caller's clock is ignored.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Opening hours for a whole week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    weekday: TimeWindow,
    weekend: TimeWindow,
}

impl WeeklySchedule {
    pub fn new(weekday: TimeWindow, weekend: TimeWindow) -> Self {
        Self { weekday, weekend }
    }

    pub fn weekday(&self) -> &TimeWindow {
        &self.weekday
    }

    pub fn weekend(&self) -> &TimeWindow {
        &self.weekend
    }

    /// Window that applies on `day` (Monday..Friday → weekday, otherwise weekend).
    pub fn window_for(&self, day: Weekday) -> &TimeWindow {
        if day.num_days_from_monday() < 5 {
            &self.weekday
        } else {
            &self.weekend
        }
    }

    /// Whether the business is open at `now`.
    ///
    /// `now` must already be expressed in the business's local zone; the
    /// oracle reads its weekday and wall-clock time as-is.
    pub fn is_open<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.window_for(now.weekday()).contains(now.time())
    }

    /// Human-readable opening hours, e.g.
    /// `"De lunes a viernes entre las 16:00 y 21:00. Sábado y domingo entre 15:30 y 21:30."`
    pub fn render_text(&self) -> String {
        format!(
            "De lunes a viernes entre las {} y {}. Sábado y domingo entre {} y {}.",
            format_hhmm(self.weekday.start),
            format_hhmm(self.weekday.end),
            format_hhmm(self.weekend.start),
            format_hhmm(self.weekend.end),
        )
    }
}

impl Default for WeeklySchedule {
    /// Monday–Friday 16:00–21:00, Saturday–Sunday 15:30–21:30.
    fn default() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        Self {
            weekday: TimeWindow {
                start: hm(16, 0),
                end: hm(21, 0),
            },
            weekend: TimeWindow {
                start: hm(15, 30),
                end: hm(21, 30),
            },
        }
    }
}

/// Zero-padded 24-hour `HH:MM`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, ProfileError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ProfileError::InvalidTime(s.to_string()))
}
