//! Time until the next sunrise or sunset.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::{format::parse_time_of_day, model::AstronomyInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SunEvent {
    Sunrise,
    Sunset,
}

impl SunEvent {
    pub fn label(&self) -> &'static str {
        match self {
            SunEvent::Sunrise => "Sunrise in:",
            SunEvent::Sunset => "Sunset in:",
        }
    }
}

/// Seconds until the next sun event, computed once per data refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub event: SunEvent,
    pub target: NaiveDateTime,
    /// Negative only when the provider's `is_sun_up` flag disagrees with the times.
    pub seconds: i64,
}

impl Countdown {
    /// While the sun is up the target is today's sunset. Otherwise it is
    /// today's sunrise, or tomorrow's once today's has already passed.
    pub fn compute(
        sunrise: NaiveTime,
        sunset: NaiveTime,
        is_sun_up: bool,
        now: NaiveDateTime,
    ) -> Self {
        let today = now.date();

        let (event, target) = if is_sun_up {
            (SunEvent::Sunset, today.and_time(sunset))
        } else {
            let candidate = today.and_time(sunrise);
            let target = if candidate < now {
                today.succ_opt().unwrap_or(today).and_time(sunrise)
            } else {
                candidate
            };
            (SunEvent::Sunrise, target)
        };

        Self { event, target, seconds: (target - now).num_seconds() }
    }

    /// Countdown from an astronomy payload, relative to the payload's own local time.
    pub fn from_astronomy(astro: &AstronomyInfo) -> Result<Self, chrono::ParseError> {
        let sunrise = parse_time_of_day(&astro.sunrise)?;
        let sunset = parse_time_of_day(&astro.sunset)?;
        Ok(Self::compute(sunrise, sunset, astro.is_sun_up, astro.local_time))
    }

    pub fn label(&self) -> &'static str {
        self.event.label()
    }

    /// Compact display string; negative durations show as `0s`.
    pub fn formatted(&self) -> String {
        format_duration(self.seconds.max(0).unsigned_abs())
    }
}

/// `3661` → `1h 1m 1s`, `3600` → `1h`, `0` → `0s`.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if h > 0 {
        parts.push(format!("{h}h"));
    }
    if m > 0 {
        parts.push(format!("{m}m"));
    }
    if s > 0 || parts.is_empty() {
        parts.push(format!("{s}s"));
    }

    parts.join(" ")
}
