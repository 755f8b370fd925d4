use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Forecast payload for one location: current conditions plus daily and hourly records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    /// Wall-clock time at the location.
    pub local_time: NaiveDateTime,
    pub current: CurrentConditions,
    pub days: Vec<DayRecord>,
}

impl WeatherSnapshot {
    /// Hourly records of every forecast day, in payload order.
    pub fn hours(&self) -> impl Iterator<Item = &HourRecord> {
        self.days.iter().flat_map(|day| day.hours.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    /// Provider-relative icon path, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    pub icon: String,
    pub last_updated: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourRecord {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub icon: String,
    pub hours: Vec<HourRecord>,
}

/// Astronomy payload for one calendar date at one location.
///
/// Times are kept as the provider sends them (`"06:45 AM"`, `"No moonrise"`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstronomyInfo {
    pub moon_phase: String,
    pub moonrise: String,
    pub moonset: String,
    pub sunrise: String,
    pub sunset: String,
    pub is_sun_up: bool,
    pub local_time: NaiveDateTime,
}
