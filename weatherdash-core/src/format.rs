//! Parsing of provider date/time strings and formatting of display values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const LOCAL_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const TIME_OF_DAY_FORMATS: &[&str] = &["%I:%M %p", "%H:%M:%S", "%H:%M"];

/// Parse a provider local time, e.g. `2024-01-01 17:00` or `2024-01-01 17:00:00`.
pub fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    parse_with(s.trim(), LOCAL_DATETIME_FORMATS, NaiveDateTime::parse_from_str)
}

/// Parse a time of day, e.g. `06:45 AM`, `18:30` or `18:30:00`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    parse_with(s.trim(), TIME_OF_DAY_FORMATS, NaiveTime::parse_from_str)
}

fn parse_with<T>(
    s: &str,
    formats: &[&str],
    parse: fn(&str, &str) -> Result<T, chrono::ParseError>,
) -> Result<T, chrono::ParseError> {
    formats
        .iter()
        .skip(1)
        .fold(parse(s, formats[0]), |acc, fmt| acc.or_else(|_| parse(s, fmt)))
}

/// `3:05 PM • 1-Jan-2024`
pub fn clock_label(t: NaiveDateTime) -> String {
    t.format("%-I:%M %p • %-d-%b-%Y").to_string()
}

/// `3 PM`
pub fn hour_label(t: NaiveDateTime) -> String {
    t.format("%-I %p").to_string()
}

/// `Mon`
pub fn weekday_label(d: NaiveDate) -> String {
    d.format("%a").to_string()
}

/// `06:45 am`
pub fn sun_time_label(t: NaiveTime) -> String {
    t.format("%I:%M %P").to_string()
}

/// Round to the nearest integer, halves towards positive infinity (`-2.5` → `-2`).
pub fn round_temp(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// `23°`
pub fn degrees(value: f64) -> String {
    format!("{}°", round_temp(value))
}

/// `23°C`
pub fn celsius(value: f64) -> String {
    format!("{}°C", round_temp(value))
}

/// Provider icons are protocol-relative (`//cdn.weatherapi.com/...`).
pub fn icon_url(icon: &str) -> String {
    format!("https:{icon}")
}
