//! Selection and ordering of hourly and daily forecast records.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::model::{DayRecord, HourRecord};

/// Number of upcoming hours shown after the live "now" slot.
pub const UPCOMING_HOURS: usize = 6;

/// The first `count` records strictly after the current hour of `now`, or on a
/// later calendar day, keeping input order.
pub fn next_hours<'a, I>(hours: I, now: NaiveDateTime, count: usize) -> Vec<&'a HourRecord>
where
    I: IntoIterator<Item = &'a HourRecord>,
{
    let today = now.date();
    hours
        .into_iter()
        .filter(|h| {
            let date = h.time.date();
            date > today || (date == today && h.time.hour() > now.hour())
        })
        .take(count)
        .collect()
}

/// Days reordered so that `today` comes first and the rest follow wrapped around.
///
/// When no record matches `today` the original order is kept.
pub fn order_week(days: &[DayRecord], today: NaiveDate) -> Vec<&DayRecord> {
    let start = days.iter().position(|d| d.date == today).unwrap_or(0);
    let mut ordered: Vec<&DayRecord> = days.iter().collect();
    ordered.rotate_left(start);
    ordered
}
