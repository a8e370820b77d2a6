// src/extract/date.rs

use chrono::{Datelike, NaiveDate};

/// Weekday labels, Sunday first, matching `num_days_from_sunday`.
const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Canonical `YYYY/MM/DD` form. Month and day are zero-padded to two digits
/// unconditionally.
pub fn format_date(d: NaiveDate) -> String {
    format!("{}/{:02}/{:02}", d.year(), d.month(), d.day())
}

/// Weekday label for `d`, from the fixed Sunday-first table.
pub fn day_of_week(d: NaiveDate) -> &'static str {
    WEEKDAYS[d.weekday().num_days_from_sunday() as usize]
}
