use chrono::{Duration, Local, NaiveDate};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// The current local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Offsets `day` by `days` (negative goes back), saturating at the calendar bounds.
pub fn add_days(day: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|offset| day.checked_add_signed(offset))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

pub fn day_key(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).ok()
}

/// "Jan 5"
pub fn format_display(day: NaiveDate) -> String {
    day.format("%b %-d").to_string()
}

/// "January 2024"
pub fn month_year(day: NaiveDate) -> String {
    day.format("%B %Y").to_string()
}
