use crate::dates::{add_days, format_display, month_year};
use crate::models::CheckIn;
use crate::registry::PrayerType;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_HISTORY_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryRow {
    MonthHeader { month_year: String },
    Day(HistoryDay),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryDay {
    pub date: NaiveDate,
    pub display_date: String,
    pub month_year: String,
    pub checked: bool,
    pub prayer_type: Option<PrayerType>,
    pub prayer_label: Option<String>,
}

/// Lays out the `days` calendar days ending at `today`, newest first, with a
/// month header ahead of the first day of each month seen.
pub fn project_at<'a>(
    today: NaiveDate,
    days: u32,
    check_ins: impl IntoIterator<Item = &'a CheckIn>,
) -> Vec<HistoryRow> {
    let by_date: HashMap<NaiveDate, &CheckIn> = check_ins
        .into_iter()
        .map(|check_in| (check_in.date, check_in))
        .collect();

    let mut rows = Vec::with_capacity(days as usize + 2);
    let mut last_month = String::new();

    for offset in 0..i64::from(days) {
        let date = add_days(today, -offset);
        let month = month_year(date);
        if month != last_month {
            rows.push(HistoryRow::MonthHeader {
                month_year: month.clone(),
            });
            last_month = month.clone();
        }

        let check_in = by_date.get(&date);
        let prayer_type = check_in.and_then(|c| c.prayer_type.clone());
        rows.push(HistoryRow::Day(HistoryDay {
            date,
            display_date: format_display(date),
            month_year: month,
            checked: check_in.is_some(),
            prayer_label: prayer_type.as_ref().map(PrayerType::label),
            prayer_type,
        }));
    }

    rows
}
