use crate::registry::PrayerType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One recorded day. Persisted as `{date, prayerType?, checkedInAt}` with
/// `checkedInAt` in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_prayer_type"
    )]
    pub prayer_type: Option<PrayerType>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub checked_in_at: DateTime<Utc>,
}

// A blank stored tag reads as "no tag" rather than failing the whole collection.
fn lenient_prayer_type<'de, D>(deserializer: D) -> Result<Option<PrayerType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| PrayerType::new(value).ok()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded(CheckIn),
    /// Today already had a check-in; it is returned untouched.
    AlreadyCheckedIn(CheckIn),
}

impl RecordOutcome {
    pub fn check_in(&self) -> &CheckIn {
        match self {
            Self::Recorded(check_in) | Self::AlreadyCheckedIn(check_in) => check_in,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckInRequest {
    #[serde(default)]
    pub prayer_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PrayerTypeRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub checked_in: bool,
    pub prayer_type: Option<PrayerType>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub headline: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrayerTypeEntry {
    pub name: PrayerType,
    pub label: String,
}
