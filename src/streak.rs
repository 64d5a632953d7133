//! Streak arithmetic over sorted calendar days.
//!
//! Both functions expect unique days. Callers sort: `current_streak` wants
//! newest first, `longest_streak` wants oldest first.

use crate::dates::{add_days, today};
use chrono::NaiveDate;

pub fn current_streak(days_desc: &[NaiveDate]) -> u32 {
    current_streak_at(today(), days_desc)
}

/// Consecutive days ending today, or ending yesterday when today is not
/// checked in yet.
pub fn current_streak_at(today: NaiveDate, days_desc: &[NaiveDate]) -> u32 {
    let Some(newest) = days_desc.first() else {
        return 0;
    };

    let mut expected = if *newest == today {
        today
    } else {
        add_days(today, -1)
    };

    let mut streak = 0;
    for day in days_desc {
        if *day == expected {
            streak += 1;
            expected = add_days(expected, -1);
        } else if *day < expected {
            break;
        }
    }
    streak
}

pub fn longest_streak(days_asc: &[NaiveDate]) -> u32 {
    if days_asc.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut current = 1;
    for pair in days_asc.windows(2) {
        if pair[1] == add_days(pair[0], 1) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}
