use serde::Serialize;

pub fn streak_headline(current_streak: u32) -> String {
    match current_streak {
        0 => "Start your streak!".to_string(),
        1 => "1-day streak!".to_string(),
        n => format!("{n}-day streak!"),
    }
}

/// Text content of the shareable streak image. Rendering belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareCard {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub caption: String,
    pub longest_label: String,
    pub title: String,
}

impl ShareCard {
    pub fn new(current_streak: u32, longest_streak: u32) -> Self {
        let unit = if longest_streak == 1 { "day" } else { "days" };
        Self {
            current_streak,
            longest_streak,
            caption: "day prayer streak".to_string(),
            longest_label: format!("Longest streak · {longest_streak} {unit}"),
            title: "Prayer Streaks".to_string(),
        }
    }
}
