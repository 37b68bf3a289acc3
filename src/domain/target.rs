use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A focus target recorded by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub text: String,
}

impl TargetEntry {
    pub fn new(at: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            date: at.date(),
            // Stored with second precision
            time: at.time().with_nanosecond(0).unwrap_or(at.time()),
            text: text.into(),
        }
    }

    /// Case-insensitive substring match; an empty query matches everything
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.text.to_lowercase().contains(&query.to_lowercase())
    }

    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

impl fmt::Display for TargetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.date_str(), self.time_str(), self.text)
    }
}
