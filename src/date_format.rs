// src/date_format.rs

use chrono::{NaiveDate, NaiveDateTime};

pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Serializes dates for settings write-backs.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
    fn format_datetime(&self, datetime: NaiveDateTime) -> String;
}

#[derive(Debug, Clone)]
pub struct PatternDateFormatter {
    date_pattern: String,
    datetime_pattern: String,
}

impl PatternDateFormatter {
    pub fn new(date_pattern: impl Into<String>, datetime_pattern: impl Into<String>) -> Self {
        Self {
            date_pattern: date_pattern.into(),
            datetime_pattern: datetime_pattern.into(),
        }
    }
}

impl Default for PatternDateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT)
    }
}

impl DateFormatter for PatternDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_pattern).to_string()
    }

    fn format_datetime(&self, datetime: NaiveDateTime) -> String {
        datetime.format(&self.datetime_pattern).to_string()
    }
}
