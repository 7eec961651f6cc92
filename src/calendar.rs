// src/calendar.rs

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;

/// Days shown on either side of the anchor.
pub const DAYS_AROUND_ANCHOR: i64 = 7;
/// Total number of columns in the window.
pub const WINDOW_LEN: usize = 2 * DAYS_AROUND_ANCHOR as usize + 1;
pub const WEEK_LEN: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Anchor date {0} is too close to the supported date range to build a window")]
    DateOutOfRange(NaiveDate),
}

/// Weekday label keys, Monday first. The keys are looked up by the
/// localization layer, so only the key travels with the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayLabel {
    #[serde(rename = "po")]
    Monday,
    #[serde(rename = "ut")]
    Tuesday,
    #[serde(rename = "st")]
    Wednesday,
    #[serde(rename = "ct")]
    Thursday,
    #[serde(rename = "pa")]
    Friday,
    #[serde(rename = "so")]
    Saturday,
    #[serde(rename = "ne")]
    Sunday,
}

pub const CANONICAL_LABELS: [DayLabel; WEEK_LEN] = [
    DayLabel::Monday,
    DayLabel::Tuesday,
    DayLabel::Wednesday,
    DayLabel::Thursday,
    DayLabel::Friday,
    DayLabel::Saturday,
    DayLabel::Sunday,
];

impl DayLabel {
    pub fn key(&self) -> &'static str {
        match self {
            DayLabel::Monday => "po",
            DayLabel::Tuesday => "ut",
            DayLabel::Wednesday => "st",
            DayLabel::Thursday => "ct",
            DayLabel::Friday => "pa",
            DayLabel::Saturday => "so",
            DayLabel::Sunday => "ne",
        }
    }

    /// Position in [`CANONICAL_LABELS`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        CANONICAL_LABELS[weekday.num_days_from_monday() as usize]
    }
}

/// Fifteen consecutive dates centered on the anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CalendarWindow([NaiveDate; WINDOW_LEN]);

impl CalendarWindow {
    pub fn dates(&self) -> &[NaiveDate; WINDOW_LEN] {
        &self.0
    }

    pub fn anchor(&self) -> NaiveDate {
        self.0[DAYS_AROUND_ANCHOR as usize]
    }

    pub fn first(&self) -> NaiveDate {
        self.0[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.0[WINDOW_LEN - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first() <= date && date <= self.last()
    }
}

/// The canonical label sequence rotated to sit above a [`CalendarWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DayLabelRotation {
    labels: [DayLabel; WEEK_LEN],
}

impl DayLabelRotation {
    pub fn labels(&self) -> &[DayLabel; WEEK_LEN] {
        &self.labels
    }

    /// Canonical index the rotation starts at.
    pub fn offset(&self) -> usize {
        self.labels[0].index()
    }

    /// Label shown above window column `column`; the rotation repeats every week.
    pub fn label_for_column(&self, column: usize) -> DayLabel {
        self.labels[column % WEEK_LEN]
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.labels.iter().map(DayLabel::key).collect()
    }
}

/// Builds the date window around `anchor` and the label rotation that lines up
/// with it. Both come out of one call so they cannot drift apart.
pub fn build_window(anchor: NaiveDate) -> Result<(CalendarWindow, DayLabelRotation), CalendarError> {
    let mut dates = [anchor; WINDOW_LEN];
    for (slot, offset) in dates
        .iter_mut()
        .zip(-DAYS_AROUND_ANCHOR..=DAYS_AROUND_ANCHOR)
    {
        *slot = anchor
            .checked_add_signed(Duration::days(offset))
            .ok_or(CalendarError::DateOutOfRange(anchor))?;
    }

    Ok((CalendarWindow(dates), rotate_labels(anchor.weekday())))
}

// Weekday index counts from Sunday = 0 while the label table starts on Monday,
// so starting eight days back lands index 0 on the weekday of the first column.
fn rotate_labels(anchor_weekday: Weekday) -> DayLabelRotation {
    let weekday_index = anchor_weekday.num_days_from_sunday() as i64;
    let start = weekday_index - (DAYS_AROUND_ANCHOR + 1);

    let mut labels = CANONICAL_LABELS;
    for (slot, i) in labels.iter_mut().zip(start..start + WEEK_LEN as i64) {
        *slot = CANONICAL_LABELS[i.rem_euclid(WEEK_LEN as i64) as usize];
    }

    DayLabelRotation { labels }
}
