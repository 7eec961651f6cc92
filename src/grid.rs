// src/grid.rs

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calendar::CalendarWindow;
use crate::models::{EmployeeBasicInfo, VacationType};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Malformed calendar date '{value}' for employee {employee_id}")]
    MalformedDate { employee_id: i64, value: String },
}

/// How a calendar entry is matched against a window date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateMatching {
    /// Year, month and day must all agree.
    #[default]
    FullDate,
    /// Only the day of month is compared. Entries from other months bleed into
    /// the window; kept for parity with the legacy dashboard.
    DayOfMonth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayInfo {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: VacationType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub photo: Option<String>,
    pub days: Vec<DayInfo>,
}

/// Parses the date part of a calendar entry as sent by the employee source.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

// Index keyed by whatever the matching mode compares; inserting in list order
// leaves the last entry for a key in place.
enum EntryIndex {
    ByDate(HashMap<NaiveDate, VacationType>),
    ByDayOfMonth(HashMap<u32, VacationType>),
}

impl EntryIndex {
    fn build(employee: &EmployeeBasicInfo, matching: DateMatching) -> Result<Self, GridError> {
        let mut parsed = Vec::with_capacity(employee.calendar.len());
        for entry in &employee.calendar {
            let date = parse_entry_date(&entry.date).ok_or_else(|| {
                warn!(
                    "Employee {} has calendar entry with malformed date '{}'",
                    employee.id, entry.date
                );
                GridError::MalformedDate {
                    employee_id: employee.id,
                    value: entry.date.clone(),
                }
            })?;
            parsed.push((date, entry.kind));
        }

        Ok(match matching {
            DateMatching::FullDate => EntryIndex::ByDate(parsed.into_iter().collect()),
            DateMatching::DayOfMonth => EntryIndex::ByDayOfMonth(
                parsed
                    .into_iter()
                    .map(|(date, kind)| (date.day(), kind))
                    .collect(),
            ),
        })
    }

    fn lookup(&self, date: NaiveDate) -> VacationType {
        let found = match self {
            EntryIndex::ByDate(map) => map.get(&date),
            EntryIndex::ByDayOfMonth(map) => map.get(&date.day()),
        };
        found.copied().unwrap_or_default()
    }
}

/// Classifies every window date for one employee.
pub fn build_row(
    employee: &EmployeeBasicInfo,
    window: &CalendarWindow,
    matching: DateMatching,
) -> Result<EmployeeRow, GridError> {
    let index = EntryIndex::build(employee, matching)?;
    let days = window
        .iter()
        .map(|&date| DayInfo {
            date,
            kind: index.lookup(date),
        })
        .collect();

    Ok(EmployeeRow {
        id: employee.id,
        name: employee.display_name(),
        photo: employee.photo.clone(),
        days,
    })
}

/// Builds one row per employee, in input order. Stops at the first employee
/// whose calendar cannot be read.
pub fn build_rows(
    employees: &[EmployeeBasicInfo],
    window: &CalendarWindow,
    matching: DateMatching,
) -> Result<Vec<EmployeeRow>, GridError> {
    let rows = employees
        .iter()
        .map(|employee| build_row(employee, window, matching))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Built {} rows for window {}..{} ({:?})",
        rows.len(),
        window.first(),
        window.last(),
        matching
    );
    Ok(rows)
}
