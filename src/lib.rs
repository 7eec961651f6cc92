// src/lib.rs

pub mod calendar;
pub mod client;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod date_format;
pub mod grid;
pub mod models;
pub mod server;
pub mod settings;

mod calendar_tests;
mod config_tests;

#[cfg(test)]
mod test_support;

pub use calendar::{build_window, CalendarError, CalendarWindow, DayLabel, DayLabelRotation};
pub use dashboard::{DashboardError, DashboardGrid, DashboardService, RefreshOutcome};
pub use grid::{build_rows, DateMatching, DayInfo, EmployeeRow, GridError};
pub use models::*;
