// src/dashboard.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::calendar::{build_window, CalendarError, CalendarWindow, DayLabelRotation};
use crate::client::{ClientError, EmployeeSource, SettingsSource};
use crate::clock::Clock;
use crate::date_format::DateFormatter;
use crate::grid::{build_rows, DateMatching, EmployeeRow, GridError};
use crate::models::{Language, ProfileStatus};
use crate::settings::{DefaultSettingsForm, DialogOutcome, EmployeeSettingsForm, SettingsError};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Validation failed: {0}")]
    Validation(#[from] SettingsError),
    #[error("Upstream request failed: {0}")]
    Transport(#[from] ClientError),
    #[error("Data integrity error: {0}")]
    MalformedData(#[from] GridError),
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub matching: DateMatching,
    pub status_filter: Option<ProfileStatus>,
    pub language: Option<Language>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            matching: DateMatching::FullDate,
            status_filter: Some(ProfileStatus::Authorized),
            language: None,
        }
    }
}

/// Display-ready grid produced by one successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardGrid {
    pub refresh_id: u64,
    pub anchor: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub dates: CalendarWindow,
    pub day_labels: DayLabelRotation,
    pub rows: Vec<EmployeeRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied(Arc<DashboardGrid>),
    /// A newer refresh was requested while this one was in flight.
    Discarded { refresh_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Stored,
    Cancelled,
}

/// Builds and holds the dashboard grid, and forwards settings write-backs.
pub struct DashboardService {
    employees: Arc<dyn EmployeeSource>,
    settings: Arc<dyn SettingsSource>,
    clock: Arc<dyn Clock>,
    formatter: Arc<dyn DateFormatter>,
    options: DashboardOptions,
    latest_requested: AtomicU64,
    current: RwLock<Option<Arc<DashboardGrid>>>,
}

impl DashboardService {
    pub fn new(
        employees: Arc<dyn EmployeeSource>,
        settings: Arc<dyn SettingsSource>,
        clock: Arc<dyn Clock>,
        formatter: Arc<dyn DateFormatter>,
        options: DashboardOptions,
    ) -> Self {
        Self {
            employees,
            settings,
            clock,
            formatter,
            options,
            latest_requested: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    /// Latest applied grid, if any refresh has succeeded yet.
    pub async fn snapshot(&self) -> Option<Arc<DashboardGrid>> {
        self.current.read().await.clone()
    }

    /// Fetches employees and rebuilds the grid. On any failure the previously
    /// applied grid stays in place.
    pub async fn refresh(&self) -> Result<RefreshOutcome, DashboardError> {
        let refresh_id = self.latest_requested.fetch_add(1, Ordering::SeqCst) + 1;
        let generated_at = self.clock.now();
        let anchor = generated_at.date();
        let (dates, day_labels) = build_window(anchor)?;
        info!("Refresh {} started for anchor {}", refresh_id, anchor);

        let fetched = self
            .employees
            .fetch_employees(self.options.status_filter, self.options.language)
            .await;

        if self.is_stale(refresh_id) {
            warn!(
                "Discarding refresh {}: superseded by refresh {}",
                refresh_id,
                self.latest_requested.load(Ordering::SeqCst)
            );
            if let Err(e) = &fetched {
                debug!("Discarded refresh {} had failed to fetch employees: {}", refresh_id, e);
            }
            return Ok(RefreshOutcome::Discarded { refresh_id });
        }

        let employees = fetched.map_err(|e| {
            error!("Refresh {} failed to fetch employees: {}", refresh_id, e);
            DashboardError::Transport(e)
        })?;
        let rows = build_rows(&employees, &dates, self.options.matching).map_err(|e| {
            error!("Refresh {} rejected employee data: {}", refresh_id, e);
            DashboardError::MalformedData(e)
        })?;

        let grid = Arc::new(DashboardGrid {
            refresh_id,
            anchor,
            generated_at,
            dates,
            day_labels,
            rows,
        });

        let mut current = self.current.write().await;
        if let Some(existing) = current.as_ref() {
            if existing.refresh_id > refresh_id {
                warn!(
                    "Discarding refresh {}: grid from refresh {} already applied",
                    refresh_id, existing.refresh_id
                );
                return Ok(RefreshOutcome::Discarded { refresh_id });
            }
        }
        *current = Some(grid.clone());
        info!(
            "Refresh {} applied with {} employees",
            refresh_id,
            grid.rows.len()
        );
        Ok(RefreshOutcome::Applied(grid))
    }

    fn is_stale(&self, refresh_id: u64) -> bool {
        self.latest_requested.load(Ordering::SeqCst) != refresh_id
    }

    // --- Settings dialogs ---

    pub async fn employee_settings_form(&self, id: i64) -> Result<EmployeeSettingsForm, DashboardError> {
        let profile = self.employees.fetch_user_profile(id).await?;
        Ok(EmployeeSettingsForm::from_profile(&profile))
    }

    pub async fn submit_employee_settings(
        &self,
        outcome: DialogOutcome<EmployeeSettingsForm>,
    ) -> Result<SubmitOutcome, DashboardError> {
        let Some(form) = outcome.confirmed() else {
            info!("Employee settings dialog cancelled");
            return Ok(SubmitOutcome::Cancelled);
        };
        let user_settings = form.confirm().map_err(|e| {
            warn!("Employee settings rejected: {}", e);
            e
        })?;
        self.settings.put_user_settings(&user_settings).await?;
        info!("Stored settings for employee {}", user_settings.id);
        Ok(SubmitOutcome::Stored)
    }

    pub async fn default_settings_form(&self, language: Language) -> Result<DefaultSettingsForm, DashboardError> {
        let settings = self.settings.fetch_default_settings(language).await?;
        Ok(DefaultSettingsForm::from_settings(&settings)?)
    }

    pub async fn submit_default_settings(
        &self,
        outcome: DialogOutcome<DefaultSettingsForm>,
        language: Language,
    ) -> Result<SubmitOutcome, DashboardError> {
        let Some(form) = outcome.confirmed() else {
            info!("Default settings dialog cancelled");
            return Ok(SubmitOutcome::Cancelled);
        };
        let settings = form.confirm(self.formatter.as_ref()).map_err(|e| {
            warn!("Default settings rejected: {}", e);
            e
        })?;
        self.settings
            .post_default_settings(&settings, language)
            .await?;
        info!("Stored default settings ({:?})", language);
        Ok(SubmitOutcome::Stored)
    }
}
