// src/test_support.rs
//
// In-memory collaborators and builders shared by the unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::client::{ClientError, EmployeeSource, SettingsSource};
use crate::clock::FixedClock;
use crate::dashboard::{DashboardOptions, DashboardService};
use crate::date_format::PatternDateFormatter;
use crate::models::{
    CalendarEntry, EmployeeBasicInfo, Language, ProfileStatus, Settings, UserProfile, UserSettings,
    UserType, VacationType,
};

pub fn d(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
}

pub fn employee(id: i64, first: &str, last: &str, entries: &[(&str, VacationType)]) -> EmployeeBasicInfo {
    EmployeeBasicInfo {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        photo: Some(format!("https://photos.example.com/{}.png", id)),
        calendar: entries
            .iter()
            .map(|(date, kind)| CalendarEntry {
                date: date.to_string(),
                kind: *kind,
            })
            .collect(),
    }
}

pub fn profile(id: i64, role: UserType, sick_day_count: Option<u32>) -> UserProfile {
    UserProfile {
        id,
        first_name: "Jana".to_string(),
        last_name: "Novakova".to_string(),
        photo: None,
        role,
        sick_day_count,
        vacation_count: Some(40.0),
        notification: None,
        status: Some(ProfileStatus::Authorized),
    }
}

pub fn api_error(status: u16, message: &str) -> ClientError {
    ClientError::Api {
        status: reqwest::StatusCode::from_u16(status).expect("valid status code"),
        message: message.to_string(),
    }
}

struct PendingFetch {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<Vec<EmployeeBasicInfo>, ClientError>,
}

/// Employee source answering from a queue; a gated answer waits until its
/// sender fires, which lets tests finish fetches out of request order.
#[derive(Default)]
pub struct FakeEmployees {
    responses: Mutex<VecDeque<PendingFetch>>,
    profiles: Mutex<HashMap<i64, UserProfile>>,
    calls: AtomicUsize,
    last_filters: Mutex<Option<(Option<ProfileStatus>, Option<Language>)>>,
}

impl FakeEmployees {
    pub fn push(&self, result: Result<Vec<EmployeeBasicInfo>, ClientError>) {
        self.responses.lock().unwrap().push_back(PendingFetch { gate: None, result });
    }

    pub fn push_gated(&self, result: Result<Vec<EmployeeBasicInfo>, ClientError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().unwrap().push_back(PendingFetch {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn add_profile(&self, profile: UserProfile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_filters(&self) -> Option<(Option<ProfileStatus>, Option<Language>)> {
        *self.last_filters.lock().unwrap()
    }
}

#[async_trait]
impl EmployeeSource for FakeEmployees {
    async fn fetch_employees(
        &self,
        status: Option<ProfileStatus>,
        language: Option<Language>,
    ) -> Result<Vec<EmployeeBasicInfo>, ClientError> {
        *self.last_filters.lock().unwrap() = Some((status, language));
        let next = self.responses.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(pending) = next else {
            return Ok(Vec::new());
        };
        if let Some(gate) = pending.gate {
            let _ = gate.await;
        }
        pending.result
    }

    async fn fetch_user_profile(&self, id: i64) -> Result<UserProfile, ClientError> {
        self.profiles
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| api_error(404, "User not found"))
    }
}

/// Settings source recording every write-back.
pub struct FakeSettings {
    pub defaults: Mutex<Settings>,
    pub user_settings: Mutex<Vec<UserSettings>>,
    pub posted_defaults: Mutex<Vec<(Settings, Language)>>,
    pub fail_writes: Mutex<bool>,
}

impl Default for FakeSettings {
    fn default() -> Self {
        Self {
            defaults: Mutex::new(Settings {
                sickday_count: 5,
                notification: "2024-12-01 09:30:00".to_string(),
            }),
            user_settings: Mutex::new(Vec::new()),
            posted_defaults: Mutex::new(Vec::new()),
            fail_writes: Mutex::new(false),
        }
    }
}

impl FakeSettings {
    fn check_writable(&self) -> Result<(), ClientError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(api_error(503, "Settings store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsSource for FakeSettings {
    async fn fetch_default_settings(&self, _language: Language) -> Result<Settings, ClientError> {
        Ok(self.defaults.lock().unwrap().clone())
    }

    async fn post_default_settings(&self, settings: &Settings, language: Language) -> Result<(), ClientError> {
        self.check_writable()?;
        self.posted_defaults
            .lock()
            .unwrap()
            .push((settings.clone(), language));
        Ok(())
    }

    async fn put_user_settings(&self, settings: &UserSettings) -> Result<(), ClientError> {
        self.check_writable()?;
        self.user_settings.lock().unwrap().push(settings.clone());
        Ok(())
    }
}

pub struct TestDashboard {
    pub service: Arc<DashboardService>,
    pub employees: Arc<FakeEmployees>,
    pub settings: Arc<FakeSettings>,
    pub clock: FixedClock,
}

pub fn setup_dashboard(today: &str, options: DashboardOptions) -> TestDashboard {
    let employees = Arc::new(FakeEmployees::default());
    let settings = Arc::new(FakeSettings::default());
    let clock = FixedClock::at_date(d(today));
    let service = Arc::new(DashboardService::new(
        employees.clone(),
        settings.clone(),
        Arc::new(clock.clone()),
        Arc::new(PatternDateFormatter::default()),
        options,
    ));
    TestDashboard {
        service,
        employees,
        settings,
        clock,
    }
}
