// src/models.rs

use serde::{Deserialize, Deserializer, Serialize};

// --- Enumerations shared with the upstream API ---

/// Classification of a single day. `None` is what every day starts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VacationType {
    #[default]
    None,
    Vacation,
    SickDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Employer,
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileStatus {
    Authorized,
    Pending,
    Rejected,
}

impl ProfileStatus {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ProfileStatus::Authorized => "AUTHORIZED",
            ProfileStatus::Pending => "PENDING",
            ProfileStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "CZ")]
    Czech,
}

impl Language {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Czech => "CZ",
        }
    }
}

// --- Employee records ---

/// One vacation/sick-day record as delivered by the employee source.
/// The date is kept as the raw wire string; it is parsed when the grid is built
/// so that a malformed value can be reported against its employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: VacationType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBasicInfo {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub calendar: Vec<CalendarEntry>,
}

// The upstream sends `null` for employees that never had a calendar entry.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl EmployeeBasicInfo {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Full profile of one employee, used to seed the settings dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub role: UserType,
    #[serde(default)]
    pub sick_day_count: Option<u32>,
    #[serde(default)]
    pub vacation_count: Option<f64>,
    // Upstream may send this as a string rather than a typed datetime.
    #[serde(default)]
    pub notification: Option<String>,
    #[serde(default)]
    pub status: Option<ProfileStatus>,
}

// --- Settings write-backs ---

/// Company-wide default settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub sickday_count: u32,
    pub notification: String,
}

/// Per-employee override confirmed from the edit dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub id: i64,
    pub role: UserType,
    pub sick_day_count: u32,
    pub vacation_count: f64,
}
