// src/settings.rs
//
// Dialog snapshots for the two settings flows and their confirmation into
// write-back objects. Nothing here decides a default value; it only checks that
// what the user confirmed is complete.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date_format::DateFormatter;
use crate::models::{Settings, UserProfile, UserSettings, UserType};

const NOTIFICATION_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Malformed notification datetime '{0}'")]
    MalformedNotification(String),
}

/// Result of a modal dialog: either the confirmed form or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "form", rename_all = "lowercase")]
pub enum DialogOutcome<T> {
    Confirmed(T),
    Cancelled,
}

impl<T> DialogOutcome<T> {
    pub fn confirmed(self) -> Option<T> {
        match self {
            DialogOutcome::Confirmed(form) => Some(form),
            DialogOutcome::Cancelled => None,
        }
    }
}

/// Snapshot handed to the employee edit dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSettingsForm {
    pub id: i64,
    #[serde(default)]
    pub role: Option<UserType>,
    #[serde(default)]
    pub sick_day_count: Option<u32>,
    /// Vacation hours to add, starts at zero.
    #[serde(default)]
    pub vacation_count: Option<f64>,
}

impl EmployeeSettingsForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            role: Some(profile.role),
            sick_day_count: profile.sick_day_count,
            vacation_count: Some(0.0),
        }
    }

    pub fn confirm(self) -> Result<UserSettings, SettingsError> {
        Ok(UserSettings {
            id: self.id,
            sick_day_count: self
                .sick_day_count
                .ok_or(SettingsError::MissingField("sickDayCount"))?,
            vacation_count: self
                .vacation_count
                .ok_or(SettingsError::MissingField("vacationCount"))?,
            role: self.role.ok_or(SettingsError::MissingField("role"))?,
        })
    }
}

/// Snapshot handed to the default settings dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultSettingsForm {
    #[serde(default)]
    pub sickday_count: Option<u32>,
    #[serde(default)]
    pub notification_date: Option<NaiveDate>,
    #[serde(default, with = "hour_minute")]
    pub notification_time: Option<NaiveTime>,
}

impl DefaultSettingsForm {
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let notification = parse_notification(&settings.notification)
            .ok_or_else(|| SettingsError::MalformedNotification(settings.notification.clone()))?;
        Ok(Self {
            sickday_count: Some(settings.sickday_count),
            notification_date: Some(notification.date()),
            notification_time: Some(notification.time()),
        })
    }

    pub fn confirm(self, formatter: &dyn DateFormatter) -> Result<Settings, SettingsError> {
        let sickday_count = self
            .sickday_count
            .ok_or(SettingsError::MissingField("sickdayCount"))?;
        let date = self
            .notification_date
            .ok_or(SettingsError::MissingField("notificationDate"))?;
        let time = self
            .notification_time
            .ok_or(SettingsError::MissingField("notificationTime"))?;

        Ok(Settings {
            sickday_count,
            notification: formatter.format_datetime(date.and_time(time)),
        })
    }
}

/// Parses the notification instant as the settings source sends it.
pub fn parse_notification(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NOTIFICATION_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// "HH:MM" on the wire for the dialog's time field.
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_some(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveTime::parse_from_str(&s, FORMAT).map_err(D::Error::custom))
            .transpose()
    }
}
