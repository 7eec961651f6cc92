// src/config.rs

use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;

use crate::client::{ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::dashboard::DashboardOptions;
use crate::grid::DateMatching;
use crate::models::{Language, ProfileStatus};

pub const ENV_PREFIX: &str = "DASHBOARD_";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
    #[error("Invalid bind address '{0}'")]
    BindAddr(String),
}

/// Settings read from `DASHBOARD_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub date_matching: DateMatching,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default = "default_profile_status")]
    pub profile_status: Option<ProfileStatus>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_refresh_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_profile_status() -> Option<ProfileStatus> {
    Some(ProfileStatus::Authorized)
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<AppConfig>()?)
    }

    pub fn from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, AppConfig>(vars)?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::BindAddr(self.bind_addr.clone()))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            matching: self.date_matching,
            status_filter: self.profile_status,
            language: self.language,
        }
    }
}
