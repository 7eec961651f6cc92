// src/client.rs

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::models::{
    EmployeeBasicInfo, Language, ProfileStatus, Settings, UserProfile, UserSettings,
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON processing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("API error: Status={status}, Message='{message}'")]
    Api { status: StatusCode, message: String },
}

// --- Collaborator seams ---

#[async_trait]
pub trait EmployeeSource: Send + Sync {
    async fn fetch_employees(
        &self,
        status: Option<ProfileStatus>,
        language: Option<Language>,
    ) -> Result<Vec<EmployeeBasicInfo>, ClientError>;

    async fn fetch_user_profile(&self, id: i64) -> Result<UserProfile, ClientError>;
}

#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn fetch_default_settings(&self, language: Language) -> Result<Settings, ClientError>;

    async fn post_default_settings(
        &self,
        settings: &Settings,
        language: Language,
    ) -> Result<(), ClientError>;

    async fn put_user_settings(&self, settings: &UserSettings) -> Result<(), ClientError>;
}

// Error body shape returned by the upstream REST layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorPayload {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Client for the upstream employee and settings REST API.
#[derive(Clone)]
pub struct YManagerClient {
    base_url: Url,
    http_client: Client,
}

impl YManagerClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        // Trailing slash so relative joins keep the base path.
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        Ok(self
            .http_client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    async fn send(&self, request_builder: RequestBuilder, context_msg: &str) -> Result<reqwest::Response, ClientError> {
        let request = request_builder.build().map_err(|e| {
            error!("Request build failed for '{}': {}", context_msg, e);
            ClientError::Request(e)
        })?;
        let request_url = request.url().to_string();
        debug!("Sending request for '{}' to URL: {}", context_msg, request_url);

        let response = self.http_client.execute(request).await.map_err(|e| {
            error!(
                "HTTP execution failed for '{}' (URL: {}): {}",
                context_msg, request_url, e
            );
            ClientError::Request(e)
        })?;

        let status = response.status();
        info!(
            "Received response for '{}' (URL: {}): Status={}",
            context_msg, request_url, status
        );
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read error body: {}", e));
        warn!(
            "API Error Response: Status={}, Body='{}' for URL: {}",
            status, error_body, request_url
        );
        let message = match serde_json::from_str::<ApiErrorPayload>(&error_body) {
            Ok(ApiErrorPayload {
                message: Some(message),
                ..
            }) => message,
            Ok(ApiErrorPayload {
                error: Some(error), ..
            }) => error,
            _ => error_body,
        };
        Err(ClientError::Api { status, message })
    }

    async fn send_and_deserialize<T: DeserializeOwned>(
        &self,
        request_builder: RequestBuilder,
        context_msg: &str,
    ) -> Result<T, ClientError> {
        let response = self.send(request_builder, context_msg).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            error!("JSON deserialization failed for '{}': {}", context_msg, e);
            ClientError::Json(e)
        })
    }
}

fn language_query(language: Option<Language>) -> Vec<(&'static str, &'static str)> {
    language
        .map(|lang| vec![("lang", lang.as_query_value())])
        .unwrap_or_default()
}

#[async_trait]
impl EmployeeSource for YManagerClient {
    async fn fetch_employees(
        &self,
        status: Option<ProfileStatus>,
        language: Option<Language>,
    ) -> Result<Vec<EmployeeBasicInfo>, ClientError> {
        let mut query = language_query(language);
        if let Some(status) = status {
            query.push(("status", status.as_query_value()));
        }
        let request = self.build_request(Method::GET, "users")?.query(&query);
        self.send_and_deserialize(request, "Get Users").await
    }

    async fn fetch_user_profile(&self, id: i64) -> Result<UserProfile, ClientError> {
        let request = self.build_request(Method::GET, &format!("user/{}/profile", id))?;
        self.send_and_deserialize(request, "Get User Profile").await
    }
}

#[async_trait]
impl SettingsSource for YManagerClient {
    async fn fetch_default_settings(&self, language: Language) -> Result<Settings, ClientError> {
        let request = self
            .build_request(Method::GET, "settings")?
            .query(&language_query(Some(language)));
        self.send_and_deserialize(request, "Get Default Settings").await
    }

    async fn post_default_settings(
        &self,
        settings: &Settings,
        language: Language,
    ) -> Result<(), ClientError> {
        let request = self
            .build_request(Method::POST, "settings")?
            .query(&language_query(Some(language)))
            .json(settings);
        self.send(request, "Post Default Settings").await?;
        Ok(())
    }

    async fn put_user_settings(&self, settings: &UserSettings) -> Result<(), ClientError> {
        let request = self.build_request(Method::PUT, "user/settings")?.json(settings);
        self.send(request, "Put User Settings").await?;
        Ok(())
    }
}
