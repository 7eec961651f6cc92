// src/server.rs

use axum::http::StatusCode as AxumStatusCode;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::client::ClientError;
use crate::dashboard::{DashboardError, DashboardGrid, DashboardService, RefreshOutcome, SubmitOutcome};
use crate::models::Language;
use crate::settings::{DefaultSettingsForm, DialogOutcome, EmployeeSettingsForm, SettingsError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("No dashboard grid has been built yet")]
    NotReady,
    #[error("Employee id in path ({path}) does not match form ({form})")]
    IdMismatch { path: i64, form: i64 },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Error occurred: {}", self);

        let (status_code, error_message) = match &self {
            AppError::NotReady => (
                AxumStatusCode::SERVICE_UNAVAILABLE,
                "Dashboard not built yet. Try again shortly.".to_string(),
            ),
            AppError::IdMismatch { .. } => (AxumStatusCode::BAD_REQUEST, self.to_string()),
            AppError::Dashboard(dashboard_err) => match dashboard_err {
                DashboardError::Validation(SettingsError::MissingField(field)) => (
                    AxumStatusCode::UNPROCESSABLE_ENTITY,
                    format!("Missing field: {}", field),
                ),
                DashboardError::Validation(err @ SettingsError::MalformedNotification(_)) => {
                    (AxumStatusCode::BAD_GATEWAY, err.to_string())
                }
                DashboardError::Transport(ClientError::Api { status, message }) => {
                    warn!("Upstream API Error: Status={}, Msg={}", status, message);
                    let axum_status = AxumStatusCode::from_u16(status.as_u16())
                        .unwrap_or(AxumStatusCode::BAD_GATEWAY);
                    (axum_status, "Upstream service rejected the request.".to_string())
                }
                DashboardError::Transport(_) => (
                    AxumStatusCode::BAD_GATEWAY,
                    "Failed to reach upstream service.".to_string(),
                ),
                DashboardError::MalformedData(err) => {
                    (AxumStatusCode::BAD_GATEWAY, format!("Data integrity error: {}", err))
                }
                DashboardError::Calendar(err) => {
                    (AxumStatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            },
        };

        (status_code, Json(ErrorBody { error: error_message })).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardService>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageParams {
    pub lang: Option<Language>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    applied: bool,
    refresh_id: u64,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    stored: bool,
}

impl From<SubmitOutcome> for SubmitResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            stored: outcome == SubmitOutcome::Stored,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    ready: bool,
    last_refresh_id: Option<u64>,
    generated_at: Option<chrono::NaiveDateTime>,
    employees: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(handle_get_dashboard))
        .route("/dashboard/refresh", post(handle_refresh))
        .route(
            "/employees/{id}/settings",
            get(handle_get_employee_settings).put(handle_put_employee_settings),
        )
        .route(
            "/settings/default",
            get(handle_get_default_settings).post(handle_post_default_settings),
        )
        .route("/status", get(handle_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Without an explicit language the upstream default is Czech.
fn language_or_default(params: &LanguageParams) -> Language {
    params.lang.unwrap_or(Language::Czech)
}

async fn handle_get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardGrid>, AppError> {
    let grid = state.dashboard.snapshot().await.ok_or(AppError::NotReady)?;
    Ok(Json(grid.as_ref().clone()))
}

async fn handle_refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    info!("Handling /dashboard/refresh request...");
    let response = match state.dashboard.refresh().await? {
        RefreshOutcome::Applied(grid) => RefreshResponse {
            applied: true,
            refresh_id: grid.refresh_id,
        },
        RefreshOutcome::Discarded { refresh_id } => RefreshResponse {
            applied: false,
            refresh_id,
        },
    };
    Ok(Json(response))
}

async fn handle_get_employee_settings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EmployeeSettingsForm>, AppError> {
    Ok(Json(state.dashboard.employee_settings_form(id).await?))
}

async fn handle_put_employee_settings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(outcome): Json<DialogOutcome<EmployeeSettingsForm>>,
) -> Result<Json<SubmitResponse>, AppError> {
    if let DialogOutcome::Confirmed(form) = &outcome {
        if form.id != id {
            return Err(AppError::IdMismatch { path: id, form: form.id });
        }
    }
    let outcome = state.dashboard.submit_employee_settings(outcome).await?;
    Ok(Json(outcome.into()))
}

async fn handle_get_default_settings(
    State(state): State<AppState>,
    Query(params): Query<LanguageParams>,
) -> Result<Json<DefaultSettingsForm>, AppError> {
    let language = language_or_default(&params);
    Ok(Json(state.dashboard.default_settings_form(language).await?))
}

async fn handle_post_default_settings(
    State(state): State<AppState>,
    Query(params): Query<LanguageParams>,
    Json(outcome): Json<DialogOutcome<DefaultSettingsForm>>,
) -> Result<Json<SubmitResponse>, AppError> {
    let language = language_or_default(&params);
    let outcome = state
        .dashboard
        .submit_default_settings(outcome, language)
        .await?;
    Ok(Json(outcome.into()))
}

async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.dashboard.snapshot().await;
    Json(StatusResponse {
        ready: snapshot.is_some(),
        last_refresh_id: snapshot.as_ref().map(|g| g.refresh_id),
        generated_at: snapshot.as_ref().map(|g| g.generated_at),
        employees: snapshot.as_ref().map_or(0, |g| g.rows.len()),
    })
}
