// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::{sync::Arc, time::Duration as StdDuration};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use attendance_core::client::YManagerClient;
use attendance_core::clock::SystemClock;
use attendance_core::config::AppConfig;
use attendance_core::dashboard::{DashboardService, RefreshOutcome};
use attendance_core::date_format::PatternDateFormatter;
use attendance_core::server::{router, AppState};

#[derive(Parser, Debug)]
#[command(version, about = "Serves the employee attendance calendar grid")]
struct Args {
    /// Address to listen on (overrides DASHBOARD_BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,

    /// Upstream REST API base URL (overrides DASHBOARD_API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Setting tracing subscriber failed")?;
    info!("Tracing subscriber initialized.");

    let mut config = AppConfig::from_env().context("Loading configuration failed")?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(api_url) = args.api_url {
        config.api_base_url = api_url;
    }
    info!("Configuration loaded: {:?}", config);

    let client = Arc::new(YManagerClient::new(config.client_config())?);
    info!("Upstream client initialized for {}", client.base_url());

    let dashboard = Arc::new(DashboardService::new(
        client.clone(),
        client,
        Arc::new(SystemClock),
        Arc::new(PatternDateFormatter::default()),
        config.dashboard_options(),
    ));
    info!("Dashboard options: {:?}", dashboard.options());

    // Periodic refresh; the first tick fires immediately.
    let refresh_task = dashboard.clone();
    let refresh_every = StdDuration::from_secs(config.refresh_interval_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh_every);
        loop {
            ticker.tick().await;
            match refresh_task.refresh().await {
                Ok(RefreshOutcome::Applied(grid)) => {
                    info!("Periodic refresh {} applied", grid.refresh_id)
                }
                Ok(RefreshOutcome::Discarded { refresh_id }) => {
                    warn!("Periodic refresh {} was superseded", refresh_id)
                }
                Err(e) => error!("Periodic refresh failed: {}", e),
            }
        }
    });

    let app = router(AppState { dashboard });

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Binding {} failed", addr))?;
    info!("Starting server on http://{}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
