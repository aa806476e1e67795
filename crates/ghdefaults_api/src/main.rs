//! ghdefaults webhook server
//!
//! Main binary for running the service.
//!
//! # Environment Variables
//!
//! - `GH_APP_ID`, `GH_APP_PRIVATE_KEY`, `GH_WEBHOOK_SECRET`: App credentials (required)
//! - `HTTP_ADDR` / `PORT`: Listen address (default: `0.0.0.0:8080`)
//! - `GITHUB_API_URL`: GitHub API base URL (default: api.github.com)
//! - `GHDEFAULTS_POLICY_FILE`: Owner policy table (default: built-in table)
//! - `LOG_FORMAT`: `text` or `json` (default: text)
//! - `RUST_LOG`: Log level (default: info)

use anyhow::Context;
use clap::Parser;
use ghdefaults_api::{ApiConfig, ApiServer, AppState, Config, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_format);

    let settings = config
        .into_settings()
        .context("Failed to load configuration")?;

    tracing::info!(
        app_id = settings.credentials.app_id(),
        owners = ?settings.policy.owners(),
        github_api_url = settings.github_api_url.as_deref().unwrap_or("https://api.github.com"),
        "Starting ghdefaults"
    );

    let api_config = ApiConfig {
        addr: settings.listen_addr,
        request_timeout: settings.request_timeout,
    };
    let state = AppState::from_settings(settings);

    ApiServer::new(api_config, state).serve().await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
