mod analysis;
mod app;
mod auth;
mod capture;
mod commands;
mod config;
mod error;
mod input;
mod language;
mod messages;
mod orchestrator;
mod presenter;
mod services;

use app::App;
use config::Config;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is the shell
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting moodtune");

    let config = Config::load()?;
    config.validate()?;

    // Create LocalSet for !Send futures (camera streams and pipeline runs)
    let local = tokio::task::LocalSet::new();

    local
        .run_until(async move { App::new(config)?.run().await })
        .await
}
