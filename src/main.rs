use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use hw_watchbot::api::StatusClient;
use hw_watchbot::config;
use hw_watchbot::notify::TelegramNotifier;
use hw_watchbot::poller::Poller;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML settings file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let settings = config::load(args.config.as_deref())?;
    let credentials = config::Credentials::from_env().context("refusing to start the loop")?;

    let endpoint = settings.endpoint_url()?;
    let timeout = Duration::from_secs(settings.app.request_timeout_seconds);
    let api = StatusClient::new(endpoint, credentials.api_token, timeout);
    let notifier = TelegramNotifier::new(&credentials.bot_token, credentials.chat_id);

    let window = Utc::now().timestamp() - settings.api.lookback_seconds as i64;
    let interval = Duration::from_secs(settings.app.poll_interval_seconds);

    info!("starting homework-status watcher");
    Poller::new(api, notifier, window).run(interval).await;

    Ok(())
}
