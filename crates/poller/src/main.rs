use std::sync::Arc;

use herald_common::config::AppConfig;
use herald_common::logging;
use herald_notifier::{Notifier, TelegramTransport};
use herald_poller::poller::{PollLoop, PollSettings};
use herald_poller::source::PracticumClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration; missing credentials stop us before anything else
    let config = AppConfig::from_env()?;

    // Initialize tracing (console + log file)
    logging::init(&config.log_file)?;

    tracing::info!("Review Herald starting...");

    let source = PracticumClient::new(
        config.praktikum_api_url.clone(),
        config.praktikum_token.clone(),
        config.http_timeout(),
    )?;

    let transport = TelegramTransport::new(
        config.telegram_api_url.clone(),
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
        config.http_timeout(),
    )?;
    let notifier = Notifier::new(Arc::new(transport));

    let settings = PollSettings::from_config(&config);
    tracing::info!(
        poll_interval_secs = settings.poll_interval.as_secs(),
        retry_interval_secs = settings.retry_interval.as_secs(),
        max_short_retries = settings.max_short_retries,
        "Starting homework status poller"
    );

    let mut poll_loop = PollLoop::new(Box::new(source), notifier, settings);

    // Run until Ctrl+C
    tokio::select! {
        _ = poll_loop.run() => {
            tracing::error!("Poll loop exited unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Review Herald stopped.");
    Ok(())
}
