use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Default upstream homework status endpoint.
pub const DEFAULT_PRAKTIKUM_API_URL: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OAuth token for the homework status API
    pub praktikum_token: String,

    /// Homework status endpoint
    pub praktikum_api_url: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Telegram Bot API base URL (overridable for tests and proxies)
    pub telegram_api_url: String,

    /// Long sleep between normal polls in seconds (default: 1200 = 20 min)
    pub poll_interval_secs: u64,

    /// Short sleep after a failed cycle in seconds (default: 5)
    pub retry_interval_secs: u64,

    /// Consecutive short sleeps allowed before falling back to the long one (default: 3)
    pub max_short_retries: u32,

    /// Timeout applied to every outbound HTTP call in seconds (default: 30)
    pub http_timeout_secs: u64,

    /// Durable log file, truncated on start
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} environment variable is required")))
        };

        Ok(Self {
            praktikum_token: required("PRAKTIKUM_TOKEN")?,
            praktikum_api_url: lookup("PRAKTIKUM_API_URL")
                .unwrap_or_else(|| DEFAULT_PRAKTIKUM_API_URL.to_string()),
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            poll_interval_secs: parse_or(&lookup, "POLL_INTERVAL_SECS", 1200)?,
            retry_interval_secs: parse_or(&lookup, "RETRY_INTERVAL_SECS", 5)?,
            max_short_retries: parse_or(&lookup, "MAX_SHORT_RETRIES", 3)?,
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?,
            log_file: lookup("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("homework_bot.log")),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::Config(format!("{key} must be a valid {}", short_type_name::<T>()))
        }),
        None => Ok(default),
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
