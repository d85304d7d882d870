use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use herald_common::error::AppError;
use herald_common::types::FetchOutcome;

/// How much of an error response body ends up in logs and reports.
const BODY_EXCERPT_CHARS: usize = 200;

/// Upstream source of homework statuses.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch every status change since `since` (Unix seconds). Never fails;
    /// problems are classified into the outcome.
    async fn fetch(&self, since: i64) -> FetchOutcome;
}

/// Client for the Practicum homework status API.
#[derive(Debug, Clone)]
pub struct PracticumClient {
    url: String,
    token: String,
    client: Client,
}

impl PracticumClient {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Http(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            token: token.into(),
            client,
        })
    }

    async fn request(&self, since: i64) -> Result<Value, AppError> {
        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", since)])
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(AppError::Http(format!(
                "status {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, since: i64) -> FetchOutcome {
        tracing::debug!(from_date = since, "Requesting homework statuses");

        match self.request(since).await {
            Ok(payload) => FetchOutcome::Ok(payload),
            Err(e) if e.is_transport() => FetchOutcome::TransportError(e.to_string()),
            Err(e) => FetchOutcome::UnknownError(e.to_string()),
        }
    }
}

/// Connection-level failures are transport errors; everything else is not.
fn classify(err: reqwest::Error) -> AppError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        AppError::Transport(err.to_string())
    } else {
        AppError::Http(err.to_string())
    }
}

fn excerpt(body: &str) -> String {
    let mut out: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    if body.chars().count() > BODY_EXCERPT_CHARS {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(BODY_EXCERPT_CHARS + 50);
        let short = excerpt(&body);
        assert_eq!(short.chars().count(), BODY_EXCERPT_CHARS + 1);
        assert!(short.ends_with('…'));
        assert_eq!(excerpt("short"), "short");
    }
}
