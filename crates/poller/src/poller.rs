use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use herald_common::config::AppConfig;
use herald_common::types::{DispatchOutcome, FetchOutcome, OutgoingMessage};
use herald_decoders::{latest_record, render, validator};
use herald_notifier::Notifier;

use crate::backoff::RetryState;
use crate::source::StatusSource;

/// Timing knobs for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Normal sleep between polls.
    pub poll_interval: Duration,
    /// Sleep inside the short-retry window.
    pub retry_interval: Duration,
    /// Short sleeps allowed in a row before reverting to `poll_interval`.
    pub max_short_retries: u32,
}

impl PollSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            retry_interval: config.retry_interval(),
            max_short_retries: config.max_short_retries,
        }
    }
}

/// What a cycle that needs no retry ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// Nothing new upstream.
    Idle,
    /// A verdict was delivered; holds the message text.
    Delivered(String),
    /// Upstream answered with data we cannot trust.
    Malformed(String),
}

/// A cycle that failed and goes through the retry window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("Problem accessing the homework API: {0}")]
    Transport(String),

    #[error("Homework API request failed: {0}")]
    Unclassified(String),

    #[error("Message not sent: {0}")]
    Dispatch(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Unclassified,
    Dispatch,
}

impl CycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CycleError::Transport(_) => ErrorKind::Transport,
            CycleError::Unclassified(_) => ErrorKind::Unclassified,
            CycleError::Dispatch(_) => ErrorKind::Dispatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Polling,
    HandlingError { kind: ErrorKind, retry_count: u32 },
    Sleeping(Duration),
}

/// Polls the status source and relays new verdicts to the chat.
///
/// Owns the timestamp cursor and the retry window; nothing else reads or
/// writes them.
pub struct PollLoop {
    source: Box<dyn StatusSource>,
    notifier: Notifier,
    retry: RetryState,
    cursor: i64,
    state: LoopState,
}

impl PollLoop {
    pub fn new(source: Box<dyn StatusSource>, notifier: Notifier, settings: PollSettings) -> Self {
        Self {
            source,
            notifier,
            retry: RetryState::new(
                settings.max_short_retries,
                settings.retry_interval,
                settings.poll_interval,
            ),
            cursor: Utc::now().timestamp(),
            state: LoopState::Polling,
        }
    }

    /// Start from a given timestamp instead of now.
    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn retry_count(&self) -> u32 {
        self.retry.count()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Poll forever. Stops only when the surrounding task is dropped.
    pub async fn run(&mut self) {
        tracing::info!(cursor = self.cursor, "Poll loop started");

        loop {
            let delay = self.run_cycle().await;
            tokio::time::sleep(delay).await;
        }
    }

    /// Run one poll cycle and return how long to sleep before the next.
    pub async fn run_cycle(&mut self) -> Duration {
        self.enter(LoopState::Polling);
        tracing::debug!(cursor = self.cursor, "Bot woke up");

        let delay = match self.poll_once().await {
            Ok(report) => self.finish_cycle(report).await,
            Err(err) => self.handle_error(err).await,
        };

        self.enter(LoopState::Sleeping(delay));
        if self.retry.is_short(delay) {
            tracing::debug!(
                sleep_secs = delay.as_secs(),
                retry = self.retry.count(),
                "Bot napping before retry"
            );
        } else {
            tracing::debug!(sleep_secs = delay.as_secs(), "Bot going to sleep");
        }
        delay
    }

    async fn poll_once(&mut self) -> Result<CycleReport, CycleError> {
        let payload = match self.source.fetch(self.cursor).await {
            FetchOutcome::Ok(payload) => payload,
            FetchOutcome::TransportError(detail) => return Err(CycleError::Transport(detail)),
            FetchOutcome::UnknownError(detail) => return Err(CycleError::Unclassified(detail)),
        };

        if let Some(server_time) = validator::current_date(&payload) {
            tracing::debug!(current_date = server_time, "Upstream clock");
        }

        let record = match latest_record(&payload) {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.advance_cursor();
                return Ok(CycleReport::Idle);
            }
            Err(e) => return Ok(CycleReport::Malformed(e.to_string())),
        };

        let message = OutgoingMessage::verdict(render(&record));
        match self.notifier.send(&message).await {
            DispatchOutcome::Ok => {
                self.advance_cursor();
                Ok(CycleReport::Delivered(message.text))
            }
            DispatchOutcome::Failed(detail) => Err(CycleError::Dispatch(detail)),
        }
    }

    async fn finish_cycle(&mut self, report: CycleReport) -> Duration {
        match &report {
            CycleReport::Idle => tracing::debug!("No new homework statuses"),
            CycleReport::Delivered(text) => tracing::info!(text = %text, "Message sent"),
            CycleReport::Malformed(reason) => {
                tracing::error!(error = %reason, cursor = self.cursor, "Bad status payload");
                self.notifier.report_failure(reason).await;
            }
        }
        self.retry.after_success()
    }

    async fn handle_error(&mut self, err: CycleError) -> Duration {
        self.enter(LoopState::HandlingError {
            kind: err.kind(),
            retry_count: self.retry.count(),
        });

        match &err {
            CycleError::Transport(_) => {
                // The chat is usually unreachable too; don't try to report.
                tracing::warn!(error = %err, "Status API unreachable");
            }
            CycleError::Unclassified(_) => {
                tracing::error!(error = %err, "Poll cycle failed");
                self.notifier.report_failure(&err.to_string()).await;
            }
            CycleError::Dispatch(_) => {
                tracing::error!(error = %err, cursor = self.cursor, "Verdict not delivered");
            }
        }

        self.retry.after_failure()
    }

    fn enter(&mut self, state: LoopState) {
        tracing::debug!(state = ?state, "Loop state");
        self.state = state;
    }

    fn advance_cursor(&mut self) {
        self.cursor = self.cursor.max(Utc::now().timestamp());
    }
}
