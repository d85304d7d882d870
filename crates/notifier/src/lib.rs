//! Chat notification delivery.
//!
//! `Notifier` turns transport failures into a `DispatchOutcome` so the poll
//! loop never sees an error from the sink. Failure reports are sent at most
//! once: if one cannot be delivered it is dropped with a warning and never
//! reported in turn.

pub mod telegram;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use herald_common::types::{DispatchOutcome, OutgoingMessage};

pub use telegram::TelegramTransport;

/// Errors raised by a chat transport.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Chat API error (status {status}): {description}")]
    Api { status: u16, description: String },
}

/// Something that can put text into the configured chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), NotifierError>;
}

/// Outbound side of the bot.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn ChatTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Deliver one message. Never fails; errors come back as `DispatchOutcome::Failed`.
    pub async fn send(&self, message: &OutgoingMessage) -> DispatchOutcome {
        match self.transport.deliver(&message.text).await {
            Ok(()) => {
                tracing::debug!(kind = %message.kind, "Message delivered");
                DispatchOutcome::Ok
            }
            Err(e) if message.is_error_report() => {
                // Reporting this would send another report; stop here.
                tracing::warn!(error = %e, "Failure report not delivered, dropping it");
                DispatchOutcome::Failed(e.to_string())
            }
            Err(e) => {
                tracing::debug!(kind = %message.kind, error = %e, "Message not delivered");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    /// Tell the chat that the bot hit an error. Sent once, never escalated.
    pub async fn report_failure(&self, detail: &str) -> DispatchOutcome {
        self.send(&OutgoingMessage::error_report(detail)).await
    }
}
