use serde::{Deserialize, Serialize};

/// Prefix carried by every failure report sent to the chat.
pub const ERROR_REPORT_PREFIX: &str = "Bot crashed with error: ";

/// Review verdict reported by the homework status API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Rejected,
    Reviewing,
    Approved,
}

impl HomeworkStatus {
    /// Parse the wire value. Anything outside the known set is rejected.
    pub fn from_api(value: &str) -> Option<Self> {
        match value {
            "rejected" => Some(Self::Rejected),
            "reviewing" => Some(Self::Reviewing),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomeworkStatus::Rejected => write!(f, "rejected"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Approved => write!(f, "approved"),
        }
    }
}

/// A single homework submission as reported upstream.
///
/// Only constructed by the response validator, so `name` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub name: String,
    pub status: HomeworkStatus,
}

/// Result of one call to the upstream status API.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Decoded JSON body, not yet validated.
    Ok(serde_json::Value),
    /// Connection refused, DNS failure, timeout.
    TransportError(String),
    /// Anything else: bad status, undecodable body.
    UnknownError(String),
}

/// Result of one delivery attempt to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ok,
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, DispatchOutcome::Ok)
    }
}

/// What an outgoing chat message represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A review verdict for the user.
    Verdict,
    /// A report about the bot's own failure.
    ErrorReport,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Verdict => write!(f, "verdict"),
            MessageKind::ErrorReport => write!(f, "error_report"),
        }
    }
}

/// Text ready for delivery, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl OutgoingMessage {
    pub fn verdict(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Verdict,
            text: text.into(),
        }
    }

    /// Build a failure report. A detail that is already a report is not prefixed twice.
    pub fn error_report(detail: &str) -> Self {
        let text = if detail.starts_with(ERROR_REPORT_PREFIX) {
            detail.to_string()
        } else {
            format!("{ERROR_REPORT_PREFIX}{detail}")
        };
        Self {
            kind: MessageKind::ErrorReport,
            text,
        }
    }

    pub fn is_error_report(&self) -> bool {
        self.kind == MessageKind::ErrorReport
    }
}
