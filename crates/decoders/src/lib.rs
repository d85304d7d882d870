pub mod translator;
pub mod validator;

use thiserror::Error;

/// Why a status payload could not be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The top-level `homeworks` list is absent or not a list.
    #[error("Unexpected server response: JSON format")]
    MissingHomeworks,

    /// The most recent record is incomplete or carries an unknown status.
    #[error("Unexpected server response: homework format ({0})")]
    InvalidRecord(String),
}

pub use translator::render;
pub use validator::{check, current_date, latest_record};
