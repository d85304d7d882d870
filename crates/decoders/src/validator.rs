//! Shape checks for the homework status payload.
//!
//! Only the first entry of `homeworks` is inspected: the API lists records
//! newest first and the bot only ever reports the latest verdict.

use serde_json::Value;

use herald_common::types::{HomeworkRecord, HomeworkStatus};

use crate::FormatError;

/// Returns `true` when the payload is safe to act on.
pub fn check(payload: &Value) -> bool {
    latest_record(payload).is_ok()
}

/// Validate the payload and extract its most recent record.
///
/// `Ok(None)` means the list was present and empty.
pub fn latest_record(payload: &Value) -> Result<Option<HomeworkRecord>, FormatError> {
    let homeworks = payload
        .get("homeworks")
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingHomeworks)?;

    match homeworks.first() {
        Some(first) => parse_record(first).map(Some),
        None => Ok(None),
    }
}

/// Optional server timestamp sent next to the list.
pub fn current_date(payload: &Value) -> Option<i64> {
    payload.get("current_date").and_then(Value::as_i64)
}

fn parse_record(homework: &Value) -> Result<HomeworkRecord, FormatError> {
    let name = match homework.get("homework_name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(Value::String(_)) => {
            return Err(FormatError::InvalidRecord("homework_name is empty".into()));
        }
        Some(Value::Null) | None => {
            return Err(FormatError::InvalidRecord("homework_name is missing".into()));
        }
        Some(other) => {
            return Err(FormatError::InvalidRecord(format!(
                "homework_name is not a string: {other}"
            )));
        }
    };

    let raw_status = homework
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| FormatError::InvalidRecord("status is missing or not a string".into()))?;

    let status = HomeworkStatus::from_api(raw_status)
        .ok_or_else(|| FormatError::InvalidRecord(format!("unknown status '{raw_status}'")))?;

    Ok(HomeworkRecord { name, status })
}
