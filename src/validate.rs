//! Shape checks for the status API payload.
use serde_json::Value;
use thiserror::Error;

use crate::model::StatusRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("API response is not a JSON object")]
    NotAMapping,
    #[error("API response is missing key `{0}`")]
    MissingKey(&'static str),
    #[error("`homeworks` list is empty")]
    EmptyRecords,
}

/// Check the payload shape and extract the most recent record.
///
/// The API returns records newest-first, so "most recent" is element 0 of a
/// non-empty `homeworks` list. `current_date` is required to be present but
/// is otherwise not interpreted.
pub fn validate(payload: &Value) -> Result<StatusRecord, ShapeError> {
    let object = payload.as_object().ok_or(ShapeError::NotAMapping)?;

    let homeworks = object
        .get("homeworks")
        .ok_or(ShapeError::MissingKey("homeworks"))?;
    if !object.contains_key("current_date") {
        return Err(ShapeError::MissingKey("current_date"));
    }

    let records = homeworks.as_array().ok_or(ShapeError::NotAMapping)?;
    let first = records.first().ok_or(ShapeError::EmptyRecords)?;
    let record = first.as_object().ok_or(ShapeError::NotAMapping)?;

    let homework_name = record
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(ShapeError::MissingKey("homework_name"))?;
    let status = record
        .get("status")
        .and_then(Value::as_str)
        .ok_or(ShapeError::MissingKey("status"))?;

    Ok(StatusRecord {
        homework_name: homework_name.to_string(),
        status: status.to_string(),
    })
}
