use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One homework entry extracted from the status API payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusRecord {
    pub homework_name: String,
    pub status: String,
}

/// Reported homework status codes. The set is closed: any other code in a
/// payload is an API contract violation, not a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("undocumented homework status in API response: `{0}`")]
pub struct UnknownStatusError(pub String);

impl Verdict {
    pub fn from_code(code: &str) -> Result<Self, UnknownStatusError> {
        match code {
            "approved" => Ok(Verdict::Approved),
            "reviewing" => Ok(Verdict::Reviewing),
            "rejected" => Ok(Verdict::Rejected),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Verdict::Approved => "The review is done: the reviewer liked everything. Hooray!",
            Verdict::Reviewing => "The work was taken up for review.",
            Verdict::Rejected => "The review is done: the reviewer left remarks.",
        }
    }
}

/// Render the notification text for a record, rejecting unknown status codes.
pub fn translate(record: &StatusRecord) -> Result<String, UnknownStatusError> {
    let verdict = Verdict::from_code(&record.status)?;
    Ok(format!(
        "Status of check for \"{}\" changed. {}",
        record.homework_name,
        verdict.template()
    ))
}
