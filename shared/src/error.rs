use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

use crate::models::PollId;
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    ValidationFailed,
    NotFound,
    OutOfRange,
    SystemError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::OutOfRange => "Option index out of range",
            ErrorCode::SystemError => "Internal system error",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Poll {0} not found")]
    NotFound(PollId),
    #[error("Option index {index} is out of range for poll {poll_id} ({options} options)")]
    OutOfRange {
        poll_id: PollId,
        index: i64,
        options: usize,
    },
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PollError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PollError::Validation(_) => ErrorCode::ValidationFailed,
            PollError::NotFound(_) => ErrorCode::NotFound,
            PollError::OutOfRange { .. } => ErrorCode::OutOfRange,
            PollError::Storage(_) => ErrorCode::SystemError,
        }
    }

    pub fn storage(err: impl fmt::Display) -> Self {
        PollError::Storage(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub error: String,
}

impl From<&PollError> for ErrorResponse {
    fn from(err: &PollError) -> Self {
        // Storage details stay in the logs.
        let error = match err {
            PollError::Storage(_) => ErrorCode::SystemError.to_string(),
            other => other.to_string(),
        };
        Self { code: err.code(), error }
    }
}

pub type Result<T> = std::result::Result<T, PollError>;
