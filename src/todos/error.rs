//! Failure taxonomy for list operations.

use serde::Serialize;
use thiserror::Error;

use crate::status::Status;

/// Everything that can go wrong while serving a list request.
///
/// Each variant renders as `{"name": …, "message": …}` through
/// [`TodoError::payload`]; the `Display` text is the message.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Param \"todo\" can't be empty")]
    EmptyParam,

    #[error("Expected \"todo\" param to be string")]
    WrongParamType,

    #[error("{reason}")]
    InvalidIdentifier { reason: &'static str },

    /// The request carried text that is not JSON.
    #[error("{0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Task already exists")]
    AlreadyExists,

    #[error("Task list does not exist")]
    NotFound,

    /// A stored list file is not JSON.
    #[error("{0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// The `error` member of every failure body.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub name: &'static str,
    pub message: String,
}

impl TodoError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmptyParam => "Empty param",
            Self::WrongParamType => "Wrong param type",
            Self::InvalidIdentifier { .. } => "Invalid identifier",
            Self::InvalidJson(_) | Self::Corrupt(_) => "SyntaxError",
            Self::AlreadyExists => "Task already exists",
            Self::NotFound => "Task list does not exist",
            Self::Io(_) => "IOError",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::EmptyParam
            | Self::WrongParamType
            | Self::InvalidIdentifier { .. }
            | Self::InvalidJson(_) => Status::BadRequest,
            Self::AlreadyExists => Status::Conflict,
            Self::NotFound => Status::NotFound,
            Self::Corrupt(_) | Self::Io(_) => Status::InternalServerError,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload { name: self.name(), message: self.to_string() }
    }
}
