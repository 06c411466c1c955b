//! Transport status returned by the request handler.

use crate::chat::services::{ChatServiceError, ErrorKind};
use std::fmt;
use thiserror::Error;

/// Transport-level status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// The addressed entity does not exist.
    NotFound,
    /// The entity already exists.
    AlreadyExists,
    /// Any other failure, including rejected input.
    Internal,
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Internal => "INTERNAL",
        };
        f.write_str(label)
    }
}

impl From<ErrorKind> for StatusCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Conflict => Self::AlreadyExists,
            ErrorKind::Validation | ErrorKind::Internal => Self::Internal,
        }
    }
}

/// Failed RPC outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    /// Creates a status with an explicit code.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ChatServiceError> for Status {
    fn from(err: ChatServiceError) -> Self {
        Self::new(err.kind().into(), err.to_string())
    }
}
