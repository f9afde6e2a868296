//! Error Taxonomy
//!
//! One error kind per failure class the system distinguishes. The dispatcher
//! never translates kinds: whatever a backend reports is forwarded to the
//! client verbatim, so every kind here has a stable wire status keyword
//! (see [`crate::protocol::status::Status`]).

use std::io;

use crate::protocol::status::Status;

#[derive(Debug, thiserror::Error)]
pub enum ShardError {
    /// Command-line syntax the validator rejects before any socket traffic.
    #[error("malformed command: {0}")]
    MalformedCommand(String),

    /// File extension outside the routing table.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// Archive requested for a type that cannot be archived.
    #[error("archive not supported for type: {0}")]
    UnsupportedArchiveType(String),

    /// Path not anchored at a recognized root.
    #[error("malformed path: {0}")]
    MalformedPath(String),

    /// Target file or directory absent on the owning node.
    #[error("not found: {0}")]
    NotFound(String),

    /// Local filesystem failure (mkdir, open, read, write).
    #[error("i/o failure: {0}")]
    IoError(#[from] io::Error),

    /// Dial failed or a backend connection dropped mid-exchange.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Declared payload length not satisfied before EOF.
    #[error("frame truncated")]
    Truncated,
}

impl ShardError {
    /// The wire status keyword this kind travels under.
    pub fn status(&self) -> Status {
        match self {
            ShardError::MalformedCommand(_)
            | ShardError::UnsupportedType(_)
            | ShardError::UnsupportedArchiveType(_)
            | ShardError::MalformedPath(_) => Status::Unsupported,
            ShardError::NotFound(_) => Status::NotFound,
            ShardError::IoError(_) => Status::IoError,
            ShardError::BackendUnavailable(_) => Status::Unavailable,
            ShardError::Truncated => Status::Truncated,
        }
    }
}
