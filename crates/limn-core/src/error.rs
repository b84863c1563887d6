//! Reported-error taxonomy for editor operations.

use thiserror::Error;

/// A rejected operation. Every variant carries the human-readable message
/// delivered through the caller's error sink; invalid input is always a
/// recoverable, reported condition, never a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A class, field, method, or relationship with the same identity
    /// already exists.
    #[error("{0}")]
    Duplicate(String),

    /// The named class, field, method, parameter, or relationship is not
    /// present.
    #[error("{0}")]
    NotFound(String),

    /// The request would change nothing: undo/redo exhausted, or an edit
    /// to the current value.
    #[error("{0}")]
    NoOp(String),

    /// A malformed argument, e.g. an unrecognized relationship kind tag.
    #[error("{0}")]
    InvalidArgument(String),
}

impl EditError {
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn no_op(msg: impl Into<String>) -> Self {
        Self::NoOp(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
