//! Error types for trace generation and configuration
//!
//! [`VizError`] covers everything that can go wrong before a trace exists:
//! malformed arguments reaching a generator directly, and the range checks
//! performed by the [`catalog`](crate::catalog) layer before a generator is
//! invoked.
//!
//! Designed stopping points inside an algorithm (a full probing table, for
//! instance) are not errors. They are recorded as steps.

use thiserror::Error;

/// Errors produced while configuring or generating a trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VizError {
    /// Malformed or out-of-contract input reached a generator.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A caller-supplied value is outside the range the visualizer accepts.
    #[error("{what} must be between {min} and {max}, got {value}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A run needs an input value (search target, recursion argument).
    #[error("missing input: {what}")]
    MissingInput { what: &'static str },

    /// The algorithm identifier is not in the catalog.
    #[error("unknown algorithm '{name}'")]
    UnknownAlgorithm { name: String },

    /// A generator returned no steps.
    #[error("no steps generated")]
    EmptyTrace,
}

impl VizError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        VizError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VizError>;
