//! Error types for the core layer.

use crate::host::{ContextId, Origin};

/// Errors surfaced to callers of the core layer.
///
/// Context access failures are not part of this enum: the resolver absorbs
/// them, see [`AccessDenied`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An attach argument had the wrong type.
    #[error("invalid argument `{argument}`: expected {expected}, got {found}")]
    InvalidArgument {
        argument: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A stored value could not be converted to or from a typed representation.
    #[error("conversion failed for key '{key}': {message}")]
    Convert { key: String, message: String },
}

impl Error {
    pub fn invalid_argument(
        argument: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Error::InvalidArgument {
            argument,
            expected,
            found,
        }
    }

    pub fn convert(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Convert {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Reaching another context was blocked by origin isolation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("context {from} ({from_origin}) may not access context {to} ({to_origin})")]
pub struct AccessDenied {
    pub from: ContextId,
    pub from_origin: Origin,
    pub to: ContextId,
    pub to_origin: Origin,
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
