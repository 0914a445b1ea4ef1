//! Error types for the arcglobe crate.

use std::fmt;

/// Result type for arcglobe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating globe configuration.
///
/// Geometry and animation are total; only configuration can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A destination entry has an out-of-range or malformed field.
    InvalidDestination {
        /// Name of the offending destination (may be empty).
        name: String,
        /// The field that failed validation.
        field: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
    /// Two destinations share the same name.
    DuplicateDestination {
        /// The repeated name.
        name: String,
    },
    /// The destination table has no entries.
    EmptyRegistry,
    /// The arc origin point is out of range.
    InvalidOrigin {
        /// Description of what was invalid.
        detail: String,
    },
    /// A globe-wide setting is out of range.
    InvalidSetting {
        /// The setting that failed validation.
        field: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
    /// Arcs need at least two samples to be drawn.
    InvalidSampleCount {
        /// The rejected count.
        count: usize,
    },
    /// The destination table could not be parsed.
    Parse {
        /// The parser's message.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDestination {
                name,
                field,
                detail,
            } => {
                write!(f, "invalid {field} for destination {name:?}: {detail}")
            }
            Error::DuplicateDestination { name } => {
                write!(f, "destination {name:?} is listed more than once")
            }
            Error::EmptyRegistry => write!(f, "destination table is empty"),
            Error::InvalidOrigin { detail } => write!(f, "invalid arc origin: {detail}"),
            Error::InvalidSetting { field, detail } => write!(f, "invalid {field}: {detail}"),
            Error::InvalidSampleCount { count } => {
                write!(f, "arc sample count must be at least 2, got {count}")
            }
            Error::Parse { message } => {
                write!(f, "failed to parse destination table: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse {
            message: e.to_string(),
        }
    }
}
