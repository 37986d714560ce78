//! Error types for Vista.

use crate::source::SourceId;
use core::fmt;

/// Result type alias for Vista operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for source collection and derived view operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A derived view received a change event from a source it is not bound to.
    ///
    /// This is an internal consistency failure, never a recoverable condition.
    ForeignSource {
        expected: SourceId,
        got: SourceId,
    },
    /// Index past the end of an indexed source.
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    /// Key absent from a keyed source.
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ForeignSource { expected, got } => {
                write!(
                    f,
                    "Change event from source {} delivered to view bound to source {}",
                    got, expected
                )
            }
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for length {}", index, len)
            }
            Error::KeyNotFound => write!(f, "Key not found"),
        }
    }
}

impl Error {
    /// Creates a foreign source error.
    pub fn foreign_source(expected: SourceId, got: SourceId) -> Self {
        Error::ForeignSource { expected, got }
    }

    /// Creates an index out of bounds error.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Error::IndexOutOfBounds { index, len }
    }
}
