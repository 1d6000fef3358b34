//! Core error taxonomy.
//!
//! # Responsibility
//! - Give every fallible core operation one semantic error kind.
//! - Keep transport failures (terminal, storage) distinguishable from
//!   user-recoverable conditions.
//!
//! # Invariants
//! - Only `Config` errors raised while loading the settings source are fatal
//!   to the process; every other kind is recovered by the shell.
//! - `InputExhausted` is an exit signal, never reported as a failure.

use crate::db::DbError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used across core operations.
pub type NoteMapResult<T> = Result<T, NoteMapError>;

/// Semantic error kinds surfaced by core operations.
#[derive(Debug)]
pub enum NoteMapError {
    /// A user-supplied value was rejected (for example a blank map name).
    Validation(String),
    /// Nothing to show: empty catalog, unknown note identity.
    NotFound(String),
    /// Selection index outside the currently valid range.
    OutOfRange { index: usize, len: usize },
    /// Settings are unusable for the requested operation.
    Config(String),
    /// Terminal read/write failure.
    Io(std::io::Error),
    /// End of terminal input.
    InputExhausted,
    /// Persistence gateway failure.
    Storage(StoreError),
}

impl NoteMapError {
    /// Returns whether this error is the end-of-input exit signal.
    pub fn is_input_exhausted(&self) -> bool {
        matches!(self, Self::InputExhausted)
    }
}

impl Display for NoteMapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::NotFound(message) => write!(f, "not found: {message}"),
            Self::OutOfRange { index, len } => {
                if *len == 0 {
                    write!(f, "index {index} is out of range: nothing to select")
                } else {
                    write!(
                        f,
                        "index {index} is out of range: expected 0..={}",
                        len - 1
                    )
                }
            }
            Self::Config(message) => write!(f, "configuration error: {message}"),
            Self::Io(err) => write!(f, "terminal i/o failure: {err}"),
            Self::InputExhausted => write!(f, "end of input"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for NoteMapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NoteMapError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for NoteMapError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<DbError> for NoteMapError {
    fn from(value: DbError) -> Self {
        Self::Storage(StoreError::Db(value))
    }
}

#[cfg(test)]
mod tests {
    use super::NoteMapError;

    #[test]
    fn out_of_range_message_names_valid_bounds() {
        let err = NoteMapError::OutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 is out of range: expected 0..=1");

        let empty = NoteMapError::OutOfRange { index: 0, len: 0 };
        assert!(empty.to_string().contains("nothing to select"));
    }

    #[test]
    fn input_exhausted_is_detectable() {
        assert!(NoteMapError::InputExhausted.is_input_exhausted());
        assert!(!NoteMapError::Validation("x".to_string()).is_input_exhausted());
    }
}
