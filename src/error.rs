// File: src/error.rs
use thiserror::Error;

/// Failures reported by a [`VectorSpaceIndex`](crate::core::index::VectorSpaceIndex).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// A key handed to the index is not part of its vocabulary
    #[error("Key not found in vector index: {0}")]
    UnknownKey(String),

    /// The operands cannot be compared (empty key list, mismatched dimensions)
    #[error("Incompatible operands: {0}")]
    Incompatible(String),

    /// The index itself failed
    #[error("Vector index failure: {0}")]
    Backend(String),
}

impl IndexError {
    /// Whether this failure means "these inputs have no meaningful score"
    /// rather than "the index is broken".
    pub fn is_incomparable(&self) -> bool {
        matches!(self, IndexError::UnknownKey(_) | IndexError::Incompatible(_))
    }
}

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum SenseError {
    /// The caller handed in a phrase of an unrecognized shape
    #[error("Invalid phrase input: {0}")]
    InvalidInput(String),

    /// A raw key could not be split into word and sense
    #[error("Invalid word-sense key: {0}")]
    InvalidKey(String),

    /// The vector index failed
    #[error("Index operation failed: {0}")]
    Index(#[from] IndexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be encoded or decoded
    #[error("Snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = SenseError> = std::result::Result<T, E>;
