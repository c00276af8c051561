use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Parallel name/digest sequences of different lengths.
    #[error("entry record misaligned: {names} names, {digests} digests")]
    Misaligned { names: usize, digests: usize },

    #[error("duplicate entry name: {0}")]
    DuplicateName(String),

    #[error("invalid entry name {name:?}: {reason}")]
    InvalidEntryName { name: String, reason: String },

    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
}
