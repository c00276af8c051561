use std::path::PathBuf;

use varstash_types::TypeError;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No blob exists for the entry name.
    #[error("no blob stored for {name:?}")]
    MissingBlob { name: String },

    /// The metadata record exists but does not have the expected shape.
    #[error("metadata record {path:?} is corrupt: {reason}")]
    MetadataCorruption { path: PathBuf, reason: String },

    /// A metadata or blob write failed.
    #[error("failed to persist {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry name cannot be used as a blob file stem.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    /// Nothing in the trash matches the requested blob.
    #[error("no trashed copy of {0:?}")]
    NothingToRestore(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// `true` for errors that mean a blob is simply not there.
    pub fn is_missing_blob(&self) -> bool {
        matches!(self, Self::MissingBlob { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
