use varstash_store::StoreError;

/// Failures that abort a whole save or load.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The metadata record could not be read; the entry set is unknown.
    #[error("cannot read metadata: {0}")]
    MetadataLoad(#[source] StoreError),

    /// The metadata record could not be written.
    #[error("cannot persist metadata: {0}")]
    MetadataSave(#[source] StoreError),

    /// A blob write failed mid-save.
    #[error("cannot persist blob {name:?}: {source}")]
    BlobWrite {
        name: String,
        #[source]
        source: StoreError,
    },

    /// A blob could not be soft-deleted for a reason other than being absent.
    #[error("cannot soft-delete blob {name:?}: {source}")]
    BlobDelete {
        name: String,
        #[source]
        source: StoreError,
    },
}

/// Result alias for reconciliation and load operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
