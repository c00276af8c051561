use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid store path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("blob for {0:?} already exists; refusing to overwrite it from the trash")]
    BlobExists(String),

    #[error("reconcile error: {0}")]
    Reconcile(#[from] varstash_reconcile::ReconcileError),

    #[error("store error: {0}")]
    Store(#[from] varstash_store::StoreError),
}

pub type SdkResult<T> = Result<T, SdkError>;
