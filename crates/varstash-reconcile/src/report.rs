//! Per-operation outcome reports.

use varstash_hash::{CodecError, FingerprintError};
use varstash_store::StoreError;
use varstash_types::Identifier;

use crate::sink::BindError;

/// Why a single entry was skipped or could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("value cannot be persisted")]
    NonPersistable,

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error("invalid entry name: {0}")]
    InvalidName(#[source] StoreError),

    #[error("name appears more than once in the request")]
    DuplicateName,

    #[error("blob is missing")]
    MissingBlob,

    #[error("cannot read blob: {0}")]
    Read(#[source] StoreError),

    #[error(transparent)]
    Decode(#[from] CodecError),

    #[error(transparent)]
    Bind(#[from] BindError),
}

/// One entry that did not go through.
#[derive(Debug)]
pub struct EntryFailure {
    pub name: String,
    pub reason: EntryError,
}

impl EntryFailure {
    pub fn new(name: impl Into<String>, reason: EntryError) -> Self {
        Self {
            name: name.into(),
            reason,
        }
    }
}

impl std::fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// What a save did, name by name.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// New names; blob written.
    pub inserted: Vec<String>,
    /// Known names with a changed fingerprint; blob rewritten.
    pub updated: Vec<String>,
    /// Known names with an unchanged fingerprint; nothing written.
    pub unchanged: Vec<String>,
    /// Names dropped from the store; blob soft-deleted.
    pub deleted: Vec<String>,
    /// Presented names that were skipped; prior state left untouched.
    pub skipped: Vec<EntryFailure>,
    /// Stored names whose blob was found missing. Dropped from metadata if
    /// no longer presented, rewritten otherwise.
    pub drift: Vec<EntryFailure>,
}

impl ReconcileReport {
    /// Number of blobs written by this save.
    pub fn blob_writes(&self) -> usize {
        self.inserted.len() + self.updated.len()
    }

    /// `true` if the save wrote, deleted, or dropped nothing.
    pub fn is_noop(&self) -> bool {
        self.blob_writes() == 0 && self.deleted.is_empty() && self.drift.is_empty()
    }

    /// `true` if every presented entry went through and no drift was seen.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.drift.is_empty()
    }
}

/// What a load bound, name by name.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Stored name and the identifier it was bound under, in stored order.
    pub bound: Vec<(String, Identifier)>,
    /// Entries that could not be read, decoded, or bound.
    pub failures: Vec<EntryFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
