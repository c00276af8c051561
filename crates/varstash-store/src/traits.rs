use varstash_types::{validate_entry_name, EntrySet};

use crate::error::StoreResult;

/// Loads and persists the whole entry set as one record.
pub trait MetadataStore: Send + Sync {
    /// Read the persisted entry set.
    ///
    /// Returns an empty set if no record exists yet. Returns
    /// `MetadataCorruption` if a record exists but cannot be decoded, never
    /// partial data.
    fn load(&self) -> StoreResult<EntrySet>;

    /// Overwrite the record with `entries`.
    ///
    /// A failure here leaves metadata and blobs out of step; callers treat it
    /// as fatal for the operation in progress.
    fn save(&self, entries: &EntrySet) -> StoreResult<()>;
}

/// One opaque blob per entry name.
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` under `name`, replacing any existing blob.
    fn write(&self, name: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Read exactly the bytes last written under `name`.
    ///
    /// Returns `MissingBlob` if there is none.
    fn read(&self, name: &str) -> StoreResult<Vec<u8>>;

    /// Remove the blob for `name` recoverably.
    ///
    /// Returns `MissingBlob` if there is none; callers treat that as drift,
    /// not as a failure of their own.
    fn soft_delete(&self, name: &str) -> StoreResult<()>;

    /// Check whether a blob exists for `name`.
    fn exists(&self, name: &str) -> StoreResult<bool>;

    /// Names of all blobs currently present, sorted.
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Reject names this backend cannot store.
    ///
    /// The default applies the portable entry-name rules.
    fn check_name(&self, name: &str) -> StoreResult<()> {
        validate_entry_name(name)?;
        Ok(())
    }
}
