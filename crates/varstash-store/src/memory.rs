use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use varstash_types::EntrySet;

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobStore, MetadataStore};

/// In-memory metadata record.
///
/// Holds the record in its persisted shape so tests observe exactly what a
/// save produced. Counts saves.
#[derive(Default)]
pub struct InMemoryMetadataStore {
    record: RwLock<Option<EntrySet>>,
    saves: AtomicUsize,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing record.
    pub fn with_entries(entries: EntrySet) -> Self {
        Self {
            record: RwLock::new(Some(entries)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// `true` once a record exists.
    pub fn has_record(&self) -> bool {
        self.record.read().expect("lock poisoned").is_some()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn load(&self) -> StoreResult<EntrySet> {
        let record = self.record.read().expect("lock poisoned");
        Ok(record.clone().unwrap_or_default())
    }

    fn save(&self, entries: &EntrySet) -> StoreResult<()> {
        *self.record.write().expect("lock poisoned") = Some(entries.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMetadataStore")
            .field("has_record", &self.has_record())
            .field("saves", &self.save_count())
            .finish()
    }
}

/// In-memory, map-based blob store.
///
/// Soft-deleted blobs move to a trash list instead of disappearing. Counts
/// writes so tests can observe the deduplication fast path.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    trash: RwLock<Vec<(String, Vec<u8>)>>,
    writes: AtomicUsize,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Soft-deleted blobs, in deletion order.
    pub fn trashed(&self) -> Vec<(String, Vec<u8>)> {
        self.trash.read().expect("lock poisoned").clone()
    }

    /// Remove a blob without going through the trash, simulating drift.
    pub fn remove_raw(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.write().expect("lock poisoned").remove(name)
    }

    /// Snapshot of all blobs, sorted by name.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        let map = self.blobs.read().expect("lock poisoned");
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn write(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        self.check_name(name)?;
        self.blobs
            .write()
            .expect("lock poisoned")
            .insert(name.to_string(), bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self, name: &str) -> StoreResult<Vec<u8>> {
        self.check_name(name)?;
        let map = self.blobs.read().expect("lock poisoned");
        map.get(name).cloned().ok_or_else(|| StoreError::MissingBlob {
            name: name.to_string(),
        })
    }

    fn soft_delete(&self, name: &str) -> StoreResult<()> {
        self.check_name(name)?;
        let removed = self.blobs.write().expect("lock poisoned").remove(name);
        match removed {
            Some(bytes) => {
                self.trash
                    .write()
                    .expect("lock poisoned")
                    .push((name.to_string(), bytes));
                Ok(())
            }
            None => Err(StoreError::MissingBlob {
                name: name.to_string(),
            }),
        }
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        self.check_name(name)?;
        Ok(self.blobs.read().expect("lock poisoned").contains_key(name))
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.snapshot().into_keys().collect())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .field("writes", &self.write_count())
            .finish()
    }
}
