//! Filesystem backends.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use varstash_types::{validate_entry_name, EntrySet, TypeError};

use crate::error::{StoreError, StoreResult};
use crate::layout::StoreLayout;
use crate::record::MetadataRecord;
use crate::traits::{BlobStore, MetadataStore};
use crate::trash::{SoftDelete, TrashDir};

/// Write `bytes` to `path` via a temporary file in the same directory,
/// creating the directory if needed.
fn write_replace(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Metadata record stored as one JSON file.
#[derive(Clone, Debug)]
pub struct FsMetadataStore {
    path: PathBuf,
}

impl FsMetadataStore {
    pub fn new(layout: &StoreLayout) -> Self {
        Self {
            path: layout.metadata_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corruption(&self, reason: impl ToString) -> StoreError {
        StoreError::MetadataCorruption {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl MetadataStore for FsMetadataStore {
    fn load(&self) -> StoreResult<EntrySet> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no metadata record; starting empty");
                return Ok(EntrySet::new());
            }
            Err(e) => return Err(e.into()),
        };

        let record = MetadataRecord::from_bytes(&bytes).map_err(|e| self.corruption(e))?;
        record.into_entries().map_err(|e| self.corruption(e))
    }

    fn save(&self, entries: &EntrySet) -> StoreResult<()> {
        let bytes = MetadataRecord::from_entries(entries)
            .to_bytes()
            .map_err(|e| StoreError::Persistence {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })?;
        write_replace(&self.path, &bytes).map_err(|source| StoreError::Persistence {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = ?self.path, entries = entries.len(), "metadata saved");
        Ok(())
    }
}

/// One file per blob under the store root.
#[derive(Clone)]
pub struct FsBlobStore {
    layout: StoreLayout,
    trash: Arc<dyn SoftDelete>,
}

impl FsBlobStore {
    /// Blob store that soft-deletes into the layout's trash directory.
    pub fn new(layout: &StoreLayout) -> Self {
        let trash = TrashDir::new(layout.trash_path());
        Self::with_soft_delete(layout, Arc::new(trash))
    }

    /// Blob store with a caller-supplied soft-delete capability.
    pub fn with_soft_delete(layout: &StoreLayout, trash: Arc<dyn SoftDelete>) -> Self {
        Self {
            layout: layout.clone(),
            trash,
        }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    fn missing(name: &str) -> StoreError {
        StoreError::MissingBlob {
            name: name.to_string(),
        }
    }
}

impl std::fmt::Debug for FsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobStore")
            .field("root", &self.layout.root())
            .finish()
    }
}

impl BlobStore for FsBlobStore {
    fn write(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        self.check_name(name)?;
        let path = self.layout.blob_path(name);
        write_replace(&path, bytes).map_err(|source| StoreError::Persistence {
            path: path.clone(),
            source,
        })?;
        debug!(name, len = bytes.len(), "blob written");
        Ok(())
    }

    fn read(&self, name: &str) -> StoreResult<Vec<u8>> {
        self.check_name(name)?;
        match fs::read(self.layout.blob_path(name)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Self::missing(name)),
            Err(e) => Err(e.into()),
        }
    }

    fn soft_delete(&self, name: &str) -> StoreResult<()> {
        self.check_name(name)?;
        let path = self.layout.blob_path(name);
        if !path.is_file() {
            return Err(Self::missing(name));
        }
        let dest = self.trash.soft_delete(&path)?;
        debug!(name, to = ?dest, "blob soft-deleted");
        Ok(())
    }

    fn exists(&self, name: &str) -> StoreResult<bool> {
        self.check_name(name)?;
        Ok(self.layout.blob_path(name).is_file())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        let read_dir = match fs::read_dir(self.layout.root()) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            match file_name.to_str().and_then(|f| self.layout.blob_name_of(f)) {
                Some(name) => names.push(name),
                None => {
                    if file_name.to_str().map(|f| !f.starts_with(".tmp")).unwrap_or(true) {
                        warn!(file = ?file_name, "ignoring non-blob file in store");
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn check_name(&self, name: &str) -> StoreResult<()> {
        validate_entry_name(name)?;
        if self.layout.is_reserved_blob(name) {
            return Err(TypeError::InvalidEntryName {
                name: name.to_string(),
                reason: "collides with a reserved store file".into(),
            }
            .into());
        }
        Ok(())
    }
}
