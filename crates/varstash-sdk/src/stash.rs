use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{info, warn};
use varstash_hash::{Fingerprinter, Hash64, ValueCodec, Xxh64Hash64};
use varstash_reconcile::{load_all, LoadReport, NamespaceSink, ReconcileEngine, ReconcileReport};
use varstash_store::{
    BlobStore, FsBlobStore, FsMetadataStore, MetadataStore, SoftDelete, StoreError, StoreLayout,
    TrashDir,
};
use varstash_types::EntrySet;

use crate::config::StashConfig;
use crate::error::{SdkError, SdkResult};

/// Divergence between the metadata record and the blobs on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriftReport {
    /// Blobs on disk that the metadata does not list, sorted. Left behind
    /// by a save interrupted between its blob writes and its metadata write.
    pub orphaned_blobs: Vec<String>,
    /// Names the metadata lists with no blob on disk, in stored order.
    pub missing_blobs: Vec<String>,
}

impl DriftReport {
    pub fn is_consistent(&self) -> bool {
        self.orphaned_blobs.is_empty() && self.missing_blobs.is_empty()
    }
}

/// A store directory holding a named set of values.
pub struct Stash<C, H = Xxh64Hash64> {
    config: StashConfig,
    layout: StoreLayout,
    metadata: FsMetadataStore,
    blobs: FsBlobStore,
    fingerprinter: Fingerprinter<C, H>,
}

impl<C: ValueCodec> Stash<C, Xxh64Hash64> {
    /// Open the store described by `config`, fingerprinting with XXH64.
    ///
    /// Validates the configured names; fails with `InvalidPath` if any of
    /// them contains a reserved character. Nothing is created on disk until
    /// the first save.
    pub fn open(config: StashConfig, codec: C) -> SdkResult<Self> {
        Self::with_hasher(config, codec, Xxh64Hash64)
    }

    /// Open `./varstash` with the default layout.
    pub fn open_default(codec: C) -> SdkResult<Self> {
        Self::open(StashConfig::default(), codec)
    }
}

impl<C: ValueCodec, H: Hash64> Stash<C, H> {
    /// Open with a caller-supplied hash oracle.
    pub fn with_hasher(config: StashConfig, codec: C, hasher: H) -> SdkResult<Self> {
        config.validate()?;
        let layout = config.layout();
        Ok(Self {
            metadata: FsMetadataStore::new(&layout),
            blobs: FsBlobStore::new(&layout),
            fingerprinter: Fingerprinter::new(codec, hasher),
            layout,
            config,
        })
    }

    /// Replace the soft-delete capability, e.g. with the host's system trash.
    pub fn with_soft_delete(mut self, trash: Arc<dyn SoftDelete>) -> Self {
        self.blobs = FsBlobStore::with_soft_delete(&self.layout, trash);
        self
    }

    pub fn config(&self) -> &StashConfig {
        &self.config
    }

    /// The store directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Make the store hold exactly `entries`.
    ///
    /// Stored names not in `entries` are soft-deleted. New or changed values
    /// are written; unchanged values are not. Per-entry problems are
    /// reported in the returned [`ReconcileReport`] rather than failing the
    /// save. Names must be unique within `entries`.
    pub fn save_entries<'v, I, K>(&self, entries: I) -> SdkResult<ReconcileReport>
    where
        I: IntoIterator<Item = (K, &'v C::Value)>,
        K: AsRef<str>,
        C::Value: 'v,
    {
        let engine = ReconcileEngine::new(&self.metadata, &self.blobs, &self.fingerprinter);
        Ok(engine.reconcile(entries)?)
    }

    /// Bind every stored entry into `sink` under its sanitized name.
    pub fn load_all_entries<S>(&self, sink: &mut S) -> SdkResult<LoadReport>
    where
        S: NamespaceSink<C::Value> + ?Sized,
    {
        Ok(load_all(
            &self.metadata,
            &self.blobs,
            self.fingerprinter.codec(),
            sink,
        )?)
    }

    /// Load every stored entry into a fresh identifier-keyed map.
    pub fn load_map(&self) -> SdkResult<(IndexMap<String, C::Value>, LoadReport)> {
        let mut ns = IndexMap::new();
        let report = self.load_all_entries(&mut ns)?;
        Ok((ns, report))
    }

    /// Stored entry names, in stored order.
    pub fn list_stored_names(&self) -> SdkResult<Vec<String>> {
        Ok(self.entries()?.names().map(str::to_string).collect())
    }

    /// The stored entry set with digests.
    pub fn entries(&self) -> SdkResult<EntrySet> {
        Ok(self.metadata.load()?)
    }

    /// Compare the metadata record with the blobs actually on disk.
    pub fn check(&self) -> SdkResult<DriftReport> {
        let stored = self.entries()?;
        let on_disk = self.blobs.list()?;
        let on_disk_set: HashSet<&str> = on_disk.iter().map(String::as_str).collect();

        let report = DriftReport {
            orphaned_blobs: on_disk
                .iter()
                .filter(|name| !stored.contains(name))
                .cloned()
                .collect(),
            missing_blobs: stored
                .names()
                .filter(|name| !on_disk_set.contains(name))
                .map(str::to_string)
                .collect(),
        };

        if !report.is_consistent() {
            warn!(
                orphaned = report.orphaned_blobs.len(),
                missing = report.missing_blobs.len(),
                "store metadata and blobs disagree"
            );
        }
        Ok(report)
    }

    /// Move the newest trashed blob for `name` back into the store.
    ///
    /// Only the blob is restored; the metadata is untouched, so the next
    /// save reconciles it like any other blob. Works with the default trash
    /// directory only.
    pub fn restore(&self, name: &str) -> SdkResult<()> {
        self.blobs.check_name(name)?;
        if self.blobs.exists(name)? {
            return Err(SdkError::BlobExists(name.to_string()));
        }
        let trash = TrashDir::new(self.layout.trash_path());
        let file_name = self.layout.blob_file_name(name);
        if !trash
            .restore(&file_name, &self.layout.blob_path(name))
            .map_err(StoreError::from)?
        {
            return Err(StoreError::NothingToRestore(name.to_string()).into());
        }
        info!(name, "blob restored from trash");
        Ok(())
    }
}

impl<C, H> std::fmt::Debug for Stash<C, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stash")
            .field("root", &self.layout.root())
            .finish()
    }
}
