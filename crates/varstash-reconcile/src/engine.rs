//! The save path: diff stored entries against requested entries and apply it.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use varstash_hash::{Fingerprinter, Hash64, ValueCodec};
use varstash_store::{BlobStore, MetadataStore, StoreError};
use varstash_types::EntrySet;

use crate::error::{ReconcileError, ReconcileResult};
use crate::report::{EntryError, EntryFailure, ReconcileReport};

/// Aligns a store with a requested entry set.
///
/// Holds borrowed handles only; construct one per operation or keep it next
/// to the stores it borrows.
pub struct ReconcileEngine<'a, C, H> {
    metadata: &'a dyn MetadataStore,
    blobs: &'a dyn BlobStore,
    fingerprinter: &'a Fingerprinter<C, H>,
}

impl<'a, C: ValueCodec, H: Hash64> ReconcileEngine<'a, C, H> {
    pub fn new(
        metadata: &'a dyn MetadataStore,
        blobs: &'a dyn BlobStore,
        fingerprinter: &'a Fingerprinter<C, H>,
    ) -> Self {
        Self {
            metadata,
            blobs,
            fingerprinter,
        }
    }

    /// Make the store hold exactly the `requested` entries.
    ///
    /// 1. Load the stored entry set.
    /// 2. Soft-delete every stored name that is not requested, last first.
    /// 3. For each requested entry in order: skip it if its name is invalid
    ///    or repeated, its value is not persistable, or fingerprinting fails;
    ///    otherwise write its blob if the name is new, the digest changed, or
    ///    the recorded blob has gone missing.
    /// 4. Save the resulting entry set.
    ///
    /// A skipped name keeps whatever was stored for it before. The metadata
    /// is saved even when entries were skipped. If a blob write or delete
    /// fails, the metadata is still saved to reflect the changes already
    /// made, and the blob failure is returned.
    pub fn reconcile<'v, I, K>(&self, requested: I) -> ReconcileResult<ReconcileReport>
    where
        I: IntoIterator<Item = (K, &'v C::Value)>,
        K: AsRef<str>,
        C::Value: 'v,
    {
        let requested: Vec<(K, &'v C::Value)> = requested.into_iter().collect();
        let mut stored = self
            .metadata
            .load()
            .map_err(ReconcileError::MetadataLoad)?;
        let mut report = ReconcileReport::default();

        let outcome = self
            .delete_missing(&mut stored, &requested, &mut report)
            .and_then(|()| self.upsert_all(&mut stored, &requested, &mut report));

        self.metadata
            .save(&stored)
            .map_err(ReconcileError::MetadataSave)?;
        outcome?;

        info!(
            inserted = report.inserted.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            deleted = report.deleted.len(),
            skipped = report.skipped.len(),
            drift = report.drift.len(),
            "store reconciled"
        );
        Ok(report)
    }

    fn delete_missing<K: AsRef<str>>(
        &self,
        stored: &mut EntrySet,
        requested: &[(K, &C::Value)],
        report: &mut ReconcileReport,
    ) -> ReconcileResult<()> {
        let presented: HashSet<&str> = requested.iter().map(|(k, _)| k.as_ref()).collect();
        let doomed: Vec<String> = stored
            .names()
            .rev()
            .filter(|name| !presented.contains(name))
            .map(str::to_string)
            .collect();

        for name in doomed {
            match self.blobs.soft_delete(&name) {
                Ok(()) => {
                    debug!(name = %name, "blob soft-deleted");
                    report.deleted.push(name.clone());
                }
                Err(StoreError::MissingBlob { .. }) => {
                    warn!(name = %name, "stored entry had no blob; dropping it from metadata");
                    report
                        .drift
                        .push(EntryFailure::new(name.clone(), EntryError::MissingBlob));
                }
                Err(e @ StoreError::InvalidName(_)) => {
                    warn!(name = %name, error = %e, "stored entry has an unusable name; dropping it");
                    report
                        .drift
                        .push(EntryFailure::new(name.clone(), EntryError::InvalidName(e)));
                }
                Err(source) => return Err(ReconcileError::BlobDelete { name, source }),
            }
            stored.remove(&name);
        }
        Ok(())
    }

    fn upsert_all<K: AsRef<str>>(
        &self,
        stored: &mut EntrySet,
        requested: &[(K, &C::Value)],
        report: &mut ReconcileReport,
    ) -> ReconcileResult<()> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(requested.len());

        for (name, value) in requested {
            let name = name.as_ref();

            if !seen.insert(name) {
                warn!(name, "name presented twice; keeping the first");
                report
                    .skipped
                    .push(EntryFailure::new(name, EntryError::DuplicateName));
                continue;
            }

            if let Err(e) = self.blobs.check_name(name) {
                warn!(name, error = %e, "skipping entry with invalid name");
                report
                    .skipped
                    .push(EntryFailure::new(name, EntryError::InvalidName(e)));
                continue;
            }

            if !self.fingerprinter.codec().is_persistable(value) {
                warn!(name, "skipping value that cannot be persisted");
                report
                    .skipped
                    .push(EntryFailure::new(name, EntryError::NonPersistable));
                continue;
            }

            let (digest, bytes) = match self.fingerprinter.fingerprint_bytes(value) {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(name, error = %e, "skipping entry that cannot be fingerprinted");
                    report.skipped.push(EntryFailure::new(name, e.into()));
                    continue;
                }
            };

            let previous = stored.get(name);
            if previous == Some(digest) {
                match self.blobs.exists(name) {
                    Ok(false) => {
                        warn!(name, "recorded blob is missing; rewriting it");
                        report
                            .drift
                            .push(EntryFailure::new(name, EntryError::MissingBlob));
                    }
                    Ok(true) | Err(_) => {
                        debug!(name, %digest, "unchanged; blob write skipped");
                        report.unchanged.push(name.to_string());
                        continue;
                    }
                }
            }

            self.blobs
                .write(name, &bytes)
                .map_err(|source| ReconcileError::BlobWrite {
                    name: name.to_string(),
                    source,
                })?;
            stored.upsert(name, digest);

            match previous {
                None => {
                    debug!(name, %digest, "new entry written");
                    report.inserted.push(name.to_string());
                }
                Some(old) => {
                    debug!(name, %old, new = %digest, "changed entry rewritten");
                    report.updated.push(name.to_string());
                }
            }
        }
        Ok(())
    }
}
