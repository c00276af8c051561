//! The load path: bind every stored entry into a caller's namespace.

use tracing::{debug, info, warn};
use varstash_hash::ValueCodec;
use varstash_store::{BlobStore, MetadataStore, StoreError};
use varstash_types::sanitize;

use crate::error::{ReconcileError, ReconcileResult};
use crate::report::{EntryError, EntryFailure, LoadReport};
use crate::sink::NamespaceSink;

/// Restore all stored entries into `sink`, in stored order.
///
/// Each blob is read by its own name only. A missing or undecodable blob,
/// or a bind the sink refuses, is logged and recorded, and loading moves on
/// to the next entry. Only an unreadable metadata record aborts the load.
pub fn load_all<C, S>(
    metadata: &dyn MetadataStore,
    blobs: &dyn BlobStore,
    codec: &C,
    sink: &mut S,
) -> ReconcileResult<LoadReport>
where
    C: ValueCodec,
    S: NamespaceSink<C::Value> + ?Sized,
{
    let stored = metadata.load().map_err(ReconcileError::MetadataLoad)?;
    let mut report = LoadReport::default();

    for (name, _digest) in stored.iter() {
        let bytes = match blobs.read(name) {
            Ok(bytes) => bytes,
            Err(StoreError::MissingBlob { .. }) => {
                warn!(name, "stored entry has no blob; skipping");
                report
                    .failures
                    .push(EntryFailure::new(name, EntryError::MissingBlob));
                continue;
            }
            Err(e) => {
                warn!(name, error = %e, "cannot read blob; skipping");
                report.failures.push(EntryFailure::new(name, EntryError::Read(e)));
                continue;
            }
        };

        let value = match codec.decode(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(name, error = %e, "cannot decode blob; skipping");
                report.failures.push(EntryFailure::new(name, e.into()));
                continue;
            }
        };

        let identifier = sanitize(name);
        if let Err(e) = sink.bind(&identifier, value) {
            warn!(name, %identifier, error = %e, "binding refused");
            report.failures.push(EntryFailure::new(name, e.into()));
            continue;
        }

        debug!(name, %identifier, "entry bound");
        report.bound.push((name.to_string(), identifier));
    }

    info!(
        bound = report.bound.len(),
        failed = report.failures.len(),
        "store loaded"
    );
    Ok(report)
}
