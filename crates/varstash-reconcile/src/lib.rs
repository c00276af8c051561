//! Reconciliation and load protocol for varstash.
//!
//! A save presents the complete set of entries that should exist. The
//! [`ReconcileEngine`] compares it with the stored [`EntrySet`] and applies
//! the minimal change: soft-delete names that are gone, write blobs for names
//! that are new or whose fingerprint changed, and leave everything else
//! alone. [`load_all`] is the reverse path, binding every stored entry into a
//! caller-supplied [`NamespaceSink`].
//!
//! # Failure isolation
//!
//! - Structural failures (unreadable metadata, failed metadata or blob write)
//!   abort the operation with a [`ReconcileError`].
//! - Per-entry failures (unpersistable value, failed fingerprint, bad name,
//!   missing or undecodable blob, rejected bind) are logged, recorded in the
//!   report, and do not stop the rest of the batch.
//!
//! # Crash caveat
//!
//! Blob writes and the final metadata write are separate. A crash between
//! them leaves either an orphaned blob (written, never recorded) or a stale
//! digest (recorded digest no longer matches the blob). The next save
//! repairs a stale digest by rewriting the blob, and rewrites a recorded
//! blob that has gone missing if its name is presented again. Orphans stay
//! until their name is saved or the file is removed.
//!
//! [`EntrySet`]: varstash_types::EntrySet

pub mod engine;
pub mod error;
pub mod load;
pub mod report;
pub mod sink;

pub use engine::ReconcileEngine;
pub use error::{ReconcileError, ReconcileResult};
pub use load::load_all;
pub use report::{EntryError, EntryFailure, LoadReport, ReconcileReport};
pub use sink::{BindError, FnSink, NamespaceSink};
