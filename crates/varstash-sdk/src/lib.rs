//! High-level API for varstash.
//!
//! [`Stash`] is the entry point for applications: open a store directory,
//! save a named set of values into it, and load them back into a namespace.
//! Saving is incremental; a value whose content fingerprint did not change
//! since the last save is not serialized to disk again.
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use serde_json::{json, Value};
//! use varstash_sdk::{JsonCodec, Stash, StashConfig};
//!
//! let stash = Stash::open(StashConfig::default(), JsonCodec)?;
//!
//! let mut values = BTreeMap::new();
//! values.insert("a".to_string(), json!([1, 2, 3]));
//! values.insert("b".to_string(), json!("x"));
//! stash.save_entries(&values)?;
//!
//! let mut ns: BTreeMap<String, Value> = BTreeMap::new();
//! stash.load_all_entries(&mut ns)?;
//! # Ok::<(), varstash_sdk::SdkError>(())
//! ```
//!
//! Concurrent saves against the same store directory are not supported.

pub mod config;
pub mod error;
pub mod stash;

pub use config::StashConfig;
pub use error::{SdkError, SdkResult};
pub use stash::{DriftReport, Stash};

// Re-export the types callers need alongside `Stash`.
pub use varstash_hash::{
    BincodeCodec, Blake3Hash64, CodecError, Hash64, JsonCodec, ValueCodec, Xxh64Hash64,
};
pub use varstash_reconcile::{
    BindError, EntryError, EntryFailure, FnSink, LoadReport, NamespaceSink, ReconcileReport,
};
pub use varstash_store::{SoftDelete, TrashDir};
pub use varstash_types::{sanitize, Digest, EntrySet, Identifier};
