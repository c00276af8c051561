//! Durable storage for varstash.
//!
//! A store is one directory holding a metadata record (the ordered
//! name to digest [`EntrySet`](varstash_types::EntrySet)) and one blob file
//! per entry. This crate reads and writes both, and removes blobs
//! recoverably through a [`SoftDelete`] capability instead of erasing them.
//!
//! # Storage Backends
//!
//! - [`FsMetadataStore`] / [`FsBlobStore`] -- files under a [`StoreLayout`]
//! - [`InMemoryMetadataStore`] / [`InMemoryBlobStore`] -- for tests and embedding
//!
//! # Design Rules
//!
//! 1. The metadata record is always read and written whole.
//! 2. Reading the record decodes only its `names` and `digests` fields.
//! 3. A blob read touches only that blob's file.
//! 4. Single record writes go through a temporary file and a rename.
//! 5. Nothing here is safe against concurrent writers to the same store.

pub mod error;
pub mod fs;
pub mod layout;
pub mod memory;
pub mod record;
pub mod traits;
pub mod trash;

pub use error::{StoreError, StoreResult};
pub use fs::{FsBlobStore, FsMetadataStore};
pub use layout::StoreLayout;
pub use memory::{InMemoryBlobStore, InMemoryMetadataStore};
pub use record::MetadataRecord;
pub use traits::{BlobStore, MetadataStore};
pub use trash::{SoftDelete, TrashDir};
