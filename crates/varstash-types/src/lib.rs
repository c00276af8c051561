//! Foundation types for varstash.
//!
//! varstash persists a named set of in-memory values into a directory, one
//! blob per name, and rewrites a blob only when the content fingerprint of
//! its value changes. This crate holds the types every other varstash crate
//! shares. It performs no I/O.
//!
//! # Key Types
//!
//! - [`Digest`] -- 64-bit content fingerprint of a serialized value
//! - [`EntrySet`] -- insertion-ordered name to digest mapping (the metadata)
//! - [`Identifier`] -- a name made safe for a caller's namespace
//! - [`sanitize`] -- maps any entry name onto an [`Identifier`]
//! - [`validate_entry_name`] -- rejects names that cannot become blob files

pub mod digest;
pub mod entry;
pub mod error;
pub mod names;

pub use digest::Digest;
pub use entry::{Entry, EntrySet};
pub use error::TypeError;
pub use names::{
    sanitize, validate_entry_name, Identifier, FALLBACK_IDENTIFIER, IDENTIFIER_PREFIX,
    MAX_IDENTIFIER_LEN, RESERVED_PATH_CHARS,
};
