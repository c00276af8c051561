//! Value codecs and content fingerprinting for varstash.
//!
//! varstash never looks inside a value. It needs three things from the host:
//! a way to turn a value into bytes and back ([`ValueCodec`]), a way to tell
//! whether a value can be persisted at all ([`ValueCodec::is_persistable`]),
//! and a 64-bit hash over bytes ([`Hash64`]). [`Fingerprinter`] combines a
//! codec and a hash into the single `fingerprint(value) -> Digest` operation
//! the reconciliation engine uses for change detection.

pub mod codec;
pub mod error;
pub mod fingerprint;
pub mod oracle;

pub use codec::{BincodeCodec, JsonCodec, ValueCodec};
pub use error::{CodecError, FingerprintError};
pub use fingerprint::Fingerprinter;
pub use oracle::{Blake3Hash64, Hash64, Xxh64Hash64};
