use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content fingerprint of one serialized value.
///
/// A `Digest` is the output of a 64-bit hash over a value's serialized bytes.
/// Two values with identical byte representations always share a digest. The
/// converse is assumed, not proven: collisions in a 64-bit space are an
/// accepted risk at the scale of a single store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(u64);

impl Digest {
    /// Wrap a raw 64-bit hash value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw 64-bit value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian bytes, the order used for the hex form.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Hex-encoded string representation (16 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_be_bytes())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.to_be_bytes()[..4])
    }

    /// Parse from a 16-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength {
                expected: 8,
                actual: bytes.len(),
            })?;
        Ok(Self(u64::from_be_bytes(arr)))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<u64> for Digest {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Digest> for u64 {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}
