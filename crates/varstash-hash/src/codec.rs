//! Serialization primitives for persisted values.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Converts values of one type to and from their canonical bytes.
///
/// `encode` must be deterministic: equal values must produce equal bytes, or
/// every save would rewrite every blob. `decode(encode(v))` must yield a value
/// whose encoding equals `encode(v)`.
pub trait ValueCodec: Send + Sync {
    type Value;

    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Value, CodecError>;

    /// Whether `value` is of a kind that can be persisted at all.
    ///
    /// Values for which this returns `false` are skipped by a save and any
    /// blob previously stored under their name stays in place.
    fn is_persistable(&self, _value: &Self::Value) -> bool {
        true
    }
}

/// JSON documents as `serde_json::Value`.
///
/// Object keys are kept in sorted order by `serde_json`'s default map, so the
/// encoding of a document does not depend on how it was built.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    type Value = serde_json::Value;

    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Serialize(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Self::Value, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}

/// Any serde type, encoded with bincode.
pub struct BincodeCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BincodeCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for BincodeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BincodeCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BincodeCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BincodeCodec")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> ValueCodec for BincodeCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    type Value = T;

    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::Serialize(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}
