//! The on-disk metadata record.
//!
//! ```text
//! {
//!   "names":   ["a", "b"],
//!   "digests": [1234567890123456789, 42]
//! }
//! ```
//!
//! Exactly two fields, index-aligned. Decoding reads these two fields and
//! nothing else, so an unrelated or tampered file is rejected or ignored
//! rather than interpreted.

use serde::{Deserialize, Serialize};
use varstash_types::{Digest, EntrySet, TypeError};

/// The metadata record in its persisted, parallel-sequence form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub names: Vec<String>,
    pub digests: Vec<Digest>,
}

impl MetadataRecord {
    pub fn from_entries(entries: &EntrySet) -> Self {
        let (names, digests) = entries.to_parallel();
        Self { names, digests }
    }

    pub fn into_entries(self) -> Result<EntrySet, TypeError> {
        EntrySet::from_parallel(self.names, self.digests)
    }

    /// Encode as pretty JSON with a trailing newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_two_parallel_fields() {
        let mut set = EntrySet::new();
        set.upsert("a", Digest::new(1));
        set.upsert("b", Digest::new(u64::MAX));
        let bytes = MetadataRecord::from_entries(&set).to_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["names"], serde_json::json!(["a", "b"]));
        assert_eq!(value["digests"][1].as_u64(), Some(u64::MAX));
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn encoding_is_byte_stable() {
        let mut set = EntrySet::new();
        set.upsert("x", Digest::new(5));
        let a = MetadataRecord::from_entries(&set).to_bytes().unwrap();
        let b = MetadataRecord::from_entries(&set.clone()).to_bytes().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let bytes = br#"{"names":["a"],"digests":[3],"payload":{"run":"me"}}"#;
        let record = MetadataRecord::from_bytes(bytes).unwrap();
        let set = record.into_entries().unwrap();
        assert_eq!(set.get("a"), Some(Digest::new(3)));
    }

    #[test]
    fn missing_field_is_an_error() {
        assert!(MetadataRecord::from_bytes(br#"{"names":["a"]}"#).is_err());
    }

    #[test]
    fn negative_digest_is_an_error() {
        assert!(MetadataRecord::from_bytes(br#"{"names":["a"],"digests":[-1]}"#).is_err());
    }

    #[test]
    fn misaligned_record_fails_conversion() {
        let record = MetadataRecord::from_bytes(br#"{"names":["a","b"],"digests":[1]}"#).unwrap();
        assert!(record.into_entries().is_err());
    }
}
