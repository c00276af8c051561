//! The in-memory metadata: an ordered mapping from entry name to digest.
//!
//! New names are appended, so a store saved twice with the same content
//! produces the same metadata record byte for byte. The parallel
//! `names`/`digests` form exists only at the persistence boundary
//! ([`EntrySet::to_parallel`] / [`EntrySet::from_parallel`]).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::error::TypeError;

/// A named, fingerprinted, persisted value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Externally supplied key.
    pub name: String,
    /// Fingerprint of the last persisted content for `name`.
    pub digest: Digest,
}

impl Entry {
    pub fn new(name: impl Into<String>, digest: Digest) -> Self {
        Self {
            name: name.into(),
            digest,
        }
    }
}

/// Insertion-ordered name to digest mapping.
///
/// Names are unique. Removal preserves the relative order of the remaining
/// entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntrySet {
    entries: IndexMap<String, Digest>,
}

impl EntrySet {
    /// Create an empty entry set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the persisted parallel sequences.
    ///
    /// Fails if the sequences differ in length or a name repeats.
    pub fn from_parallel(names: Vec<String>, digests: Vec<Digest>) -> Result<Self, TypeError> {
        if names.len() != digests.len() {
            return Err(TypeError::Misaligned {
                names: names.len(),
                digests: digests.len(),
            });
        }
        let mut entries = IndexMap::with_capacity(names.len());
        for (name, digest) in names.into_iter().zip(digests) {
            if entries.contains_key(&name) {
                return Err(TypeError::DuplicateName(name));
            }
            entries.insert(name, digest);
        }
        Ok(Self { entries })
    }

    /// Flatten into index-aligned `(names, digests)` sequences.
    pub fn to_parallel(&self) -> (Vec<String>, Vec<Digest>) {
        self.entries
            .iter()
            .map(|(name, digest)| (name.clone(), *digest))
            .unzip()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Stored digest for `name`, if any.
    pub fn get(&self, name: &str) -> Option<Digest> {
        self.entries.get(name).copied()
    }

    /// Insert a new name at the end, or replace the digest of an existing
    /// name in place. Returns the previous digest.
    pub fn upsert(&mut self, name: impl Into<String>, digest: Digest) -> Option<Digest> {
        self.entries.insert(name.into(), digest)
    }

    /// Remove `name`, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Digest> {
        self.entries.shift_remove(name)
    }

    /// Names in stored order.
    pub fn names(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in stored order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, Digest)> + ExactSizeIterator {
        self.entries.iter().map(|(name, digest)| (name.as_str(), *digest))
    }

    /// Owned [`Entry`] values in stored order.
    pub fn to_entries(&self) -> Vec<Entry> {
        self.iter().map(|(name, digest)| Entry::new(name, digest)).collect()
    }
}

impl FromIterator<Entry> for EntrySet {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.upsert(entry.name, entry.digest);
        }
        set
    }
}
