use varstash_types::Digest;
use xxhash_rust::xxh64::xxh64;

/// A 64-bit hash over byte blobs, used only for change detection.
///
/// Implementations must be deterministic across runs and platforms: digests
/// are persisted and compared against fresh fingerprints on the next save.
pub trait Hash64: Send + Sync {
    fn hash64(&self, data: &[u8]) -> Digest;
}

/// XXH64 with seed 0. The default oracle; digests match stores written by
/// other XXH64-based tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh64Hash64;

impl Hash64 for Xxh64Hash64 {
    fn hash64(&self, data: &[u8]) -> Digest {
        Digest::new(xxh64(data, 0))
    }
}

/// The first eight bytes of a BLAKE3 hash, read little-endian.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hash64;

impl Hash64 for Blake3Hash64 {
    fn hash64(&self, data: &[u8]) -> Digest {
        let hash = blake3::hash(data);
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        Digest::new(u64::from_le_bytes(head))
    }
}

impl<F> Hash64 for F
where
    F: Fn(&[u8]) -> u64 + Send + Sync,
{
    fn hash64(&self, data: &[u8]) -> Digest {
        Digest::new(self(data))
    }
}
