use varstash_types::Digest;

use crate::codec::ValueCodec;
use crate::error::FingerprintError;
use crate::oracle::Hash64;

/// Serialize-then-hash, as one operation.
///
/// The fingerprint depends on content only: values with identical encodings
/// always share a digest.
#[derive(Clone, Debug, Default)]
pub struct Fingerprinter<C, H> {
    codec: C,
    hasher: H,
}

impl<C: ValueCodec, H: Hash64> Fingerprinter<C, H> {
    pub fn new(codec: C, hasher: H) -> Self {
        Self { codec, hasher }
    }

    /// Digest of `value`'s encoded bytes.
    pub fn fingerprint(&self, value: &C::Value) -> Result<Digest, FingerprintError> {
        self.fingerprint_bytes(value).map(|(digest, _)| digest)
    }

    /// Digest plus the encoded bytes it was computed from, so a caller that
    /// goes on to persist the value encodes it once.
    pub fn fingerprint_bytes(
        &self,
        value: &C::Value,
    ) -> Result<(Digest, Vec<u8>), FingerprintError> {
        let bytes = self.codec.encode(value)?;
        Ok((self.hasher.hash64(&bytes), bytes))
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::error::CodecError;
    use crate::oracle::Blake3Hash64;
    use serde_json::json;

    fn fingerprinter() -> Fingerprinter<JsonCodec, Blake3Hash64> {
        Fingerprinter::new(JsonCodec, Blake3Hash64)
    }

    #[test]
    fn same_value_same_digest() {
        let fp = fingerprinter();
        let v = json!([1, 2, 3]);
        assert_eq!(fp.fingerprint(&v).unwrap(), fp.fingerprint(&v).unwrap());
    }

    #[test]
    fn different_content_different_digest() {
        let fp = fingerprinter();
        assert_ne!(
            fp.fingerprint(&json!([1, 2, 3])).unwrap(),
            fp.fingerprint(&json!([9])).unwrap()
        );
    }

    #[test]
    fn digest_matches_hash_of_returned_bytes() {
        let fp = fingerprinter();
        let (digest, bytes) = fp.fingerprint_bytes(&json!({"k": "v"})).unwrap();
        assert_eq!(digest, Blake3Hash64.hash64(&bytes));
        assert_eq!(bytes, br#"{"k":"v"}"#);
    }

    struct Refuses;

    impl ValueCodec for Refuses {
        type Value = ();

        fn encode(&self, _value: &()) -> Result<Vec<u8>, CodecError> {
            Err(CodecError::Serialize("no encoding for unit".into()))
        }

        fn decode(&self, _bytes: &[u8]) -> Result<(), CodecError> {
            Ok(())
        }
    }

    #[test]
    fn codec_failure_is_fingerprint_error() {
        let fp = Fingerprinter::new(Refuses, Blake3Hash64);
        let err = fp.fingerprint(&()).unwrap_err();
        assert!(matches!(err, FingerprintError::Unsupported(CodecError::Serialize(_))));
    }
}
