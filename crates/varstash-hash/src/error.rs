/// Errors from a value codec.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// The value cannot be turned into bytes.
    #[error("cannot serialize value: {0}")]
    Serialize(String),

    /// The bytes do not decode into a value.
    #[error("cannot deserialize value: {0}")]
    Deserialize(String),
}

/// Errors from fingerprinting a value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FingerprintError {
    /// Serialization of the value is not supported.
    #[error("fingerprint failed: {0}")]
    Unsupported(#[from] CodecError),
}
