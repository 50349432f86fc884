/// Errors raised by the hashing, key, signature and wire-decoding
/// primitives.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// WIF string with a bad prefix, length or compression byte.
    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    /// Base58Check payload whose trailing four bytes do not match.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// VarInt that a shorter prefix could have encoded.
    #[error("non-canonical varint: value {value} encoded in {len} bytes")]
    NonCanonicalVarInt { value: u64, len: usize },

    /// A read ran past the end of the buffer.
    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
