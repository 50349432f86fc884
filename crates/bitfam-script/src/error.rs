/// Error types for script operations.
///
/// Covers element parsing, push encoding, classification-dependent lookups
/// and address decoding.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A declared push length runs past the end of the script.
    #[error("script parse error: {0}")]
    Parse(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Invalid opcode data encountered during ASM parsing.
    #[error("invalid opcode data: {0}")]
    InvalidOpcodeData(String),

    /// Attempted to use append_opcodes for a push data opcode.
    #[error("use append_push_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Push data exceeds the largest encodable length.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// A hash or decoded address payload has the wrong length, or the
    /// script carries no identifying hash.
    #[error("invalid address or hash length: {0}")]
    InvalidAddressOrHashLength(String),

    /// Address is not valid Base58.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address version byte is not one of the supported P2PKH/P2SH prefixes.
    #[error("address not supported: {0}")]
    UnsupportedAddress(String),

    /// Base58Check checksum does not match.
    #[error("checksum failed")]
    EncodingChecksumFailed,

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] bitfam_primitives::PrimitivesError),
}
