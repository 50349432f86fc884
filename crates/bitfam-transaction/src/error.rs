use bitfam_script::ScriptType;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. an input index out of range).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An error occurred while producing a signature.
    #[error("signing error: {0}")]
    SigningError(String),
    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// No supplied key matches the script spent by the input at this index.
    #[error("no private key found for input {0}")]
    PrivateKeyNotFound(usize),
    /// The signer does not know how to unlock this script type.
    #[error("unsupported script type: {0}")]
    UnsupportedScriptType(ScriptType),
    /// The spendable UTXOs cannot cover the amount plus fee.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Satoshis needed.
        required: u64,
        /// Satoshis spendable.
        available: u64,
    },
    /// The amount to send is zero and send-all is not set.
    #[error("spending amount is zero")]
    ZeroAmount,
    /// An underlying script error (forwarded from `bitfam-script`).
    #[error("script error: {0}")]
    Script(#[from] bitfam_script::ScriptError),
    /// An underlying primitives error (forwarded from `bitfam-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] bitfam_primitives::PrimitivesError),
}
