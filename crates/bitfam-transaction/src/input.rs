//! Transaction input referencing a previous output.
//!
//! Besides the wire fields an input carries the value of the output it
//! spends and a script. Before signing, that script is the UTXO's locking
//! script; after signing it is the scriptSig. The witness stack is kept
//! on the input and written in the witness section of the transaction.

use bitfam_primitives::chainhash::Hash;
use bitfam_primitives::util::{WireReader, WireWriter};
use bitfam_script::Script;

use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// # Wire format (standard)
///
/// | Field          | Size             |
/// |----------------|------------------|
/// | prev_hash      | 32 bytes         |
/// | prev_index     | 4 bytes (LE)     |
/// | script length  | VarInt           |
/// | script         | variable         |
/// | sequence       | 4 bytes (LE)     |
///
/// `value` and `witness` are not part of this layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Hash of the transaction being spent, in internal byte order.
    pub prev_hash: [u8; 32],

    /// Index of the output within the previous transaction.
    pub prev_index: u32,

    /// Satoshi value of the output being spent. Zero after parsing.
    pub value: u64,

    /// Locking script of the spent output before signing, scriptSig after.
    pub script: Script,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence: u32,

    /// Witness stack; empty for non-witness spends.
    pub witness: Vec<Vec<u8>>,
}

impl TransactionInput {
    /// Create an input spending `prev_index` of `prev_hash`, with a
    /// finalized sequence and no witness.
    ///
    /// # Arguments
    /// * `prev_hash` - Hash of the previous transaction, internal byte order.
    /// * `prev_index` - Output index being spent.
    /// * `value` - Satoshi value of the spent output.
    /// * `script` - Locking script of the spent output.
    pub fn new(prev_hash: [u8; 32], prev_index: u32, value: u64, script: Script) -> Self {
        TransactionInput {
            prev_hash,
            prev_index,
            value,
            script,
            sequence: DEFAULT_SEQUENCE_NUMBER,
            witness: Vec::new(),
        }
    }

    /// Deserialize a `TransactionInput` from a `WireReader`.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` with `value` 0 and an empty witness, or a
    /// `TransactionError` if the data is truncated or malformed.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let prev_hash = reader.read_array::<32>().map_err(|e| {
            TransactionError::SerializationError(format!("reading previous hash: {}", e))
        })?;

        let prev_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading input script: {}", e))
        })?;

        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            prev_hash,
            prev_index,
            value: 0,
            script: Script::from_bytes(script_bytes),
            sequence,
            witness: Vec::new(),
        })
    }

    /// Serialize this input into a `WireWriter` (witness excluded).
    pub fn write_to(&self, writer: &mut WireWriter) {
        self.write_outpoint(writer);
        writer.write_var_bytes(self.script.to_bytes());
        writer.write_u32_le(self.sequence);
    }

    /// Write `prev_hash || prev_index`.
    pub fn write_outpoint(&self, writer: &mut WireWriter) {
        writer.write_bytes(&self.prev_hash);
        writer.write_u32_le(self.prev_index);
    }

    /// The spent transaction's id in display (reversed) form.
    pub fn prev_tx_id(&self) -> Hash {
        Hash::new(self.prev_hash)
    }

    /// Copy of this input with `script` replaced.
    pub fn with_script(&self, script: Script) -> Self {
        TransactionInput {
            script,
            ..self.clone()
        }
    }
}
