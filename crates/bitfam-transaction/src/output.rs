//! Transaction output with satoshi value and locking script.

use bitfam_primitives::util::{WireReader, WireWriter};
use bitfam_script::Script;

use crate::TransactionError;

/// A single output in a transaction.
///
/// # Wire format
///
/// | Field            | Size           |
/// |------------------|----------------|
/// | value            | 8 bytes (LE)   |
/// | script length    | VarInt         |
/// | script           | variable       |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// Satoshis locked by this output.
    pub value: u64,

    /// The locking script (scriptPubKey).
    pub script: Script,
}

impl TransactionOutput {
    /// Create an output paying `value` to `script`.
    pub fn new(value: u64, script: Script) -> Self {
        TransactionOutput { value, script }
    }

    /// The placeholder written before the signed output in a legacy
    /// SIGHASH_SINGLE digest: value `-1` and an empty script.
    pub(crate) fn null() -> Self {
        TransactionOutput {
            value: u64::MAX,
            script: Script::new(),
        }
    }

    /// Deserialize a `TransactionOutput` from a `WireReader`.
    pub fn read_from(reader: &mut WireReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading value: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading locking script: {}", e))
        })?;

        Ok(TransactionOutput {
            value,
            script: Script::from_bytes(script_bytes),
        })
    }

    /// Serialize this output into a `WireWriter`.
    pub fn write_to(&self, writer: &mut WireWriter) {
        writer.write_u64_le(self.value);
        writer.write_var_bytes(self.script.to_bytes());
    }

    /// Serialize this output to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
