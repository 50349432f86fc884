//! Unspent transaction outputs, the unit coin selection works on.

use bitfam_primitives::chainhash::Hash;
use bitfam_script::{Script, ScriptType};
use serde::{Deserialize, Serialize};

use crate::input::TransactionInput;
use crate::TransactionError;

/// A spendable output as reported by an indexer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// Address the output pays to.
    pub address: String,
    /// Satoshi value.
    pub value: u64,
    /// Index of the output in its transaction.
    pub output_index: u32,
    /// Locking script.
    pub script: Script,
    /// Hash of the owning transaction, internal byte order.
    pub tx_hash: Hash,
}

impl UnspentOutput {
    /// Create an unspent output from a transaction id as explorers show it
    /// (byte-reversed hex).
    pub fn from_txid_hex(
        address: &str,
        value: u64,
        output_index: u32,
        script: Script,
        txid: &str,
    ) -> Result<Self, TransactionError> {
        Ok(UnspentOutput {
            address: address.to_string(),
            value,
            output_index,
            script,
            tx_hash: Hash::from_hex(txid)?,
        })
    }

    /// Standard template of the locking script.
    pub fn script_type(&self) -> ScriptType {
        self.script.script_type()
    }

    /// An unsigned input spending this output with a final sequence.
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput::new(
            *self.tx_hash.as_bytes(),
            self.output_index,
            self.value,
            self.script.clone(),
        )
    }
}
