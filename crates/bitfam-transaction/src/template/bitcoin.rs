//! Bitcoin unlocking template.
//!
//! Produces, for the script type an input spends:
//!
//! | Spent script | scriptSig                  | witness                 |
//! |--------------|----------------------------|-------------------------|
//! | P2PK         | `<sig>`                    | empty                   |
//! | P2PKH        | `<sig> <pubkey>`           | empty                   |
//! | P2WPKH       | empty                      | `[sig, pubkey]`         |
//! | P2SH         | `<0x0014 hash160(pubkey)>` | `[sig, pubkey]`         |
//! | P2WSH        | empty                      | `[sig, <pubkey> OP_CHECKSIG]` |
//!
//! P2SH is treated as P2SH-wrapped P2WPKH.

use bitfam_primitives::ec::PrivateKey;
use bitfam_script::{Script, ScriptType};

use crate::sighash::SighashType;
use crate::template::{sign_input, UnlockData, UnlockingTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a Bitcoin unlocker for signing transaction inputs.
///
/// # Arguments
/// * `private_key` - The private key used to sign.
/// * `sighash_type` - Optional sighash type. Defaults to SIGHASH_ALL.
pub fn unlock(private_key: &PrivateKey, sighash_type: Option<SighashType>) -> BitcoinUnlocker<'_> {
    BitcoinUnlocker {
        private_key,
        sighash_type: sighash_type.unwrap_or(SighashType::ALL),
    }
}

/// Bitcoin signing template holding a private key and sighash type.
pub struct BitcoinUnlocker<'a> {
    private_key: &'a PrivateKey,
    sighash_type: SighashType,
}

impl UnlockingTemplate for BitcoinUnlocker<'_> {
    /// Sign the specified input and produce its scriptSig and witness.
    ///
    /// Witness spends require a transaction with segwit settings.
    fn unlock(&self, tx: &Transaction, input_index: usize) -> Result<UnlockData, TransactionError> {
        let input = tx.inputs.get(input_index).ok_or_else(|| {
            TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.inputs.len()
            ))
        })?;

        let script_type = input.script.script_type();
        let is_witness_spend = match script_type {
            ScriptType::P2PK | ScriptType::P2PKH => false,
            ScriptType::P2WPKH | ScriptType::P2SH | ScriptType::P2WSH => true,
            other => return Err(TransactionError::UnsupportedScriptType(other)),
        };
        if is_witness_spend && !tx.has_witness() {
            return Err(TransactionError::UnsupportedScriptType(script_type));
        }

        let sig = sign_input(tx, input_index, self.private_key, self.sighash_type)?;
        let pub_key = self.private_key.pub_key();
        let pub_key_bytes = pub_key.to_compressed().to_vec();

        let mut script_sig = Script::new();
        let witness = match script_type {
            ScriptType::P2PK => {
                script_sig.append_push_data(&sig)?;
                Vec::new()
            }
            ScriptType::P2PKH => {
                script_sig.append_push_data(&sig)?;
                script_sig.append_push_data(&pub_key_bytes)?;
                Vec::new()
            }
            ScriptType::P2WPKH => vec![sig, pub_key_bytes],
            ScriptType::P2SH => {
                let redeem_script = Script::p2wpkh(&pub_key.hash160());
                script_sig.append_push_data(redeem_script.to_bytes())?;
                vec![sig, pub_key_bytes]
            }
            // The last witness item of a P2WSH spend is the witness script
            // itself, whose sha256 the output commits to. A bare pubkey
            // would not hash to the program.
            ScriptType::P2WSH => vec![sig, Script::p2pk(&pub_key).to_bytes().to_vec()],
            other => return Err(TransactionError::UnsupportedScriptType(other)),
        };

        Ok(UnlockData {
            script_sig,
            witness,
        })
    }
}
