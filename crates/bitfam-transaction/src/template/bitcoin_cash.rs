//! BitcoinCash unlocking template.
//!
//! Every input is unlocked with `<sig> <pubkey>` and a fork-id signature.

use bitfam_primitives::ec::PrivateKey;
use bitfam_script::Script;

use crate::sighash::SighashType;
use crate::template::{sign_input, UnlockData, UnlockingTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a BitcoinCash unlocker.
///
/// # Arguments
/// * `private_key` - The private key used to sign.
/// * `sighash_type` - Optional sighash type. Defaults to SIGHASH_ALL|FORKID (0x41).
pub fn unlock(
    private_key: &PrivateKey,
    sighash_type: Option<SighashType>,
) -> BitcoinCashUnlocker<'_> {
    BitcoinCashUnlocker {
        private_key,
        sighash_type: sighash_type.unwrap_or(SighashType::ALL_FORKID),
    }
}

/// BitcoinCash signing template holding a private key and sighash type.
pub struct BitcoinCashUnlocker<'a> {
    private_key: &'a PrivateKey,
    sighash_type: SighashType,
}

impl UnlockingTemplate for BitcoinCashUnlocker<'_> {
    fn unlock(&self, tx: &Transaction, input_index: usize) -> Result<UnlockData, TransactionError> {
        let sig = sign_input(tx, input_index, self.private_key, self.sighash_type)?;
        let pub_key_bytes = self.private_key.pub_key().to_compressed();

        let mut script_sig = Script::new();
        script_sig.append_push_data(&sig)?;
        script_sig.append_push_data(&pub_key_bytes)?;

        Ok(UnlockData {
            script_sig,
            witness: Vec::new(),
        })
    }
}
