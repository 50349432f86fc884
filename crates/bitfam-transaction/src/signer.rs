//! Key matching and whole-transaction signing.
//!
//! Each input is matched to a key by comparing the identifying hash of
//! the script it spends with the hash each candidate key would produce
//! for that script type. The matched key is handed to the chain's
//! unlocking template.
//!
//! On Bitcoin the candidate hash depends on the script type: hash160 of
//! the key for P2PK, P2PKH and P2WPKH, the P2SH-wrapped P2WPKH hash for
//! P2SH, and the single-key witness script hash for P2WSH. On
//! BitcoinCash every script is compared with hash160 of the key, so P2SH
//! and P2WSH inputs never match.

use bitfam_primitives::ec::PrivateKey;
use bitfam_script::address::{p2pkh_hash, p2sh_p2wpkh_hash, p2wsh_hash};
use bitfam_script::{Script, ScriptType};

use crate::chain::Chain;
use crate::input::TransactionInput;
use crate::template::{bitcoin, bitcoin_cash, UnlockingTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Find the key that can unlock `script` on `chain`.
///
/// # Returns
/// `Ok(Some(key))` for the first matching key, `Ok(None)` when none
/// matches, or `UnsupportedScriptType` for multisig and nonstandard
/// scripts.
pub fn match_key<'a>(
    chain: Chain,
    script: &Script,
    keys: &'a [PrivateKey],
) -> Result<Option<&'a PrivateKey>, TransactionError> {
    let script_type = script.script_type();
    let expected = script
        .public_key_hash()
        .map_err(|_| TransactionError::UnsupportedScriptType(script_type))?;

    let found = keys.iter().find(|key| {
        let pub_key = key.pub_key();
        match (chain, script_type) {
            (Chain::Bitcoin, ScriptType::P2SH) => p2sh_p2wpkh_hash(&pub_key)[..] == expected[..],
            (Chain::Bitcoin, ScriptType::P2WSH) => p2wsh_hash(&pub_key)[..] == expected[..],
            _ => p2pkh_hash(&pub_key)[..] == expected[..],
        }
    });
    Ok(found)
}

/// Sign every input of `tx` with the matching key from `keys`.
///
/// Each input's script must be the locking script it spends; it is
/// replaced by the scriptSig in the returned transaction.
///
/// # Returns
/// A new signed transaction. `PrivateKeyNotFound` or
/// `UnsupportedScriptType` for the first input that cannot be signed, in
/// which case nothing is returned.
pub fn sign(tx: &Transaction, keys: &[PrivateKey]) -> Result<Transaction, TransactionError> {
    let mut inputs = Vec::with_capacity(tx.inputs.len());

    for (index, input) in tx.inputs.iter().enumerate() {
        let key = match_key(tx.chain, &input.script, keys)?
            .ok_or(TransactionError::PrivateKeyNotFound(index))?;

        let sighash_type = Some(tx.settings.sighash_type);
        let unlock_data = match tx.chain {
            Chain::Bitcoin => bitcoin::unlock(key, sighash_type).unlock(tx, index)?,
            Chain::BitcoinCash => bitcoin_cash::unlock(key, sighash_type).unlock(tx, index)?,
        };

        tracing::debug!(
            input = index,
            chain = %tx.chain,
            script_type = %input.script.script_type(),
            witness_items = unlock_data.witness.len(),
            "signed input"
        );

        inputs.push(TransactionInput {
            script: unlock_data.script_sig,
            witness: unlock_data.witness,
            ..input.clone()
        });
    }

    Ok(Transaction {
        inputs,
        ..tx.clone()
    })
}
