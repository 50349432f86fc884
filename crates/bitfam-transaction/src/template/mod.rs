//! Transaction templates.
//!
//! Unlocking templates turn a key and an unsigned input into the scriptSig
//! and witness that spend it, one implementation per chain. The unspent
//! template assembles an unsigned transaction from a UTXO set.

pub mod bitcoin;
pub mod bitcoin_cash;
pub mod unspent;

use bitfam_primitives::ec::PrivateKey;
use bitfam_script::Script;

use crate::sighash::{self, SighashType};
use crate::transaction::Transaction;
use crate::TransactionError;

/// What an input needs to be spent: a scriptSig and a witness stack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnlockData {
    /// Script placed in the input's script field.
    pub script_sig: Script,
    /// Witness stack; empty for non-witness spends.
    pub witness: Vec<Vec<u8>>,
}

/// Trait for templates that produce unlock data.
///
/// `unlock` receives the unsigned transaction and the input index,
/// computes the signature hash, signs it and returns what the input
/// needs to be spent.
pub trait UnlockingTemplate {
    /// Produce the unlock data for the given input.
    ///
    /// # Arguments
    /// * `tx` - The unsigned transaction.
    /// * `input_index` - The index of the input to sign.
    fn unlock(&self, tx: &Transaction, input_index: usize) -> Result<UnlockData, TransactionError>;
}

/// Sign the digest of one input and return `DER signature || sighash byte`.
pub(crate) fn sign_input(
    tx: &Transaction,
    input_index: usize,
    private_key: &PrivateKey,
    sighash_type: SighashType,
) -> Result<Vec<u8>, TransactionError> {
    let pub_key = private_key.pub_key();
    let digest = sighash::signature_hash(tx, input_index, &pub_key, sighash_type)?;

    // RFC6979 deterministic ECDSA, low-S.
    let signature = private_key.sign(&digest)?;

    let der_sig = signature.to_der();
    let mut sig_buf = Vec::with_capacity(der_sig.len() + 1);
    sig_buf.extend_from_slice(&der_sig);
    sig_buf.push(sighash_type.as_u8());
    Ok(sig_buf)
}
