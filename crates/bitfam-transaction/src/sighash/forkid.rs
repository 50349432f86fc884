//! BitcoinCash fork-id signature hash.
//!
//! Same preimage layout as BIP143, applied to every BitcoinCash input, with
//! these differences:
//!
//! - hashPrevouts and hashOutputs always cover every input and output;
//!   ANYONECANPAY, NONE and SINGLE do not zero them.
//! - hashSequence is computed over `0xffffffff` for each input, not the
//!   real sequences.
//! - The scriptCode is the input's own script, which before signing is the
//!   locking script it spends.
//!
//! Transactions from the unspent-transaction template always use final
//! sequences and SIGHASH_ALL|FORKID, where this agrees with BIP143.

use bitfam_primitives::hash::sha256d;
use bitfam_primitives::util::WireWriter;

use crate::input::DEFAULT_SEQUENCE_NUMBER;
use crate::sighash::{check_index, hash_outputs, hash_prevouts, SighashType};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Compute the fork-id digest for the input at `input_index`.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    sighash_type: SighashType,
) -> Result<[u8; 32], TransactionError> {
    Ok(sha256d(&calc_preimage(tx, input_index, sighash_type)?))
}

/// Compute the fork-id preimage before double-hashing.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    sighash_type: SighashType,
) -> Result<Vec<u8>, TransactionError> {
    let input = check_index(tx, input_index)?;

    // hashSequence
    let mut sequences = WireWriter::with_capacity(tx.inputs.len() * 4);
    for _ in &tx.inputs {
        sequences.write_u32_le(DEFAULT_SEQUENCE_NUMBER);
    }
    let hash_sequence = sha256d(sequences.as_bytes());

    let mut writer = WireWriter::with_capacity(256);
    writer.write_u32_le(tx.settings.version);
    writer.write_bytes(&hash_prevouts(tx));
    writer.write_bytes(&hash_sequence);
    input.write_outpoint(&mut writer);
    writer.write_var_bytes(input.script.to_bytes());
    writer.write_u64_le(input.value);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&hash_outputs(&tx.outputs));
    writer.write_u32_le(tx.settings.lock_time);
    writer.write_u32_le(sighash_type.as_u32());

    Ok(writer.into_bytes())
}
