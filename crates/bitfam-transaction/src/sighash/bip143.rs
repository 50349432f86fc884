//! BIP143 witness v0 signature hash.

use bitfam_primitives::hash::sha256d;
use bitfam_primitives::util::WireWriter;
use bitfam_script::Script;

use crate::sighash::{check_index, hash_outputs, hash_prevouts, hash_sequence, SighashType};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Compute the BIP143 digest for the input at `input_index`.
///
/// # Arguments
/// * `tx`          - The transaction being signed.
/// * `input_index` - Index of the input being signed.
/// * `script_code` - The scriptCode committed to (see `witness_script_code`).
/// * `amount`      - Value of the output being spent.
/// * `sighash_type` - Sighash flags.
///
/// # Returns
/// A 32-byte double-SHA256 hash to be signed by ECDSA.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: SighashType,
) -> Result<[u8; 32], TransactionError> {
    let preimage = calc_preimage(tx, input_index, script_code, amount, sighash_type)?;
    Ok(sha256d(&preimage))
}

/// Compute the BIP143 preimage before double-hashing.
///
/// The preimage consists of:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes) - sha256d of all outpoints unless ANYONECANPAY
/// 3. hashSequence (32 bytes) - sha256d of all sequences unless ANYONECANPAY/SINGLE/NONE
/// 4. outpoint (32+4 bytes) - hash + index of the input being signed
/// 5. scriptCode (varint + script)
/// 6. value (8 bytes LE) - satoshis of the output being spent
/// 7. nSequence (4 bytes LE) - sequence of the input being signed
/// 8. hashOutputs (32 bytes) - sha256d of all outputs, the matching
///    output under SINGLE, or zeros
/// 9. nLocktime (4 bytes LE)
/// 10. sighashType (4 bytes LE)
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: u64,
    sighash_type: SighashType,
) -> Result<Vec<u8>, TransactionError> {
    let input = check_index(tx, input_index)?;

    // hashPrevouts
    let hash_prevouts = if !sighash_type.is_anyone_can_pay() {
        hash_prevouts(tx)
    } else {
        [0u8; 32]
    };

    // hashSequence
    let hash_sequence = if !sighash_type.is_anyone_can_pay()
        && !sighash_type.is_single()
        && !sighash_type.is_none()
    {
        hash_sequence(tx)
    } else {
        [0u8; 32]
    };

    // hashOutputs
    let hash_outputs = if !sighash_type.is_single() && !sighash_type.is_none() {
        hash_outputs(&tx.outputs)
    } else if sighash_type.is_single() && input_index < tx.outputs.len() {
        hash_outputs(std::iter::once(&tx.outputs[input_index]))
    } else {
        [0u8; 32]
    };

    let mut writer = WireWriter::with_capacity(256);
    writer.write_u32_le(tx.settings.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    input.write_outpoint(&mut writer);
    writer.write_var_bytes(script_code.to_bytes());
    writer.write_u64_le(amount);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.settings.lock_time);
    writer.write_u32_le(sighash_type.as_u32());

    Ok(writer.into_bytes())
}
