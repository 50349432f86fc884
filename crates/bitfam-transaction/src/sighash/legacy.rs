//! Pre-segwit signature hash.
//!
//! The digest is the double SHA-256 of a modified copy of the transaction
//! followed by the 4-byte sighash type:
//!
//! - the signed input keeps the script it spends, minus `OP_CODESEPARATOR`;
//! - with ANYONECANPAY every other input is dropped, otherwise other
//!   inputs get an empty script, and a zero sequence under NONE/SINGLE;
//! - NONE commits to no outputs, SINGLE to `input_index` null outputs
//!   followed by the output at `input_index`, ALL to every output.
//!
//! SINGLE with no output at `input_index` signs the constant `1` digest,
//! as Bitcoin Core does.

use bitfam_primitives::hash::sha256d;
use bitfam_primitives::util::WireWriter;
use bitfam_script::opcodes::OP_CODESEPARATOR;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::sighash::{check_index, SighashType};
use crate::transaction::Transaction;
use crate::TransactionError;

/// Digest signed when SIGHASH_SINGLE has no matching output.
pub const SINGLE_OUT_OF_RANGE_DIGEST: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// Compute the legacy digest for the input at `input_index`.
///
/// The input's `script` must be the locking script it spends.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    sighash_type: SighashType,
) -> Result<[u8; 32], TransactionError> {
    check_index(tx, input_index)?;
    if sighash_type.is_single() && input_index >= tx.outputs.len() {
        return Ok(SINGLE_OUT_OF_RANGE_DIGEST);
    }
    Ok(sha256d(&calc_preimage(tx, input_index, sighash_type)?))
}

/// Serialize the modified transaction and sighash type, before hashing.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    sighash_type: SighashType,
) -> Result<Vec<u8>, TransactionError> {
    let signed = check_index(tx, input_index)?;
    let script_code = signed.script.script_without(OP_CODESEPARATOR)?;
    let current = signed.with_script(script_code);

    let inputs: Vec<TransactionInput> = if sighash_type.is_anyone_can_pay() {
        vec![current]
    } else {
        tx.inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                if i == input_index {
                    return current.clone();
                }
                let mut blank = input.with_script(Default::default());
                if sighash_type.is_none() || sighash_type.is_single() {
                    blank.sequence = 0;
                }
                blank
            })
            .collect()
    };

    let outputs: Vec<TransactionOutput> = if sighash_type.is_none() {
        Vec::new()
    } else if sighash_type.is_single() {
        let matching = tx.outputs.get(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "SIGHASH_SINGLE input {} has no matching output",
                input_index
            ))
        })?;
        let mut outputs = vec![TransactionOutput::null(); input_index];
        outputs.push(matching.clone());
        outputs
    } else {
        tx.outputs.clone()
    };

    let copy = Transaction {
        inputs,
        outputs,
        ..tx.clone()
    };

    let mut writer = WireWriter::new();
    writer.write_bytes(&copy.to_bytes_without_witness());
    writer.write_u32_le(sighash_type.as_u32());
    Ok(writer.into_bytes())
}
