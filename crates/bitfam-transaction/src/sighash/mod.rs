//! Signature hash computation for transaction signing.
//!
//! Computes the digest an input's signature commits to. Three algorithms
//! exist and the one used is a pure function of the chain and the type of
//! script being spent:
//!
//! - `Legacy`: the original serialize-a-modified-copy digest, for Bitcoin
//!   P2PKH and P2PK spends.
//! - `WitnessV0`: BIP143, for Bitcoin P2WPKH, P2SH-wrapped P2WPKH and P2WSH.
//! - `ForkId`: the BitcoinCash replay-protected digest, for every BitcoinCash
//!   input.
//!
//! See <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>

pub mod bip143;
pub mod forkid;
pub mod legacy;

use std::fmt;

use bitfam_primitives::ec::PublicKey;
use bitfam_primitives::hash::sha256d;
use bitfam_primitives::util::WireWriter;
use bitfam_script::{Script, ScriptType};
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::output::TransactionOutput;
use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u8 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u8 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u8 = 0x03;

/// Replay-protection flag carried by every BitcoinCash signature.
pub const SIGHASH_FORKID: u8 = 0x40;

/// Combined with another flag: only sign the current input, allowing other
/// inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u8 = 0x1f;

/// A sighash type byte.
///
/// Every predicate is a mask over the byte; nothing else is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SighashType(u8);

impl SighashType {
    /// SIGHASH_ALL.
    pub const ALL: SighashType = SighashType(SIGHASH_ALL);
    /// SIGHASH_NONE.
    pub const NONE: SighashType = SighashType(SIGHASH_NONE);
    /// SIGHASH_SINGLE.
    pub const SINGLE: SighashType = SighashType(SIGHASH_SINGLE);
    /// SIGHASH_ALL | SIGHASH_FORKID, the BitcoinCash default.
    pub const ALL_FORKID: SighashType = SighashType(SIGHASH_ALL | SIGHASH_FORKID);

    /// Wrap a raw sighash byte.
    pub const fn new(byte: u8) -> Self {
        SighashType(byte)
    }

    /// The raw byte, as appended to signatures.
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// The byte widened to the 4-byte field committed in preimages.
    pub fn as_u32(&self) -> u32 {
        self.0 as u32
    }

    /// Base type: `byte & 0x1f`.
    pub fn output_type(&self) -> u8 {
        self.0 & SIGHASH_MASK
    }

    /// Whether the base type is ALL.
    pub fn is_all(&self) -> bool {
        self.output_type() == SIGHASH_ALL
    }

    /// Whether the base type is NONE.
    pub fn is_none(&self) -> bool {
        self.output_type() == SIGHASH_NONE
    }

    /// Whether the base type is SINGLE.
    pub fn is_single(&self) -> bool {
        self.output_type() == SIGHASH_SINGLE
    }

    /// Whether ANYONECANPAY is set.
    pub fn is_anyone_can_pay(&self) -> bool {
        self.0 & SIGHASH_ANYONECANPAY != 0
    }

    /// Whether FORKID is set.
    pub fn is_fork_id(&self) -> bool {
        self.0 & SIGHASH_FORKID != 0
    }

    /// The same type with ANYONECANPAY set.
    pub fn with_anyone_can_pay(&self) -> Self {
        SighashType(self.0 | SIGHASH_ANYONECANPAY)
    }
}

impl Default for SighashType {
    fn default() -> Self {
        SighashType::ALL
    }
}

impl From<u8> for SighashType {
    fn from(byte: u8) -> Self {
        SighashType(byte)
    }
}

impl fmt::Display for SighashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

// -----------------------------------------------------------------------
// Algorithm selection
// -----------------------------------------------------------------------

/// The digest algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SighashAlgorithm {
    /// Pre-segwit digest over a modified copy of the transaction.
    Legacy,
    /// BIP143 digest.
    WitnessV0,
    /// BitcoinCash fork-id digest.
    ForkId,
}

/// Pick the digest algorithm for spending `script_type` on `chain`.
pub fn algorithm_for(chain: Chain, script_type: ScriptType) -> SighashAlgorithm {
    match (chain, script_type) {
        (Chain::BitcoinCash, _) => SighashAlgorithm::ForkId,
        (Chain::Bitcoin, ScriptType::P2WPKH | ScriptType::P2WSH | ScriptType::P2SH) => {
            SighashAlgorithm::WitnessV0
        }
        (Chain::Bitcoin, _) => SighashAlgorithm::Legacy,
    }
}

/// BIP143 scriptCode for a single-key witness spend.
///
/// P2WSH spends use the witness script `<pubkey> OP_CHECKSIG`; P2WPKH and
/// P2SH-wrapped P2WPKH use the P2PKH script of the key.
pub fn witness_script_code(script_type: ScriptType, pub_key: &PublicKey) -> Script {
    match script_type {
        ScriptType::P2WSH => Script::p2pk(pub_key),
        _ => Script::p2pkh(&pub_key.hash160()),
    }
}

/// Compute the digest the input at `input_index` signs.
///
/// # Arguments
/// * `tx` - The unsigned transaction; each input's script is the locking
///   script it spends.
/// * `input_index` - Index of the input being signed.
/// * `pub_key` - Key the signature will verify under; supplies the
///   scriptCode of witness spends.
/// * `sighash_type` - Sighash flags committed to.
///
/// # Returns
/// A 32-byte digest, or `InvalidTransaction` for an index out of range.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    pub_key: &PublicKey,
    sighash_type: SighashType,
) -> Result<[u8; 32], TransactionError> {
    let input = check_index(tx, input_index)?;
    let script_type = input.script.script_type();
    let algorithm = algorithm_for(tx.chain, script_type);

    let digest = match algorithm {
        SighashAlgorithm::Legacy => legacy::signature_hash(tx, input_index, sighash_type)?,
        SighashAlgorithm::WitnessV0 => {
            let script_code = witness_script_code(script_type, pub_key);
            bip143::signature_hash(tx, input_index, &script_code, input.value, sighash_type)?
        }
        SighashAlgorithm::ForkId => forkid::signature_hash(tx, input_index, sighash_type)?,
    };

    tracing::trace!(
        input = input_index,
        ?algorithm,
        %script_type,
        sighash = %sighash_type,
        digest = %hex::encode(digest),
        "computed signature hash"
    );
    Ok(digest)
}

// -----------------------------------------------------------------------
// Shared helpers
// -----------------------------------------------------------------------

pub(crate) fn check_index(
    tx: &Transaction,
    input_index: usize,
) -> Result<&crate::input::TransactionInput, TransactionError> {
    tx.inputs.get(input_index).ok_or_else(|| {
        TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        ))
    })
}

/// Double-SHA256 of every outpoint (`prev_hash || prev_index`).
pub(crate) fn hash_prevouts(tx: &Transaction) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        input.write_outpoint(&mut writer);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of every input sequence, 4 bytes LE each.
pub(crate) fn hash_sequence(tx: &Transaction) -> [u8; 32] {
    let mut writer = WireWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence);
    }
    sha256d(writer.as_bytes())
}

/// Double-SHA256 of the serialized outputs.
pub(crate) fn hash_outputs<'a>(outputs: impl IntoIterator<Item = &'a TransactionOutput>) -> [u8; 32] {
    let mut writer = WireWriter::new();
    for output in outputs {
        output.write_to(&mut writer);
    }
    sha256d(writer.as_bytes())
}
