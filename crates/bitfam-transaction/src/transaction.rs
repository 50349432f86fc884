//! Core transaction type for Bitcoin and BitcoinCash.
//!
//! A transaction is a value: inputs, outputs and settings tagged with the
//! chain it targets. Signing returns a new transaction and leaves the
//! unsigned one untouched.

use bitfam_primitives::chainhash::Hash;
use bitfam_primitives::ec::{PrivateKey, PublicKey};
use bitfam_primitives::hash::sha256d;
use bitfam_primitives::util::{VarInt, WireReader, WireWriter};

use crate::chain::Chain;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::settings::{TransactionSettings, WitnessFlag};
use crate::{sighash, signer, witness, TransactionError};

/// Weight units per non-witness byte.
const WITNESS_SCALE_FACTOR: usize = 4;

/// A Bitcoin-family transaction.
///
/// # Wire format
///
/// | Field        | Size                          |
/// |--------------|-------------------------------|
/// | version      | 4 bytes (LE)                  |
/// | marker, flag | 2 bytes, segwit only          |
/// | input count  | VarInt                        |
/// | inputs       | variable (per input)          |
/// | output count | VarInt                        |
/// | outputs      | variable (per output)         |
/// | witnesses    | one stack per input, segwit only |
/// | lock_time    | 4 bytes (LE)                  |
///
/// Version, lock time and the marker/flag pair come from `settings`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// The chain this transaction is built for.
    pub chain: Chain,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Version, lock time, witness flag and signing settings.
    pub settings: TransactionSettings,
}

impl Transaction {
    /// Assemble a transaction.
    pub fn new(
        chain: Chain,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        settings: TransactionSettings,
    ) -> Self {
        Transaction {
            chain,
            inputs,
            outputs,
            settings,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(chain: Chain, hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(chain, &bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// On Bitcoin a `0x00 0x01` pair after the version marks a segwit
    /// payload. The byte slice must hold exactly one transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)` whose settings are the chain preset with the
    /// parsed version, lock time and witness flag; input values are 0.
    /// A `TransactionError` if the data is truncated, malformed, or has
    /// trailing bytes.
    pub fn from_bytes(chain: Chain, bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = WireReader::new(bytes);
        let tx = Self::read_from(chain, &mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `WireReader`.
    pub fn read_from(chain: Chain, reader: &mut WireReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let segwit = chain.supports_witness() && reader.peek(2) == Some(&[0x00, 0x01][..]);
        let witness_flag = if segwit {
            let marker = reader.read_u8()?;
            let flag = reader.read_u8()?;
            Some(WitnessFlag { marker, flag })
        } else {
            None
        };

        let input_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading input count: {}", e))
        })?;

        let mut inputs = Vec::new();
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading output count: {}", e))
        })?;

        let mut outputs = Vec::new();
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        if segwit {
            for input in inputs.iter_mut() {
                input.witness = witness::read_stack(reader)?;
            }
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        let preset = if segwit {
            TransactionSettings::bitcoin_witness_defaults()
        } else {
            TransactionSettings::for_chain(chain)
        };
        let settings = preset
            .with_version(version)
            .with_witness(witness_flag)
            .with_lock_time(lock_time);

        Ok(Transaction {
            chain,
            inputs,
            outputs,
            settings,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Whether serialization writes the marker/flag pair and witnesses.
    ///
    /// True for Bitcoin transactions whose settings carry the segwit flag.
    pub fn has_witness(&self) -> bool {
        self.chain.supports_witness() && self.settings.is_witness()
    }

    /// Serialize this transaction to raw bytes, witness data included
    /// when `has_witness()`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        self.write_to(&mut writer, self.has_witness());
        writer.into_bytes()
    }

    /// Serialize without marker, flag and witnesses; the bytes the txid
    /// commits to.
    pub fn to_bytes_without_witness(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(256);
        self.write_to(&mut writer, false);
        writer.into_bytes()
    }

    fn write_to(&self, writer: &mut WireWriter, with_witness: bool) {
        writer.write_u32_le(self.settings.version);

        if with_witness {
            let flag = self.settings.witness.unwrap_or_default();
            writer.write_u8(flag.marker);
            writer.write_u8(flag.flag);
        }

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(writer);
        }

        if with_witness {
            for input in &self.inputs {
                witness::write_stack(writer, &input.witness);
            }
        }

        writer.write_u32_le(self.settings.lock_time);
    }

    /// Serialize this transaction to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Identity and size
    // -----------------------------------------------------------------

    /// Transaction id: double SHA-256 of the non-witness serialization.
    ///
    /// Displays as byte-reversed hex.
    pub fn tx_id(&self) -> Hash {
        Hash::new(sha256d(&self.to_bytes_without_witness()))
    }

    /// Witness transaction id: double SHA-256 of the full payload.
    ///
    /// Equal to `tx_id()` when there is no witness data.
    pub fn wtx_id(&self) -> Hash {
        Hash::new(sha256d(&self.to_bytes()))
    }

    /// Length of the full serialization in bytes.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    /// Length of the non-witness serialization in bytes.
    pub fn base_size(&self) -> usize {
        self.to_bytes_without_witness().len()
    }

    /// Weight units: `3 * base_size + size`.
    pub fn weight(&self) -> usize {
        (WITNESS_SCALE_FACTOR - 1) * self.base_size() + self.size()
    }

    /// Virtual size: weight divided by four, rounded up so a partial
    /// virtual byte still counts as a whole one.
    pub fn vsize(&self) -> usize {
        (self.weight() + WITNESS_SCALE_FACTOR - 1) / WITNESS_SCALE_FACTOR
    }

    /// Sum of the spent output values, or `None` if it overflows a `u64`.
    pub fn total_input_value(&self) -> Option<u64> {
        self.inputs.iter().try_fold(0u64, |acc, i| acc.checked_add(i.value))
    }

    /// Sum of the output values, or `None` if it overflows a `u64`.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs.iter().try_fold(0u64, |acc, o| acc.checked_add(o.value))
    }

    // -----------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------

    /// Compute the digest the input at `input_index` signs for `pub_key`,
    /// using the settings' sighash type.
    ///
    /// The algorithm is chosen from the chain and the script the input
    /// spends; `pub_key` supplies the scriptCode of witness spends.
    pub fn signature_hash(
        &self,
        input_index: usize,
        pub_key: &PublicKey,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::signature_hash(self, input_index, pub_key, self.settings.sighash_type)
    }

    /// Sign every input with the matching key from `keys`.
    ///
    /// # Returns
    /// A new signed transaction, or the first error; nothing is signed
    /// unless every input is.
    pub fn sign(&self, keys: &[PrivateKey]) -> Result<Transaction, TransactionError> {
        signer::sign(self, keys)
    }
}

impl std::fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
