/// Script type - the raw bytes of a locking or unlocking script.
///
/// A `Script` wraps its wire bytes. Elements and the standard template
/// type are derived from those bytes on demand, so they always agree.

use std::fmt;

use bitfam_primitives::ec::PublicKey;
use bitfam_primitives::hash::hash160;

use crate::address::{Address, AddressType};
use crate::element::{decode_script, push_data_prefix, ScriptElement};
use crate::opcodes::*;
use crate::script_type::{classify, multisig_info, MultisigInfo, ScriptType};
use crate::ScriptError;

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Create a script from an ASM string.
    ///
    /// Known opcode names (e.g. "OP_DUP") are emitted directly and any
    /// other token is treated as hex push data.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for section in asm.split_whitespace() {
            if let Some(opcode) = string_to_opcode(section) {
                script.0.push(opcode);
            } else {
                script.append_push_data_hex(section)?;
            }
        }
        Ok(script)
    }

    /// `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn p2pkh(pub_key_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(25);
        b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(pub_key_hash);
        b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script(b)
    }

    /// `OP_HASH160 <hash> OP_EQUAL`
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(23);
        b.extend_from_slice(&[OP_HASH160, OP_DATA_20]);
        b.extend_from_slice(script_hash);
        b.push(OP_EQUAL);
        Script(b)
    }

    /// `OP_0 <20-byte hash>`
    pub fn p2wpkh(pub_key_hash: &[u8; 20]) -> Self {
        let mut b = Vec::with_capacity(22);
        b.extend_from_slice(&[OP_0, OP_DATA_20]);
        b.extend_from_slice(pub_key_hash);
        Script(b)
    }

    /// `OP_0 <32-byte hash>`
    pub fn p2wsh(script_hash: &[u8; 32]) -> Self {
        let mut b = Vec::with_capacity(34);
        b.extend_from_slice(&[OP_0, OP_DATA_32]);
        b.extend_from_slice(script_hash);
        Script(b)
    }

    /// `<compressed pubkey> OP_CHECKSIG`, also the single-key witness
    /// script of a P2WSH spend.
    pub fn p2pk(pub_key: &PublicKey) -> Self {
        let mut b = Vec::with_capacity(35);
        b.push(OP_DATA_33);
        b.extend_from_slice(&pub_key.to_compressed());
        b.push(OP_CHECKSIG);
        Script(b)
    }

    /// The locking script paying to a decoded address.
    pub fn from_address(address: &Address) -> Self {
        match address.address_type {
            AddressType::PubKeyHash => Self::p2pkh(&address.hash),
            AddressType::ScriptHash => Self::p2sh(&address.hash),
        }
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Convert the script to its ASM representation.
    ///
    /// # Returns
    /// Space-separated tokens, or an empty string if the script does not
    /// parse.
    pub fn to_asm(&self) -> String {
        match self.elements() {
            Ok(elements) => elements
                .iter()
                .map(|e| e.to_asm_string())
                .collect::<Vec<_>>()
                .join(" "),
            Err(_) => String::new(),
        }
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Parsing and classification
    // -----------------------------------------------------------------------

    /// Parse the script into its elements.
    pub fn elements(&self) -> Result<Vec<ScriptElement>, ScriptError> {
        decode_script(&self.0)
    }

    /// The standard template this script matches.
    ///
    /// Total: a script that fails to parse is `NonStandard`.
    pub fn script_type(&self) -> ScriptType {
        match self.elements() {
            Ok(elements) => classify(&elements),
            Err(_) => ScriptType::NonStandard,
        }
    }

    /// Required signature count and public keys of a bare multisig script.
    pub fn multisig_info(&self) -> Option<MultisigInfo> {
        self.elements().ok().and_then(|e| multisig_info(&e))
    }

    /// Extract the identifying hash of a standard script.
    ///
    /// The embedded hash for P2PKH, P2SH, P2WPKH and P2WSH, and the
    /// hash160 of the key for P2PK.
    ///
    /// # Returns
    /// The hash bytes, or `InvalidAddressOrHashLength` for multisig and
    /// nonstandard scripts.
    pub fn public_key_hash(&self) -> Result<Vec<u8>, ScriptError> {
        let elements = self.elements()?;
        match classify(&elements) {
            ScriptType::P2PKH => Ok(elements[2].data().to_vec()),
            ScriptType::P2PK => Ok(hash160(elements[0].data()).to_vec()),
            ScriptType::P2SH | ScriptType::P2WPKH | ScriptType::P2WSH => {
                Ok(elements[1].data().to_vec())
            }
            other => Err(ScriptError::InvalidAddressOrHashLength(format!(
                "{} script has no identifying hash",
                other
            ))),
        }
    }

    /// Rebuild the script with every occurrence of `opcode` removed.
    ///
    /// Remaining elements keep their original push encoding.
    pub fn script_without(&self, opcode: u8) -> Result<Script, ScriptError> {
        let mut out = Vec::with_capacity(self.0.len());
        for element in self.elements()? {
            if element.opcode() != opcode {
                element.write_to(&mut out);
            }
        }
        Ok(Script(out))
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append data bytes with the smallest push prefix.
    ///
    /// # Returns
    /// `Ok(())` on success, or `DataTooBig` past `u32::MAX` bytes.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append hex-encoded data with the smallest push prefix.
    pub fn append_push_data_hex(&mut self, hex_str: &str) -> Result<(), ScriptError> {
        let data = hex::decode(hex_str)
            .map_err(|_| ScriptError::InvalidOpcodeData(hex_str.to_string()))?;
        self.append_push_data(&data)
    }

    /// Append raw opcodes.
    ///
    /// Rejects push opcodes (`0x01..=OP_PUSHDATA4`); use `append_push_data`
    /// for those.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes.iter().find(|&&op| (OP_DATA_1..=OP_PUSHDATA4).contains(&op)) {
            return Err(ScriptError::InvalidOpcodeType(format!("0x{:02x}", op)));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
