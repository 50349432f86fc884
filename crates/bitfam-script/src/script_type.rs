//! Standard script template classification.
//!
//! Classification is a pure function of the parsed elements; nothing is
//! cached on the script, so the type can never disagree with the bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::ScriptElement;
use crate::opcodes::*;

/// The standard templates a locking script can match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptType {
    /// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
    P2PKH,
    /// `<33|65 byte pubkey> OP_CHECKSIG`
    P2PK,
    /// `OP_HASH160 <20> OP_EQUAL`
    P2SH,
    /// `OP_0 <20>`
    P2WPKH,
    /// `OP_0 <32>`
    P2WSH,
    /// `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`
    Multisig,
    /// Anything else, including scripts that fail to parse.
    NonStandard,
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptType::P2PKH => "P2PKH",
            ScriptType::P2PK => "P2PK",
            ScriptType::P2SH => "P2SH",
            ScriptType::P2WPKH => "P2WPKH",
            ScriptType::P2WSH => "P2WSH",
            ScriptType::Multisig => "multisig",
            ScriptType::NonStandard => "nonstandard",
        };
        f.write_str(name)
    }
}

/// Parameters of a bare multisig script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigInfo {
    /// Number of signatures required (m).
    pub required: u8,
    /// The listed public keys, in script order (n of them).
    pub public_keys: Vec<Vec<u8>>,
}

/// Classify a parsed element list.
///
/// Templates are tried in a fixed order: P2PKH, P2PK, P2SH, P2WPKH,
/// P2WSH, multisig.
pub fn classify(elements: &[ScriptElement]) -> ScriptType {
    if is_p2pkh(elements) {
        ScriptType::P2PKH
    } else if is_p2pk(elements) {
        ScriptType::P2PK
    } else if is_p2sh(elements) {
        ScriptType::P2SH
    } else if is_witness_v0(elements, 20) {
        ScriptType::P2WPKH
    } else if is_witness_v0(elements, 32) {
        ScriptType::P2WSH
    } else if multisig_info(elements).is_some() {
        ScriptType::Multisig
    } else {
        ScriptType::NonStandard
    }
}

fn is_p2pkh(e: &[ScriptElement]) -> bool {
    e.len() == 5
        && e[0].opcode() == OP_DUP
        && e[1].opcode() == OP_HASH160
        && e[2].is_push()
        && e[2].data().len() == 20
        && e[3].opcode() == OP_EQUALVERIFY
        && e[4].opcode() == OP_CHECKSIG
}

fn is_p2pk(e: &[ScriptElement]) -> bool {
    e.len() == 2
        && e[0].is_push()
        && is_public_key_len(e[0].data().len())
        && e[1].opcode() == OP_CHECKSIG
}

fn is_p2sh(e: &[ScriptElement]) -> bool {
    e.len() == 3
        && e[0].opcode() == OP_HASH160
        && e[1].is_push()
        && e[1].data().len() == 20
        && e[2].opcode() == OP_EQUAL
}

fn is_witness_v0(e: &[ScriptElement], program_len: usize) -> bool {
    e.len() == 2 && e[0].opcode() == OP_0 && e[1].is_push() && e[1].data().len() == program_len
}

fn is_public_key_len(len: usize) -> bool {
    len == 33 || len == 65
}

/// Extract m and the public keys from a bare multisig script.
///
/// Requires `1 <= m <= n` and exactly n public key pushes between the two
/// small integers.
pub fn multisig_info(e: &[ScriptElement]) -> Option<MultisigInfo> {
    if e.len() < 4 || e[e.len() - 1].opcode() != OP_CHECKMULTISIG {
        return None;
    }
    let required = small_int_value(e[0].opcode())?;
    let total = small_int_value(e[e.len() - 2].opcode())?;
    if required == 0 || total < required || e.len() != total as usize + 3 {
        return None;
    }

    let keys = &e[1..e.len() - 2];
    if !keys.iter().all(|k| k.is_push() && is_public_key_len(k.data().len())) {
        return None;
    }

    Some(MultisigInfo {
        required,
        public_keys: keys.iter().map(|k| k.data().to_vec()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::decode_script;

    fn classify_hex(s: &str) -> ScriptType {
        classify(&decode_script(&hex::decode(s).unwrap()).unwrap())
    }

    const PUBKEY: &str = "02f0d97c290e79bf2a8660c406aa56b6f189ff79f2245cc5aff82808b58131b4d5";

    #[test]
    fn test_standard_templates() {
        assert_eq!(classify_hex("76a91403ececf2d12a7f614aef4c82ecf13c303bd9975d88ac"), ScriptType::P2PKH);
        assert_eq!(classify_hex(&format!("21{}ac", PUBKEY)), ScriptType::P2PK);
        assert_eq!(classify_hex("a9149de5aeaff9c48431ba4dd6e8af73d51f38e451cb87"), ScriptType::P2SH);
        assert_eq!(classify_hex("0014751e76e8199196d454941c45d1b3a323f1433bd6"), ScriptType::P2WPKH);
        assert_eq!(
            classify_hex("00201863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262"),
            ScriptType::P2WSH
        );
    }

    #[test]
    fn test_near_misses_are_nonstandard() {
        // P2PKH with a 19-byte hash
        assert_eq!(classify_hex("76a91303ececf2d12a7f614aef4c82ecf13c303bd99788ac"), ScriptType::NonStandard);
        // witness program with a version 1 opcode
        assert_eq!(classify_hex("5114751e76e8199196d454941c45d1b3a323f1433bd6"), ScriptType::NonStandard);
        // a lone pubkey push without OP_CHECKSIG
        assert_eq!(classify_hex(&format!("21{}", PUBKEY)), ScriptType::NonStandard);
        assert_eq!(classify(&[]), ScriptType::NonStandard);
    }

    #[test]
    fn test_multisig() {
        let other = "03b0bd634234abbb1ba1e986e884185c61cf43e001f9137f23c2c409273eb16e65";
        let script = format!("5221{}21{}52ae", PUBKEY, other);
        let elements = decode_script(&hex::decode(&script).unwrap()).unwrap();
        assert_eq!(classify(&elements), ScriptType::Multisig);

        let info = multisig_info(&elements).unwrap();
        assert_eq!(info.required, 2);
        assert_eq!(info.public_keys.len(), 2);
        assert_eq!(hex::encode(&info.public_keys[1]), other);
    }

    #[test]
    fn test_multisig_rejects_bad_counts() {
        // m = 2 > n = 1
        assert_eq!(classify_hex(&format!("5221{}51ae", PUBKEY)), ScriptType::NonStandard);
        // n = 2 but only one key listed
        assert_eq!(classify_hex(&format!("5121{}52ae", PUBKEY)), ScriptType::NonStandard);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ScriptType::P2WPKH).unwrap(), r#""P2WPKH""#);
        let parsed: ScriptType = serde_json::from_str(r#""NonStandard""#).unwrap();
        assert_eq!(parsed, ScriptType::NonStandard);
        assert_eq!(ScriptType::Multisig.to_string(), "multisig");
    }
}
