//! Transaction-wide settings and presets.
//!
//! Settings carry the fields that are not per input or per output:
//! version, lock time, the optional segwit marker/flag pair, which UTXO
//! script types may be spent and the sighash type signatures commit to.

use bitfam_script::ScriptType;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::sighash::SighashType;

/// Segwit marker byte written after the version.
pub const WITNESS_MARKER: u8 = 0x00;

/// Segwit flag byte written after the marker.
pub const WITNESS_FLAG: u8 = 0x01;

/// The two bytes that announce witness data on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessFlag {
    /// Marker byte, `0x00` for segwit.
    pub marker: u8,
    /// Flag byte, `0x01` for segwit.
    pub flag: u8,
}

impl Default for WitnessFlag {
    fn default() -> Self {
        WitnessFlag {
            marker: WITNESS_MARKER,
            flag: WITNESS_FLAG,
        }
    }
}

/// Settings shared by every part of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSettings {
    /// Transaction format version.
    pub version: u32,
    /// Marker/flag pair; `None` for transactions without witness data.
    pub witness: Option<WitnessFlag>,
    /// UTXO script types coin selection may spend.
    pub allowed_script_types: Vec<ScriptType>,
    /// Sighash type used for every signature.
    pub sighash_type: SighashType,
    /// Lock time.
    pub lock_time: u32,
}

impl TransactionSettings {
    /// Legacy Bitcoin: version 1, no witness, P2PKH only, SIGHASH_ALL.
    pub fn bitcoin_defaults() -> Self {
        TransactionSettings {
            version: 1,
            witness: None,
            allowed_script_types: vec![ScriptType::P2PKH],
            sighash_type: SighashType::ALL,
            lock_time: 0,
        }
    }

    /// Segwit Bitcoin: spends P2PKH, P2SH-wrapped P2WPKH and native P2WPKH.
    pub fn bitcoin_witness_defaults() -> Self {
        TransactionSettings {
            witness: Some(WitnessFlag::default()),
            allowed_script_types: vec![ScriptType::P2PKH, ScriptType::P2SH, ScriptType::P2WPKH],
            ..Self::bitcoin_defaults()
        }
    }

    /// BitcoinCash: like legacy Bitcoin with SIGHASH_ALL|FORKID.
    pub fn bitcoin_cash_defaults() -> Self {
        TransactionSettings {
            sighash_type: SighashType::ALL_FORKID,
            ..Self::bitcoin_defaults()
        }
    }

    /// The non-witness preset of a chain.
    pub fn for_chain(chain: Chain) -> Self {
        match chain {
            Chain::Bitcoin => Self::bitcoin_defaults(),
            Chain::BitcoinCash => Self::bitcoin_cash_defaults(),
        }
    }

    /// Set the version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set or clear the witness marker/flag pair.
    pub fn with_witness(mut self, witness: Option<WitnessFlag>) -> Self {
        self.witness = witness;
        self
    }

    /// Replace the spendable script types.
    pub fn with_allowed_script_types(mut self, types: Vec<ScriptType>) -> Self {
        self.allowed_script_types = types;
        self
    }

    /// Set the sighash type.
    pub fn with_sighash_type(mut self, sighash_type: SighashType) -> Self {
        self.sighash_type = sighash_type;
        self
    }

    /// Set the lock time.
    pub fn with_lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    /// True only for the segwit marker `0x00` with flag `0x01`.
    pub fn is_witness(&self) -> bool {
        matches!(
            self.witness,
            Some(WitnessFlag {
                marker: WITNESS_MARKER,
                flag: WITNESS_FLAG
            })
        )
    }

    /// Whether coin selection may spend a UTXO locked by this script type.
    pub fn allows(&self, script_type: ScriptType) -> bool {
        self.allowed_script_types.contains(&script_type)
    }
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self::bitcoin_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let btc = TransactionSettings::bitcoin_defaults();
        assert_eq!(btc.version, 1);
        assert!(!btc.is_witness());
        assert_eq!(btc.sighash_type.as_u8(), 0x01);
        assert!(btc.allows(ScriptType::P2PKH));
        assert!(!btc.allows(ScriptType::P2WPKH));

        let segwit = TransactionSettings::bitcoin_witness_defaults();
        assert!(segwit.is_witness());
        assert!(segwit.allows(ScriptType::P2SH));
        assert!(segwit.allows(ScriptType::P2WPKH));
        assert!(!segwit.allows(ScriptType::P2WSH));

        let bch = TransactionSettings::bitcoin_cash_defaults();
        assert_eq!(bch.sighash_type.as_u8(), 0x41);
        assert!(!bch.is_witness());

        assert_eq!(TransactionSettings::for_chain(Chain::Bitcoin), btc);
        assert_eq!(TransactionSettings::for_chain(Chain::BitcoinCash), bch);
    }

    #[test]
    fn test_non_segwit_flag_pair_is_not_witness() {
        let settings = TransactionSettings::bitcoin_defaults()
            .with_witness(Some(WitnessFlag { marker: 0x00, flag: 0x02 }));
        assert!(!settings.is_witness());
    }

    #[test]
    fn test_builder() {
        let settings = TransactionSettings::bitcoin_defaults()
            .with_version(2)
            .with_lock_time(600_000)
            .with_sighash_type(SighashType::SINGLE)
            .with_allowed_script_types(vec![ScriptType::P2PK]);
        assert_eq!(settings.version, 2);
        assert_eq!(settings.lock_time, 600_000);
        assert_eq!(settings.sighash_type, SighashType::SINGLE);
        assert!(settings.allows(ScriptType::P2PK));
        assert!(!settings.allows(ScriptType::P2PKH));
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = TransactionSettings::bitcoin_witness_defaults();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""sighash_type":1"#));
        let back: TransactionSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
