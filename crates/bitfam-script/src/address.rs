/// Legacy Base58Check addresses and the identifying hashes signers match on.
///
/// Decodes P2PKH and P2SH addresses for mainnet and testnet. The hash
/// helpers compute, for a compressed public key, the hash a locking
/// script of each type commits to.

use std::fmt;

use bitfam_primitives::base58;
use bitfam_primitives::ec::PublicKey;
use bitfam_primitives::hash::{hash160, sha256};
use bitfam_primitives::PrimitivesError;

use crate::script::Script;
use crate::ScriptError;

/// Mainnet P2PKH address version byte.
const MAINNET_P2PKH: u8 = 0x00;
/// Mainnet P2SH address version byte.
const MAINNET_P2SH: u8 = 0x05;
/// Testnet P2PKH address version byte.
const TESTNET_P2PKH: u8 = 0x6f;
/// Testnet P2SH address version byte.
const TESTNET_P2SH: u8 = 0xc4;

/// Decoded length: version byte, 20-byte hash, 4-byte checksum.
const ADDRESS_LEN: usize = 25;

/// Network an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Mainnet (P2PKH '1...', P2SH '3...').
    Mainnet,
    /// Testnet (P2PKH 'm...'/'n...', P2SH '2...').
    Testnet,
}

/// What the 20-byte address hash commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressType {
    /// hash160 of a public key.
    PubKeyHash,
    /// hash160 of a redeem script.
    ScriptHash,
}

/// A legacy Base58Check address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The Base58Check address string.
    pub address_string: String,
    /// The 20-byte hash the address commits to.
    pub hash: [u8; 20],
    /// Whether the hash is of a public key or of a script.
    pub address_type: AddressType,
    /// The network this address belongs to.
    pub network: Network,
}

impl Address {
    /// Parse a Base58Check-encoded address string.
    ///
    /// # Returns
    /// An `Address`, or `InvalidAddress` for bad characters,
    /// `InvalidAddressOrHashLength` when the payload is not 25 bytes,
    /// `EncodingChecksumFailed`, or `UnsupportedAddress` for an unknown
    /// version byte.
    pub fn from_string(addr: &str) -> Result<Self, ScriptError> {
        let decoded = base58::decode(addr)
            .map_err(|_| ScriptError::InvalidAddress(format!("bad char for '{}'", addr)))?;
        if decoded.len() != ADDRESS_LEN {
            return Err(ScriptError::InvalidAddressOrHashLength(format!(
                "'{}' decodes to {} bytes, want {}",
                addr,
                decoded.len(),
                ADDRESS_LEN
            )));
        }

        let payload = base58::check_decode(addr).map_err(|e| match e {
            PrimitivesError::ChecksumMismatch => ScriptError::EncodingChecksumFailed,
            other => ScriptError::Primitives(other),
        })?;

        let (address_type, network) = match payload[0] {
            MAINNET_P2PKH => (AddressType::PubKeyHash, Network::Mainnet),
            MAINNET_P2SH => (AddressType::ScriptHash, Network::Mainnet),
            TESTNET_P2PKH => (AddressType::PubKeyHash, Network::Testnet),
            TESTNET_P2SH => (AddressType::ScriptHash, Network::Testnet),
            _ => return Err(ScriptError::UnsupportedAddress(addr.to_string())),
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            hash,
            address_type,
            network,
        })
    }

    /// Create a P2PKH address from a 20-byte public key hash.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::encode(*hash, AddressType::PubKeyHash, network)
    }

    /// Create a P2SH address from a 20-byte script hash.
    pub fn from_script_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::encode(*hash, AddressType::ScriptHash, network)
    }

    /// Create the P2PKH address of a public key.
    pub fn from_public_key(pub_key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&p2pkh_hash(pub_key), network)
    }

    /// Create the P2SH-wrapped P2WPKH address of a public key.
    pub fn p2sh_p2wpkh_from_public_key(pub_key: &PublicKey, network: Network) -> Self {
        Self::from_script_hash(&p2sh_p2wpkh_hash(pub_key), network)
    }

    fn encode(hash: [u8; 20], address_type: AddressType, network: Network) -> Self {
        let version = match (address_type, network) {
            (AddressType::PubKeyHash, Network::Mainnet) => MAINNET_P2PKH,
            (AddressType::ScriptHash, Network::Mainnet) => MAINNET_P2SH,
            (AddressType::PubKeyHash, Network::Testnet) => TESTNET_P2PKH,
            (AddressType::ScriptHash, Network::Testnet) => TESTNET_P2SH,
        };

        let mut payload = Vec::with_capacity(21);
        payload.push(version);
        payload.extend_from_slice(&hash);

        Address {
            address_string: base58::check_encode(&payload),
            hash,
            address_type,
            network,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

/// Hash a P2PKH (or P2PK/P2WPKH) script commits to: hash160 of the
/// compressed key.
pub fn p2pkh_hash(pub_key: &PublicKey) -> [u8; 20] {
    pub_key.hash160()
}

/// Hash a P2SH-wrapped P2WPKH script commits to: hash160 of the
/// `OP_0 <hash160(pubkey)>` redeem script.
pub fn p2sh_p2wpkh_hash(pub_key: &PublicKey) -> [u8; 20] {
    hash160(Script::p2wpkh(&p2pkh_hash(pub_key)).to_bytes())
}

/// Hash a P2WSH script commits to for a single-key witness script:
/// sha256 of `<pubkey> OP_CHECKSIG`.
pub fn p2wsh_hash(pub_key: &PublicKey) -> [u8; 32] {
    sha256(Script::p2pk(pub_key).to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATOR: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn generator() -> PublicKey {
        PublicKey::from_hex(GENERATOR).unwrap()
    }

    #[test]
    fn test_from_string_mainnet_p2pkh() {
        let addr = Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr").unwrap();
        assert_eq!(hex::encode(addr.hash), "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b");
        assert_eq!(addr.address_type, AddressType::PubKeyHash);
        assert_eq!(addr.network, Network::Mainnet);
        assert_eq!(addr.to_string(), "1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMr");
    }

    #[test]
    fn test_from_string_testnet_p2pkh() {
        let addr = Address::from_string("mtdruWYVEV1wz5yL7GvpBj4MgifCB7yhPd").unwrap();
        assert_eq!(hex::encode(addr.hash), "8fe80c75c9560e8b56ed64ea3c26e18d2c52211b");
        assert_eq!(addr.network, Network::Testnet);
    }

    #[test]
    fn test_from_string_p2sh() {
        let mainnet = Address::from_string("3CNHUhP3uyB9EUtRLsmvFUmvGdjGdkTxJw").unwrap();
        assert_eq!(mainnet.address_type, AddressType::ScriptHash);
        assert_eq!(mainnet.network, Network::Mainnet);
        assert_eq!(mainnet.hash, generator().hash160());

        let testnet = Address::from_string("2N3vVYSK5XRgVSGWy21PnsRmBUywSQNdCsf").unwrap();
        assert_eq!(testnet.address_type, AddressType::ScriptHash);
        assert_eq!(testnet.network, Network::Testnet);
        assert_eq!(testnet.hash, mainnet.hash);
    }

    #[test]
    fn test_from_string_errors() {
        assert!(matches!(
            Address::from_string("ADD8E55"),
            Err(ScriptError::InvalidAddressOrHashLength(_))
        ));
        assert!(matches!(
            Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFM0"),
            Err(ScriptError::InvalidAddress(_))
        ));
        // last character changed
        assert!(matches!(
            Address::from_string("1E7ucTTWRTahCyViPhxSMor2pj4VGQdFMs"),
            Err(ScriptError::EncodingChecksumFailed)
        ));
        // version 0x30
        assert!(matches!(
            Address::from_string("LVuDpNCSSj6pQ7t9Pv6d6sUkLKoqDEVUnJ"),
            Err(ScriptError::UnsupportedAddress(_))
        ));
    }

    #[test]
    fn test_from_public_key_hash() {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&hex::decode("00ac6144c4db7b5790f343cf0477a65fb8a02eb7").unwrap());
        assert_eq!(
            Address::from_public_key_hash(&hash, Network::Mainnet).address_string,
            "114ZWApV4EEU8frr7zygqQcB1V2BodGZuS"
        );
        assert_eq!(
            Address::from_public_key_hash(&hash, Network::Testnet).address_string,
            "mfaWoDuTsFfiunLTqZx4fKpVsUctiDV9jk"
        );
    }

    #[test]
    fn test_public_key_addresses() {
        let g = generator();
        assert_eq!(
            Address::from_public_key(&g, Network::Mainnet).address_string,
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
        assert_eq!(
            Address::p2sh_p2wpkh_from_public_key(&g, Network::Mainnet).address_string,
            "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN"
        );
    }

    #[test]
    fn test_identifying_hashes() {
        let g = generator();
        assert_eq!(hex::encode(p2pkh_hash(&g)), "751e76e8199196d454941c45d1b3a323f1433bd6");
        assert_eq!(hex::encode(p2sh_p2wpkh_hash(&g)), "bcfeb728b584253d5f3f70bcb780e9ef218a68f4");
        assert_eq!(
            hex::encode(p2wsh_hash(&g)),
            "1863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262"
        );
    }
}
