/// Bitcoin-family primitives: hashing, wire encoding and secp256k1 keys.
///
/// This crate provides the leaf building blocks the script and transaction
/// crates are assembled from:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, HASH160)
/// - Chain hash type for transaction identification
/// - Canonical VarInt encoding with little-endian wire readers and writers
/// - Base58 and Base58Check encoding/decoding
/// - Elliptic curve keys and deterministic (RFC6979) DER signatures

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
