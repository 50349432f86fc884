//! ECDSA signature with DER serialization and RFC6979 deterministic nonces.
//!
//! Transaction signatures are DER encoded with a low S value (BIP-0062);
//! the compact 65-byte form with a recovery header is kept for message
//! signing and key recovery.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{self, RecoveryId, VerifyingKey};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// The secp256k1 curve order N.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// Half of the secp256k1 curve order (N/2), used for low-S normalization.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// Length of a signature-hash digest.
pub const DIGEST_LEN: usize = 32;

/// An ECDSA signature with R and S components (32 bytes each, big-endian).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Create a signature from raw R and S values.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// The R component.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The S component.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Parse a DER-encoded ECDSA signature.
    ///
    /// Expected format: `0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>`.
    /// Trailing bytes after the declared length (such as a sighash byte)
    /// are ignored.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or `InvalidSignature` if the encoding is
    /// malformed or R/S are outside `[1, N)`.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed = |why: &str| PrimitivesError::InvalidSignature(format!("malformed signature: {}", why));

        if bytes.len() < 8 {
            return Err(malformed("too short"));
        }
        if bytes[0] != 0x30 {
            return Err(malformed("no header magic"));
        }
        let sig_len = bytes[1] as usize;
        if sig_len + 2 > bytes.len() || sig_len + 2 < 8 {
            return Err(malformed("bad length"));
        }

        let data = &bytes[..sig_len + 2];
        let (r_bytes, rest) = read_der_int(&data[2..]).ok_or_else(|| malformed("bogus R"))?;
        let (s_bytes, rest) = read_der_int(rest).ok_or_else(|| malformed("bogus S"))?;
        if !rest.is_empty() {
            return Err(malformed("trailing data inside sequence"));
        }

        let r = to_32_bytes(r_bytes)?;
        let s = to_32_bytes(s_bytes)?;

        for (name, v) in [("R", &r), ("S", &s)] {
            if v.iter().all(|&b| b == 0) {
                return Err(PrimitivesError::InvalidSignature(format!("signature {} is zero", name)));
            }
            if v.as_slice() >= CURVE_ORDER.as_slice() {
                return Err(PrimitivesError::InvalidSignature(format!("signature {} is >= curve.N", name)));
            }
        }

        Ok(Signature { r, s })
    }

    /// Serialize in DER format with low-S normalization.
    pub fn to_der(&self) -> Vec<u8> {
        let s = if self.s > HALF_ORDER {
            subtract_from_order(&self.s)
        } else {
            self.s
        };

        let rb = canonicalize_int(&self.r);
        let sb = canonicalize_int(&s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(0x30);
        out.push((total_len - 2) as u8);
        out.push(0x02);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(0x02);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Serialize in the 65-byte compact format `<27 + 4 + recid> <R> <S>`.
    pub fn to_compact(&self, recovery_id: u8) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = 27 + 4 + (recovery_id & 0x03);
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// Sign a 32-byte digest with RFC6979 deterministic nonces.
    ///
    /// # Returns
    /// The low-S signature and the matching public key recovery id.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<(Self, u8), PrimitivesError> {
        if hash.len() != DIGEST_LEN {
            return Err(PrimitivesError::InvalidHash(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LEN,
                hash.len()
            )));
        }

        let (k256_sig, recovery_id) = priv_key
            .signing_key()
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        let r: [u8; 32] = r_bytes.into();
        let mut s: [u8; 32] = s_bytes.into();
        let mut recid = recovery_id.to_byte();

        // negating S flips the parity of the recovered point
        if s > HALF_ORDER {
            s = subtract_from_order(&s);
            recid ^= 1;
        }

        Ok((Signature { r, s }, recid))
    }

    /// Verify this signature against a 32-byte digest and public key.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        if hash.len() != DIGEST_LEN {
            return false;
        }
        let k256_sig = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        pub_key.verifying_key().verify_prehash(hash, &k256_sig).is_ok()
    }

    /// Recover the signing public key from a compact signature and digest.
    pub fn recover_public_key(
        compact_sig: &[u8],
        hash: &[u8],
    ) -> Result<PublicKey, PrimitivesError> {
        if compact_sig.len() != 65 {
            return Err(PrimitivesError::InvalidSignature(
                "invalid compact signature size".to_string(),
            ));
        }
        if hash.len() != DIGEST_LEN {
            return Err(PrimitivesError::InvalidHash("digest must be 32 bytes".to_string()));
        }

        let header = compact_sig[0]
            .checked_sub(27)
            .ok_or_else(|| PrimitivesError::InvalidSignature("invalid recovery header".to_string()))?;
        let recovery_id = RecoveryId::from_byte(header & 0x03)
            .ok_or_else(|| PrimitivesError::InvalidSignature("invalid recovery id".to_string()))?;

        let k256_sig = ecdsa::Signature::from_scalars(
            *k256::FieldBytes::from_slice(&compact_sig[1..33]),
            *k256::FieldBytes::from_slice(&compact_sig[33..65]),
        )
        .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let recovered = VerifyingKey::recover_from_prehash(hash, &k256_sig, recovery_id)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(PublicKey::from_k256_verifying_key(&recovered))
    }
}

/// Read one DER INTEGER, returning its content bytes and the remainder.
fn read_der_int(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let (&marker, rest) = data.split_first()?;
    if marker != 0x02 {
        return None;
    }
    let (&len, rest) = rest.split_first()?;
    let len = len as usize;
    if len == 0 || len > rest.len() {
        return None;
    }
    Some(rest.split_at(len))
}

/// Canonicalize an integer for DER encoding.
///
/// Strips leading zeros and adds a 0x00 byte when the high bit is set.
fn canonicalize_int(val: &[u8; 32]) -> Vec<u8> {
    let start = val.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &val[start..];

    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(trimmed);
        out
    } else {
        trimmed.to_vec()
    }
}

/// Left-pad a big-endian integer to 32 bytes.
fn to_32_bytes(bytes: &[u8]) -> Result<[u8; 32], PrimitivesError> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let trimmed = &bytes[start..];
    if trimmed.len() > 32 {
        return Err(PrimitivesError::InvalidSignature(
            "integer value too large for 32 bytes".to_string(),
        ));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}

/// Compute N - val where N is the secp256k1 curve order.
fn subtract_from_order(val: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;
    for i in (0..32).rev() {
        let diff = CURVE_ORDER[i] as i32 - val[i] as i32 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }
    result
}
