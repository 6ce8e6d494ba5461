//! Challenge hash construction.
//!
//! Two shapes, both reducing a SHA-256 digest to a scalar with
//! reject-on-overflow (never reduce-on-overflow): single-signer
//! `e = H(R || m)`, and the multi-signer prehash/per-index pair that
//! binds every cosigner to the whole cosigner set and the joint nonce.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::error::{MusigError, Result};
use crate::types::PublicKey;

fn compressed(p: &ProjectivePoint) -> [u8; 33] {
    let mut out = [0u8; 33];
    out.copy_from_slice(p.to_affine().to_encoded_point(true).as_bytes());
    out
}

fn scalar_from_digest(digest: [u8; 32]) -> Result<Scalar> {
    Option::from(Scalar::from_repr(digest.into())).ok_or(MusigError::ChallengeOverflow)
}

/// `e = H(compressed(R) || m)`, reduced mod n with reject-on-overflow.
pub fn single_signer_challenge(r_pub: &ProjectivePoint, msg: &[u8; 32]) -> Result<Scalar> {
    let mut hasher = Sha256::new();
    hasher.update(compressed(r_pub));
    hasher.update(msg);
    scalar_from_digest(hasher.finalize().into())
}

/// Serialize `i` as base-128 little-endian *without* a continuation bit:
/// emit the low 7 bits, shift right by 7, repeat while nonzero. `i == 0`
/// encodes to zero bytes. This is deliberately not a standard varint —
/// it is safe only because the encoded length is never parsed back, it
/// is hashed, and reimplementations must reproduce it byte-for-byte.
pub fn encode_index_varint(mut i: usize) -> Vec<u8> {
    let mut out = Vec::new();
    while i > 0 {
        out.push((i & 0x7f) as u8);
        i >>= 7;
    }
    out
}

/// `prehash = SHA-256(compressed(P_1) || ... || compressed(P_n) || R_x || m)`.
///
/// Pubkey order is caller-supplied and significant.
pub fn compute_prehash(pubkeys: &[PublicKey], r_x: &[u8; 32], msg: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for pk in pubkeys {
        hasher.update(pk.to_bytes());
    }
    hasher.update(r_x);
    hasher.update(msg);
    hasher.finalize().into()
}

/// `e_i = H(varint(i) || prehash)`, reduced mod n with reject-on-overflow.
pub fn indexed_challenge(prehash: &[u8; 32], index: usize) -> Result<Scalar> {
    let mut hasher = Sha256::new();
    hasher.update(encode_index_varint(index));
    hasher.update(prehash);
    scalar_from_digest(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_zero_is_empty() {
        assert!(encode_index_varint(0).is_empty());
    }

    #[test]
    fn varint_small_values() {
        assert_eq!(encode_index_varint(1), vec![1]);
        assert_eq!(encode_index_varint(127), vec![127]);
        assert_eq!(encode_index_varint(128), vec![0, 1]);
        assert_eq!(encode_index_varint(300), vec![44, 2]);
    }

    #[test]
    fn indexed_challenge_differs_by_index() {
        let prehash = [0x11u8; 32];
        let e0 = indexed_challenge(&prehash, 0).unwrap();
        let e1 = indexed_challenge(&prehash, 1).unwrap();
        assert_ne!(e0, e1);
    }

    #[test]
    fn prehash_is_order_sensitive() {
        let k1 = Scalar::from(1u64);
        let k2 = Scalar::from(2u64);
        let p1 = PublicKey::from_point(ProjectivePoint::GENERATOR * k1).unwrap();
        let p2 = PublicKey::from_point(ProjectivePoint::GENERATOR * k2).unwrap();
        let r_x = [0x22u8; 32];
        let msg = [0x33u8; 32];
        let h_forward = compute_prehash(&[p1, p2], &r_x, &msg);
        let h_backward = compute_prehash(&[p2, p1], &r_x, &msg);
        assert_ne!(h_forward, h_backward);
    }
}
