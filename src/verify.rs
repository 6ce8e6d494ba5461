//! Aggregate verification: the batched counterpart to a completed
//! [`crate::session::Session`] round, and the single "easy verify" entry
//! point that pairs it with a scratch allocation.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::ProjectivePoint;
use tracing::{debug, instrument};

use crate::challenge::{compute_prehash, indexed_challenge};
use crate::error::{MusigError, Result};
use crate::msm::{ecmult_multi_var, Scratch};
use crate::qr::{field_element_from_canonical, has_quad_y};
use crate::types::{PublicKey, Signature};

/// Verify an aggregate signature against `pubkeys` (same order used at
/// signing time) and `msg`.
///
/// Rejects with no side effects for an empty `pubkeys` (S6): a batch
/// with no cosigner terms reduces to `Q = s·G`, which can never equal a
/// genuine `R_x` for a signature nobody produced, but an explicit guard
/// keeps the empty-set case from depending on that coincidence.
#[instrument(skip(pubkeys, sig, msg))]
pub fn aggregate_verify(pubkeys: &[PublicKey], sig: &Signature, msg: &[u8; 32]) -> Result<()> {
    if pubkeys.is_empty() {
        return Err(MusigError::EmptyCosignerSet);
    }

    // n=1 is not just the general equation specialized to one term: the
    // single-signer path binds the challenge to the full nonce point
    // directly rather than through the multi-signer prehash, so the two
    // constructions are only guaranteed to agree here because this case
    // is routed through the same verifier.
    if pubkeys.len() == 1 {
        return crate::single::verify_single(&pubkeys[0], sig, msg, None);
    }

    let r_x_field = sig.r_x_field();
    field_element_from_canonical(&r_x_field).ok_or(MusigError::FieldOverflow)?;
    let r_x_bytes = sig.r_x_bytes();

    let prehash = compute_prehash(pubkeys, &r_x_bytes, msg);

    let mut terms = Vec::with_capacity(pubkeys.len());
    for (i, pk) in pubkeys.iter().enumerate() {
        let e_i = indexed_challenge(&prehash, i)?;
        terms.push((-e_i, pk.point()));
    }

    let q = ecmult_multi_var(sig.s(), terms.into_iter());

    if q == ProjectivePoint::IDENTITY {
        return Err(MusigError::VerificationFailed);
    }

    let q_x: [u8; 32] = q.to_affine().to_encoded_point(false).as_bytes()[1..33]
        .try_into()
        .expect("33-byte uncompressed encoding has a 32-byte x");

    if q_x != r_x_bytes || !has_quad_y(&q) {
        return Err(MusigError::VerificationFailed);
    }

    debug!(cosigners = pubkeys.len(), "aggregate signature verified");
    Ok(())
}

/// `aggregate_verify`, paired with a caller-owned scratch allocation.
///
/// The verification routine itself never touches `scratch` — this
/// fold-based multi-scalar multiplication needs no working memory — but
/// the parameter is threaded through so callers reusing a real batched
/// MSM engine's scratch across calls see the same call shape here.
pub fn aggregate_verify_with_scratch(
    pubkeys: &[PublicKey],
    sig: &Signature,
    msg: &[u8; 32],
    _scratch: &mut Scratch,
) -> Result<()> {
    aggregate_verify(pubkeys, sig, msg)
}

/// Allocate a bounded scratch region, verify, and release it.
pub fn aggregate_verify_easy(pubkeys: &[PublicKey], sig: &Signature, msg: &[u8; 32]) -> Result<()> {
    let mut scratch = Scratch::new();
    aggregate_verify_with_scratch(pubkeys, sig, msg, &mut scratch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use k256::elliptic_curve::PrimeField;
    use k256::Scalar;

    fn keypair(x: u64) -> ([u8; 32], PublicKey) {
        let scalar = Scalar::from(x);
        let bytes: [u8; 32] = scalar.to_bytes().into();
        let pk = PublicKey::from_point(ProjectivePoint::GENERATOR * scalar).unwrap();
        (bytes, pk)
    }

    fn three_party_signature() -> (Vec<PublicKey>, [u8; 32], crate::types::Signature) {
        let (x1, p1) = keypair(1);
        let (x2, p2) = keypair(2);
        let (x3, p3) = keypair(3);
        let pubkeys = vec![p1, p2, p3];
        let msg = [0x07u8; 32];
        let seed = [0x55u8; 32];

        let mut sessions: Vec<Session> = (0..3).map(|_| Session::create(&pubkeys, &seed)).collect();
        for s in sessions.iter_mut() {
            s.generate_nonce(0).unwrap();
            s.generate_nonce(1).unwrap();
            s.generate_nonce(2).unwrap();
        }

        let partials = vec![
            sessions[0].partial_sign(&msg, &x1, 0).unwrap(),
            sessions[1].partial_sign(&msg, &x2, 1).unwrap(),
            sessions[2].partial_sign(&msg, &x3, 2).unwrap(),
        ];

        let sig = sessions[0].combine(&partials).unwrap();
        (pubkeys, msg, sig)
    }

    #[test]
    fn three_party_signature_verifies() {
        let (pubkeys, msg, sig) = three_party_signature();
        assert!(aggregate_verify(&pubkeys, &sig, &msg).is_ok());
    }

    #[test]
    fn swapping_pubkey_order_breaks_verification() {
        let (pubkeys, msg, sig) = three_party_signature();
        let mut swapped = pubkeys.clone();
        swapped.swap(0, 1);
        assert!(aggregate_verify(&swapped, &sig, &msg).is_err());
    }

    #[test]
    fn flipping_a_pubkey_bit_breaks_verification() {
        let (pubkeys, msg, sig) = three_party_signature();
        let mut tampered = pubkeys;
        let mut bytes = tampered[0].to_bytes();
        // Flipping the parity tag keeps the byte string a valid SEC1
        // compressed point encoding (just the other square root), which
        // is enough to change the pubkey without risking an
        // off-curve x-coordinate that `from_bytes` would reject outright.
        bytes[0] ^= 0x01;
        tampered[0] = PublicKey::from_bytes(&bytes).unwrap();
        assert!(aggregate_verify(&tampered, &sig, &msg).is_err());
    }

    #[test]
    fn flipping_the_message_breaks_verification() {
        let (pubkeys, msg, sig) = three_party_signature();
        let mut tampered_msg = msg;
        tampered_msg[0] ^= 0x01;
        assert!(aggregate_verify(&pubkeys, &sig, &tampered_msg).is_err());
    }

    #[test]
    fn empty_cosigner_set_rejects() {
        let (_pubkeys, msg, sig) = three_party_signature();
        assert_eq!(aggregate_verify(&[], &sig, &msg), Err(MusigError::EmptyCosignerSet));
    }

    #[test]
    fn single_cosigner_aggregate_matches_single_signer_path() {
        let (x, p) = keypair(42);
        let msg = [0x09u8; 32];
        let seed = [0x11u8; 32];

        let sig = crate::single::sign_single(&msg, &x, None, None, &seed).unwrap();

        assert!(aggregate_verify(&[p], &sig, &msg).is_ok());
        assert!(crate::single::verify_single(&p, &sig, &msg, None).is_ok());
    }

    #[test]
    fn easy_verify_agrees_with_plain_verify() {
        let (pubkeys, msg, sig) = three_party_signature();
        assert!(aggregate_verify_easy(&pubkeys, &sig, &msg).is_ok());
    }
}
