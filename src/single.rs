//! Single-signer sign/verify — the degenerate n=1 case of the aggregate
//! scheme, specified directly rather than routed through a one-cosigner
//! [`crate::session::Session`].

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{ProjectivePoint, Scalar};
use tracing::{debug, instrument};
use zeroize::Zeroize;

use crate::challenge::single_signer_challenge;
use crate::drbg::NonceRng;
use crate::error::{MusigError, Result};
use crate::msm::ecmult_multi_var;
use crate::qr::{field_element_from_canonical, has_quad_y, normalize_nonce, set_xquad};
use crate::types::{PublicKey, Signature};

/// Draw a secret nonce from `rng`, retrying on zero or overflow, and
/// return it already QR-normalized alongside its public point.
fn generate_normalized_nonce(rng: &mut NonceRng) -> (Scalar, ProjectivePoint) {
    loop {
        let candidate: Option<Scalar> = Option::from(Scalar::from_repr(rng.generate().into()));
        let k = match candidate {
            Some(k) if k != Scalar::ZERO => k,
            _ => continue,
        };
        let r = ProjectivePoint::GENERATOR * k;
        return normalize_nonce(k, r);
    }
}

/// Ordinary single-signer Schnorr sign.
///
/// `k32`, if present, is an externally supplied secret nonce; otherwise
/// one is drawn from a fresh [`NonceRng`] seeded with `seed`. `r_pub`,
/// if present, is bound into the challenge in place of the normalized
/// `R` itself — supplying the actual normalized nonce point here must
/// produce a signature bit-identical to omitting it (S5).
#[instrument(skip(msg, x_bytes, k32, r_pub, seed))]
pub fn sign_single(
    msg: &[u8; 32],
    x_bytes: &[u8; 32],
    k32: Option<&[u8; 32]>,
    r_pub: Option<&ProjectivePoint>,
    seed: &[u8; 32],
) -> Result<Signature> {
    let mut x = Option::from(Scalar::from_repr((*x_bytes).into())).ok_or(MusigError::ScalarOverflow)?;

    let (mut k, r) = match k32 {
        Some(bytes) => {
            let k_raw = Option::from(Scalar::from_repr((*bytes).into())).ok_or(MusigError::ScalarOverflow)?;
            let r_raw = ProjectivePoint::GENERATOR * k_raw;
            normalize_nonce(k_raw, r_raw)
        }
        None => {
            let mut rng = NonceRng::new(seed);
            generate_normalized_nonce(&mut rng)
        }
    };

    let challenge_point = r_pub.unwrap_or(&r);
    let e_result = single_signer_challenge(challenge_point, msg);

    let r_x: [u8; 32] = r.to_affine().to_encoded_point(false).as_bytes()[1..33]
        .try_into()
        .expect("33-byte uncompressed encoding has a 32-byte x");

    let e = match e_result {
        Ok(e) => e,
        Err(err) => {
            x.zeroize();
            k.zeroize();
            return Err(err);
        }
    };

    let s = k + e * x;
    x.zeroize();
    k.zeroize();

    debug!("produced single-signer signature");
    Ok(Signature::new(s, r_x.into()))
}

/// Ordinary single-signer Schnorr verify.
///
/// `r_pub`, if present, stands in for the reconstructed `set_xquad(R_x)`
/// point when forming the challenge — this is how a signer can bind a
/// signature to a *specific* nonce point rather than the canonical
/// QR-normalized reconstruction (see S5's negative case). Both the
/// x-equality and the QR-parity of the recovered point are required;
/// x-equality alone would admit the negated point too.
#[instrument(skip(pubkey, sig, msg, r_pub))]
pub fn verify_single(pubkey: &PublicKey, sig: &Signature, msg: &[u8; 32], r_pub: Option<&ProjectivePoint>) -> Result<()> {
    let r_x_field = sig.r_x_field();
    field_element_from_canonical(&r_x_field).ok_or(MusigError::FieldOverflow)?;

    let challenge_point = match r_pub {
        Some(p) => *p,
        None => {
            let affine = set_xquad(&r_x_field).ok_or(MusigError::FieldOverflow)?;
            ProjectivePoint::from(affine)
        }
    };

    let e = single_signer_challenge(&challenge_point, msg)?;

    let q = ecmult_multi_var(sig.s(), std::iter::once((-e, pubkey.point())));

    if q == ProjectivePoint::IDENTITY {
        return Err(MusigError::VerificationFailed);
    }

    let q_affine = q.to_affine();
    let q_x: [u8; 32] = q_affine.to_encoded_point(false).as_bytes()[1..33]
        .try_into()
        .expect("33-byte uncompressed encoding has a 32-byte x");

    if q_x != sig.r_x_bytes() || !has_quad_y(&q) {
        return Err(MusigError::VerificationFailed);
    }

    debug!("single-signer signature verified");
    Ok(())
}
