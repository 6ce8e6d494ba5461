//! Quadratic-residue primitives.
//!
//! Every `R` this crate ever puts on the wire has been normalized so its
//! y-coordinate is a quadratic residue mod p — that convention is what
//! lets a signature carry only `R.x` instead of a full compressed point.
//! p ≡ 3 (mod 4) for the secp256k1 base field, so y and -y are never
//! both QRs: exactly one of a valid x-coordinate's two candidate points
//! has QR y.

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{AffinePoint, EncodedPoint, FieldBytes, FieldElement, ProjectivePoint, Scalar};

fn encoded_y_bytes(affine: &AffinePoint) -> FieldBytes {
    let encoded = affine.to_encoded_point(false);
    let bytes = encoded.as_bytes();
    *FieldBytes::from_slice(&bytes[33..65])
}

/// Whether `y` (a field element in canonical big-endian form) is a
/// quadratic residue mod p.
///
/// `y` is assumed to already be canonical (it came from a real curve
/// point); callers parsing untrusted bytes must range-check first via
/// [`field_element_from_canonical`].
pub fn is_quad_residue(y: &FieldBytes) -> bool {
    let fe = FieldElement::from_bytes(y).expect("y came from a valid curve point");
    bool::from(fe.sqrt().is_some())
}

/// Parse 32 canonical big-endian bytes as a field element, rejecting
/// anything outside `[0, p)`.
pub fn field_element_from_canonical(bytes: &FieldBytes) -> Option<FieldElement> {
    Option::from(FieldElement::from_bytes(bytes))
}

fn negate_point(p: ProjectivePoint) -> ProjectivePoint {
    -p
}

/// Apply the y-is-QR normalization to a freshly generated nonce pair:
/// negate both `k` and `R` if `R`'s y is not a quadratic residue.
pub fn normalize_nonce(k: Scalar, r: ProjectivePoint) -> (Scalar, ProjectivePoint) {
    let affine = r.to_affine();
    if is_quad_residue(&encoded_y_bytes(&affine)) {
        (k, r)
    } else {
        (-k, negate_point(r))
    }
}

/// `true` iff the jacobian/projective point's affine y is a quadratic
/// residue. Mirrors the external `has_quad_y_var` contract.
pub fn has_quad_y(p: &ProjectivePoint) -> bool {
    is_quad_residue(&encoded_y_bytes(&p.to_affine()))
}

/// Reconstruct the unique affine point with x-coordinate `r_x` and a
/// quadratic-residue y, i.e. the point `R` a verifier must assume
/// produced a given signature's `R_x` when no explicit nonce point was
/// supplied. Returns `None` if `r_x` is not a valid curve x-coordinate
/// at all (no point, of either parity, has this x).
pub fn set_xquad(r_x: &FieldBytes) -> Option<AffinePoint> {
    let mut compressed = [0u8; 33];
    compressed[0] = 0x02;
    compressed[1..].copy_from_slice(r_x);
    let encoded = EncodedPoint::from_bytes(compressed.as_slice()).ok()?;
    let candidate: AffinePoint = Option::from(AffinePoint::from_encoded_point(&encoded))?;

    if is_quad_residue(&encoded_y_bytes(&candidate)) {
        Some(candidate)
    } else {
        Some(negate_point(candidate.into()).to_affine())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_nonce_produces_quad_residue_y() {
        for i in 1u64..20 {
            let k = Scalar::from(i);
            let r = ProjectivePoint::GENERATOR * k;
            let (_, normalized) = normalize_nonce(k, r);
            assert!(has_quad_y(&normalized));
        }
    }

    #[test]
    fn normalize_nonce_preserves_x() {
        let k = Scalar::from(7u64);
        let r = ProjectivePoint::GENERATOR * k;
        let (_, normalized) = normalize_nonce(k, r);
        let x_before = r.to_affine().to_encoded_point(false).as_bytes()[1..33].to_vec();
        let x_after = normalized.to_affine().to_encoded_point(false).as_bytes()[1..33].to_vec();
        assert_eq!(x_before, x_after);
    }

    #[test]
    fn set_xquad_roundtrips_through_normalize_nonce() {
        let k = Scalar::from(99u64);
        let r = ProjectivePoint::GENERATOR * k;
        let (_, normalized) = normalize_nonce(k, r);
        let x_bytes = *FieldBytes::from_slice(&normalized.to_affine().to_encoded_point(false).as_bytes()[1..33]);
        let reconstructed = set_xquad(&x_bytes).expect("valid x-coordinate");
        assert_eq!(ProjectivePoint::from(reconstructed), normalized);
    }

    #[test]
    fn set_xquad_never_panics_on_arbitrary_bytes() {
        // Not every 32-byte string is a valid curve x-coordinate; the
        // contract is `None`, never a panic.
        let max = FieldBytes::from([0xffu8; 32]);
        let _ = set_xquad(&max);
    }
}
