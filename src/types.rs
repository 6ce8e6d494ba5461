//! Wire types: public keys, signatures, partial signatures, and the
//! per-cosigner progress marker.

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};

use crate::error::{MusigError, Result};
use crate::qr::field_element_from_canonical;

/// A cosigner's public key.
///
/// Never the point at infinity — the identity point is rejected at
/// every construction path, matching the "a `PublicKey` is never stored
/// as the point at infinity" invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(ProjectivePoint);

impl PublicKey {
    /// Wrap a curve point, rejecting the identity.
    pub fn from_point(point: ProjectivePoint) -> Result<Self> {
        if point == ProjectivePoint::IDENTITY {
            return Err(MusigError::IdentityPublicKey);
        }
        Ok(Self(point))
    }

    /// Parse a 33-byte SEC1 compressed public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| MusigError::InvalidEncoding)?;
        let affine: AffinePoint =
            Option::from(AffinePoint::from_encoded_point(&encoded)).ok_or(MusigError::InvalidEncoding)?;
        Self::from_point(ProjectivePoint::from(affine))
    }

    pub fn point(&self) -> ProjectivePoint {
        self.0
    }

    /// 33-byte SEC1 compressed encoding, as consumed by the challenge hash.
    pub fn to_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(self.0.to_affine().to_encoded_point(true).as_bytes());
        out
    }
}

/// A single cosigner's scalar contribution `s_i = k_i + e_i * x_i`.
///
/// Wire form: 32 bytes, big-endian, unframed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialSignature(Scalar);

impl PartialSignature {
    pub(crate) fn from_scalar(s: Scalar) -> Self {
        Self(s)
    }

    pub(crate) fn scalar(&self) -> Scalar {
        self.0
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        Option::from(Scalar::from_repr((*bytes).into()))
            .map(Self)
            .ok_or(MusigError::ScalarOverflow)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }
}

/// The 64-byte `s || R_x` signature produced by both the single-signer
/// and aggregate paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    s: Scalar,
    r_x: FieldBytes,
}

impl Signature {
    pub(crate) fn new(s: Scalar, r_x: FieldBytes) -> Self {
        Self { s, r_x }
    }

    pub(crate) fn s(&self) -> Scalar {
        self.s
    }

    pub(crate) fn r_x_bytes(&self) -> [u8; 32] {
        self.r_x.into()
    }

    pub(crate) fn r_x_field(&self) -> FieldBytes {
        self.r_x
    }

    /// Parse the 64-byte wire form, rejecting a non-canonical `s` or a
    /// `R_x` outside the field's canonical range.
    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self> {
        let s_bytes: [u8; 32] = bytes[0..32].try_into().unwrap();
        let r_x_bytes: [u8; 32] = bytes[32..64].try_into().unwrap();

        let s = Option::from(Scalar::from_repr(s_bytes.into())).ok_or(MusigError::ScalarOverflow)?;
        let r_x: FieldBytes = r_x_bytes.into();
        field_element_from_canonical(&r_x).ok_or(MusigError::FieldOverflow)?;

        Ok(Self { s, r_x })
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(&self.s.to_bytes());
        out[32..64].copy_from_slice(&self.r_x);
        out
    }
}

/// Per-cosigner progress within an aggregate signing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceProgress {
    /// No nonce known for this index yet.
    Unknown,
    /// Reserved for an externally supplied nonce from a cosigner this
    /// session did not generate the nonce for itself. No path in this
    /// crate writes this variant; it exists so a future nonce-exchange
    /// protocol has somewhere to put that state without widening the
    /// enum. See the open question in the design notes.
    Other,
    /// This session generated the nonce at this index and has not yet
    /// produced a partial signature for it.
    Ours,
    /// A partial signature has been produced for this index.
    Signed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_identity_public_key() {
        assert_eq!(
            PublicKey::from_point(ProjectivePoint::IDENTITY),
            Err(MusigError::IdentityPublicKey)
        );
    }

    #[test]
    fn public_key_roundtrips_through_bytes() {
        let point = ProjectivePoint::GENERATOR * Scalar::from(5u64);
        let pk = PublicKey::from_point(point).unwrap();
        let decoded = PublicKey::from_bytes(&pk.to_bytes()).unwrap();
        assert_eq!(pk, decoded);
    }

    #[test]
    fn signature_rejects_scalar_overflow() {
        let mut bytes = [0u8; 64];
        // secp256k1 order n in big-endian; using it verbatim as `s` is
        // the canonical off-by-one overflow case.
        bytes[0..32].copy_from_slice(&[
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0xff, 0xff,
        ]);
        assert_eq!(Signature::from_bytes(&bytes), Err(MusigError::ScalarOverflow));
    }

    #[test]
    fn partial_signature_roundtrips() {
        let s = Scalar::from(123456789u64);
        let partial = PartialSignature::from_scalar(s);
        let decoded = PartialSignature::from_bytes(&partial.to_bytes()).unwrap();
        assert_eq!(partial, decoded);
    }
}
