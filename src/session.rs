//! The aggregate-signing state machine: one [`Session`] per cosigner,
//! each running the same four-step protocol — `create`, `generate_nonce`
//! per index, `partial_sign` per index, `combine` once all partials are
//! collected out of band.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{ProjectivePoint, Scalar};
use tracing::{debug, instrument};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::challenge::{compute_prehash, indexed_challenge};
use crate::drbg::NonceRng;
use crate::error::{MusigError, Result};
use crate::qr::{has_quad_y, normalize_nonce};
use crate::types::{NonceProgress, PartialSignature, PublicKey, Signature};

/// A secret nonce scalar, zeroized when its slot is overwritten or the
/// owning [`Session`] is dropped.
#[derive(Zeroize, ZeroizeOnDrop, Clone, Copy)]
struct SecretNonce(Scalar);

impl Default for SecretNonce {
    fn default() -> Self {
        Self(Scalar::ZERO)
    }
}

/// One cosigner's view of an in-progress aggregate signature.
///
/// Owns three parallel arrays indexed by cosigner position — public
/// keys, secret nonces, and per-index progress — plus the running
/// public-nonce sum and this cosigner's deterministic RNG. All secret
/// material is zeroed when the session is dropped; there is no explicit
/// `destroy` beyond ordinary scope exit.
pub struct Session {
    pubkeys: Vec<PublicKey>,
    secnonce: Vec<SecretNonce>,
    progress: Vec<NonceProgress>,
    r_agg: ProjectivePoint,
    rng: NonceRng,
}

impl Session {
    /// `n = pubkeys.len()` cosigners; `seed` drives this session's
    /// deterministic nonce stream. `r_agg` starts at the point at
    /// infinity; every `progress[i]` starts `Unknown`.
    #[instrument(skip(pubkeys, seed))]
    pub fn create(pubkeys: &[PublicKey], seed: &[u8; 32]) -> Self {
        let n = pubkeys.len();
        debug!(cosigners = n, "creating aggregate signing session");
        Self {
            pubkeys: pubkeys.to_vec(),
            secnonce: vec![SecretNonce::default(); n],
            progress: vec![NonceProgress::Unknown; n],
            r_agg: ProjectivePoint::IDENTITY,
            rng: NonceRng::new(seed),
        }
    }

    pub fn cosigner_count(&self) -> usize {
        self.pubkeys.len()
    }

    pub fn progress_at(&self, i: usize) -> Result<NonceProgress> {
        self.progress.get(i).copied().ok_or(MusigError::InvalidIndex(i))
    }

    /// Draw this cosigner's secret nonce at index `i`, QR-normalize it,
    /// and fold its public point into `R_agg`.
    #[instrument(skip(self))]
    pub fn generate_nonce(&mut self, i: usize) -> Result<()> {
        if i >= self.pubkeys.len() {
            return Err(MusigError::InvalidIndex(i));
        }
        if !matches!(self.progress[i], NonceProgress::Unknown) {
            return Err(MusigError::NonceAlreadyGenerated(i));
        }

        // Reject-on-overflow-or-zero, draw again; cryptographically
        // negligible in practice, the loop stays entirely internal.
        let k_raw = loop {
            let candidate: Option<Scalar> = Option::from(Scalar::from_repr(self.rng.generate().into()));
            match candidate {
                Some(k) if k != Scalar::ZERO => break k,
                _ => continue,
            }
        };

        let r_raw = ProjectivePoint::GENERATOR * k_raw;
        let (k, r) = normalize_nonce(k_raw, r_raw);

        self.secnonce[i] = SecretNonce(k);
        self.r_agg += r;
        self.progress[i] = NonceProgress::Ours;
        debug!(index = i, "registered nonce, folded into joint nonce sum");
        Ok(())
    }

    /// Produce this cosigner's partial scalar `s_i = k_i + e_i·x_i`.
    ///
    /// Every index must already have a registered nonce (`progress[i]`
    /// anywhere but `Unknown`) before any cosigner may sign — the joint
    /// nonce `R_agg` is not final until then.
    #[instrument(skip(self, msg, x_i_bytes))]
    pub fn partial_sign(&mut self, msg: &[u8; 32], x_i_bytes: &[u8; 32], i: usize) -> Result<PartialSignature> {
        if i >= self.pubkeys.len() {
            return Err(MusigError::InvalidIndex(i));
        }
        if self.progress.iter().any(|p| matches!(p, NonceProgress::Unknown)) {
            return Err(MusigError::NonceSumIncomplete);
        }
        match self.progress[i] {
            NonceProgress::Ours => {}
            NonceProgress::Signed => return Err(MusigError::NonceAlreadySigned(i)),
            _ => return Err(MusigError::NonceNotOurs(i)),
        }
        if self.r_agg == ProjectivePoint::IDENTITY {
            return Err(MusigError::JointNonceIsIdentity);
        }

        let mut x_i =
            Option::from(Scalar::from_repr((*x_i_bytes).into())).ok_or(MusigError::ScalarOverflow)?;

        let r_agg_is_quad = has_quad_y(&self.r_agg);
        let mut k_i = self.secnonce[i].0;
        if !r_agg_is_quad {
            k_i = -k_i;
        }

        let r_agg_normalized = if r_agg_is_quad { self.r_agg } else { -self.r_agg };
        let r_agg_x: [u8; 32] = r_agg_normalized
            .to_affine()
            .to_encoded_point(false)
            .as_bytes()[1..33]
            .try_into()
            .expect("33-byte uncompressed encoding has a 32-byte x");

        let prehash = compute_prehash(&self.pubkeys, &r_agg_x, msg);
        let e_i = match indexed_challenge(&prehash, i) {
            Ok(e) => e,
            Err(err) => {
                x_i.zeroize();
                k_i.zeroize();
                return Err(err);
            }
        };

        let mut s_i = k_i + e_i * x_i;
        x_i.zeroize();
        k_i.zeroize();
        self.secnonce[i].0 = Scalar::ZERO;
        self.progress[i] = NonceProgress::Signed;

        let out = PartialSignature::from_scalar(s_i);
        s_i.zeroize();
        Ok(out)
    }

    /// Sum every cosigner's partial scalar and emit the final signature.
    ///
    /// `partials` must be given in the same cosigner order used for
    /// `pubkeys`; the per-index challenge already bound each partial to
    /// its position, so `combine` itself does no further reordering.
    #[instrument(skip(self, partials))]
    pub fn combine(&self, partials: &[PartialSignature]) -> Result<Signature> {
        if partials.len() != self.pubkeys.len() {
            return Err(MusigError::PartialCountMismatch {
                expected: self.pubkeys.len(),
                got: partials.len(),
            });
        }

        if self.r_agg == ProjectivePoint::IDENTITY {
            return Err(MusigError::JointNonceIsIdentity);
        }

        let s: Scalar = partials.iter().map(|p| p.scalar()).fold(Scalar::ZERO, |a, b| a + b);
        debug!(partials = partials.len(), "combined partial signatures");

        let r_agg_is_quad = has_quad_y(&self.r_agg);
        let r_agg_normalized = if r_agg_is_quad { self.r_agg } else { -self.r_agg };
        let r_x: [u8; 32] = r_agg_normalized
            .to_affine()
            .to_encoded_point(false)
            .as_bytes()[1..33]
            .try_into()
            .expect("33-byte uncompressed encoding has a 32-byte x");

        Ok(Signature::new(s, r_x.into()))
    }

    #[cfg(test)]
    pub(crate) fn secret_nonce_word(&self, i: usize) -> Scalar {
        self.secnonce[i].0
    }
}
