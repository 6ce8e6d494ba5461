//! Multi-scalar multiplication.
//!
//! Verification cost is dominated by computing `s*G + Σ c_i*P_i`. A real
//! `libsecp256k1`-style engine batches the doublings across all terms
//! with a Pippenger bucket method fed by a scratch allocation; `k256`
//! does not expose that machinery publicly, so this is a direct
//! left-fold over point addition. It is functionally equivalent — same
//! result, same streaming-callback shape — just not asymptotically
//! batched.

use k256::{ProjectivePoint, Scalar};

/// Fixed-capacity scratch buffer threaded through the "easy verify"
/// entry point, honoring the external contract that a batched MSM
/// engine would actually consume for its bucket accumulators. This
/// fold-based implementation doesn't need it, but keeping the same
/// shape means swapping in a real Pippenger engine later is a
/// same-signature change, not an API break.
pub struct Scratch {
    _buf: Vec<u8>,
}

impl Scratch {
    pub const SIZE: usize = 4096;
    pub const STRIDE: usize = 1024;

    pub fn new() -> Self {
        Self {
            _buf: vec![0u8; Self::SIZE],
        }
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

/// `g_scalar * G + Σ pairs[i].0 * pairs[i].1`.
///
/// `pairs` is a streaming iterator rather than a pre-materialized pair
/// of arrays, matching the coefficient-callback shape of the external
/// contract (saves an `n`-scalar, `n`-point transient allocation).
pub fn ecmult_multi_var(
    g_scalar: Scalar,
    pairs: impl Iterator<Item = (Scalar, ProjectivePoint)>,
) -> ProjectivePoint {
    pairs.fold(ProjectivePoint::GENERATOR * g_scalar, |acc, (k, p)| {
        acc + p * k
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pairs_is_just_the_generator_term() {
        let g_scalar = Scalar::from(3u64);
        let result = ecmult_multi_var(g_scalar, std::iter::empty());
        assert_eq!(result, ProjectivePoint::GENERATOR * g_scalar);
    }

    #[test]
    fn sums_all_terms() {
        let g_scalar = Scalar::from(2u64);
        let k1 = Scalar::from(3u64);
        let k2 = Scalar::from(5u64);
        let p1 = ProjectivePoint::GENERATOR * Scalar::from(7u64);
        let p2 = ProjectivePoint::GENERATOR * Scalar::from(11u64);

        let result = ecmult_multi_var(g_scalar, vec![(k1, p1), (k2, p2)].into_iter());
        let expected = ProjectivePoint::GENERATOR * (g_scalar + k1 * Scalar::from(7u64) + k2 * Scalar::from(11u64));
        assert_eq!(result, expected);
    }
}
