//! Error type shared by every fallible operation in this crate.

use thiserror::Error;

/// Everything that can go wrong while signing, combining, or verifying.
///
/// Every variant collapses to "rejected" at the API boundary (none of
/// them carry secret material), but keeping them distinct lets tests
/// assert on *why* an operation was rejected instead of just that it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MusigError {
    /// A 32-byte scalar parsed from wire bytes was not in `[0, n)`.
    #[error("scalar is not canonical (>= curve order)")]
    ScalarOverflow,

    /// A 32-byte field element (an x-coordinate) was not in `[0, p)`.
    #[error("field element is not canonical (>= field prime)")]
    FieldOverflow,

    /// A challenge hash reduced to a value >= the curve order.
    ///
    /// Cryptographically negligible (~2^-128), kept distinct from
    /// [`MusigError::ScalarOverflow`] only because it names a different
    /// stage of the protocol.
    #[error("challenge hash did not reduce to a canonical scalar")]
    ChallengeOverflow,

    /// A signature or curve point byte string did not have the expected
    /// length or was not a valid point encoding.
    #[error("invalid wire encoding")]
    InvalidEncoding,

    /// An aggregate signing session was asked to act on a cosigner index
    /// outside `[0, n)`.
    #[error("cosigner index {0} is out of range")]
    InvalidIndex(usize),

    /// `generate_nonce` was called twice for the same cosigner index.
    #[error("nonce already generated for cosigner index {0}")]
    NonceAlreadyGenerated(usize),

    /// `partial_sign` was called before every cosigner's nonce was known.
    #[error("not every cosigner's nonce has been registered")]
    NonceSumIncomplete,

    /// `partial_sign` was called for an index that has not generated its
    /// own nonce (or has already signed).
    #[error("cosigner index {0} has no pending nonce to sign with")]
    NonceNotOurs(usize),

    /// `partial_sign` was called twice for the same cosigner index.
    #[error("cosigner index {0} has already produced a partial signature")]
    NonceAlreadySigned(usize),

    /// `combine` was given a different number of partial signatures than
    /// the session has cosigners.
    #[error("expected {expected} partial signatures, got {got}")]
    PartialCountMismatch { expected: usize, got: usize },

    /// A session or verification call was given an empty cosigner set.
    #[error("cosigner set is empty")]
    EmptyCosignerSet,

    /// A public key equal to the point at infinity was supplied.
    #[error("public key is the identity point")]
    IdentityPublicKey,

    /// The joint nonce sum `R_agg` collapsed to the point at infinity
    /// (cancelling nonces); there is no x-coordinate to serialize.
    #[error("joint nonce sum is the identity point")]
    JointNonceIsIdentity,

    /// `aggregate_verify` or `verify_single` rejected the signature.
    #[error("signature did not verify")]
    VerificationFailed,
}

pub type Result<T> = core::result::Result<T, MusigError>;
