//! n-of-n aggregate Schnorr signatures over secp256k1.
//!
//! A set of cosigners, each holding a private key, jointly produce a
//! single 64-byte signature on a 32-byte message that verifies against
//! the set of their public keys. The degenerate `n = 1` case is
//! ordinary single-signer Schnorr, exposed directly as [`single`].
//!
//! ```text
//! session_create(pubkeys, seed)
//!     │
//!     ├── generate_nonce(i)  × n      (Unknown → Ours, folds into R_agg)
//!     │
//!     ├── partial_sign(msg, x_i, i)   (Ours → Signed, needs every index ≠ Unknown)
//!     │
//!     └── combine(partials)           (sums s_i, emits the 64-byte signature)
//! ```
//!
//! Every `R` this crate puts on the wire is quadratic-residue-normalized
//! (see [`qr`]), which is what lets a signature carry only `R`'s
//! x-coordinate. The per-signer challenge hash ([`challenge`]) binds
//! every cosigner to both the joint nonce and the full ordered pubkey
//! set, which is what defeats rogue-key attacks among related keys.
//!
//! Key generation, threshold (t-of-n) signing, adaptor signatures,
//! nonce transport between parties, and persistence are out of scope.

pub mod challenge;
pub mod drbg;
pub mod error;
pub mod msm;
pub mod qr;
pub mod session;
pub mod single;
pub mod types;
pub mod verify;

pub use error::{MusigError, Result};
pub use session::Session;
pub use single::{sign_single, verify_single};
pub use types::{NonceProgress, PartialSignature, PublicKey, Signature};
pub use verify::{aggregate_verify, aggregate_verify_easy, aggregate_verify_with_scratch};
