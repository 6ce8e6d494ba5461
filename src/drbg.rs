//! Deterministic nonce generator.
//!
//! An RFC-6979-flavored HMAC-SHA256 byte stream: seed it once with 32
//! bytes, then draw as many 32-byte blocks as needed. This is the
//! "deterministic RNG" external collaborator from the design — every
//! secret nonce in this crate is drawn from one of these rather than
//! from a thread-local CSPRNG, so that a session seeded identically
//! twice produces identical nonces.
//!
//! This is *not* full RFC 6979 (which derives a nonce from the message
//! and private key); it only reuses RFC 6979's HMAC-DRBG construction
//! (section 3.2, steps b/c/d/f/h) as a generic seeded stream.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// A seeded HMAC-SHA256 byte stream.
///
/// `k` and `v` are zeroized on drop; nothing about this type's internal
/// state survives past its lifetime.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct NonceRng {
    k: [u8; 32],
    v: [u8; 32],
    retry: bool,
}

impl NonceRng {
    /// Initialize the stream from a 32-byte seed.
    pub fn new(seed: &[u8; 32]) -> Self {
        let mut rng = Self {
            k: [0u8; 32],
            v: [1u8; 32],
            retry: false,
        };
        rng.reseed(seed);
        rng
    }

    fn hmac(&self, data: &[&[u8]]) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(&self.k).expect("HMAC accepts any key length");
        for chunk in data {
            mac.update(chunk);
        }
        mac.finalize().into_bytes().into()
    }

    fn reseed(&mut self, seed: &[u8; 32]) {
        self.k = self.hmac(&[&self.v, &[0x00], seed]);
        self.v = self.hmac(&[&self.v]);
        self.k = self.hmac(&[&self.v, &[0x01], seed]);
        self.v = self.hmac(&[&self.v]);
        self.retry = false;
    }

    /// Draw the next 32-byte block from the stream.
    pub fn generate(&mut self) -> [u8; 32] {
        if self.retry {
            self.k = self.hmac(&[&self.v, &[0x00]]);
            self.v = self.hmac(&[&self.v]);
        }
        self.v = self.hmac(&[&self.v]);
        self.retry = true;
        self.v
    }
}
