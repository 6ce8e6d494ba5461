#![allow(non_snake_case)]

use cosign_musig::{sign_single, verify_single, PublicKey};
use k256::{ProjectivePoint, Scalar};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cosign_musig=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let x = Scalar::from(424242u64);
    let x_bytes: [u8; 32] = x.to_bytes().into();
    let P = PublicKey::from_point(ProjectivePoint::GENERATOR * x).unwrap();

    let msg = *b"rust is best, schnorr is better\0";
    let seed = [0x7au8; 32];

    let sig = sign_single(&msg, &x_bytes, None, None, &seed).unwrap();

    match verify_single(&P, &sig, &msg, None) {
        Ok(()) => println!("success ✅"),
        Err(_) => println!("something bad happened ❌"),
    }
}
