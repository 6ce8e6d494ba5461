#![allow(non_snake_case)]

use cosign_musig::{aggregate_verify, PartialSignature, PublicKey, Session};
use k256::{ProjectivePoint, Scalar};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn keypair(x: u64) -> ([u8; 32], PublicKey) {
    let scalar = Scalar::from(x);
    let bytes: [u8; 32] = scalar.to_bytes().into();
    let P = PublicKey::from_point(ProjectivePoint::GENERATOR * scalar).unwrap();
    (bytes, P)
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cosign_musig=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (x1, P1) = keypair(11);
    let (x2, P2) = keypair(22);
    let (x3, P3) = keypair(33);
    let pubkeys = vec![P1, P2, P3];

    let msg = *b"three cosigners, one signature!\0";
    let seed = [0x3cu8; 32];

    // In a real deployment each cosigner runs its own Session with its
    // own secret key; they're all created here for demonstration.
    let mut sessions: Vec<Session> = (0..3).map(|_| Session::create(&pubkeys, &seed)).collect();
    for s in sessions.iter_mut() {
        s.generate_nonce(0).unwrap();
        s.generate_nonce(1).unwrap();
        s.generate_nonce(2).unwrap();
    }

    let partials: Vec<PartialSignature> = vec![
        sessions[0].partial_sign(&msg, &x1, 0).unwrap(),
        sessions[1].partial_sign(&msg, &x2, 1).unwrap(),
        sessions[2].partial_sign(&msg, &x3, 2).unwrap(),
    ];

    let sig = sessions[0].combine(&partials).unwrap();

    match aggregate_verify(&pubkeys, &sig, &msg) {
        Ok(()) => println!("success ✅"),
        Err(_) => println!("something bad happened ❌"),
    }
}
