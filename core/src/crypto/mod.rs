//! crypto/mod.rs
//! Thin adapters over the external box, secretbox and sign primitives.
//!
//! The adapters own key/nonce length checks and turn every rejection into a
//! `PrimitiveError`. Nothing here panics on malformed input.

pub mod types;
pub mod public_box;
pub mod secret_box;
pub mod sign;

pub use types::*;
pub use sign::VerifyKeySource;

/// Generate a (public, secret) pair for `box`.
pub fn box_keypair() -> KeyPair {
    public_box::keypair()
}

/// Generate a (public, secret) pair for `sign`.
pub fn sign_keypair() -> KeyPair {
    sign::keypair()
}
