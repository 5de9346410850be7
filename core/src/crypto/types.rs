//! crypto/types.rs
//! Error and key types shared by the primitive adapters.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

/// Rejection raised by an external primitive.
///
/// Display texts follow NaCl's C++ API so callers see the primitive's own wording.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    #[error("incorrect public-key length")]
    InvalidPublicKeyLen { expected: usize, actual: usize },

    #[error("incorrect secret-key length")]
    InvalidSecretKeyLen { expected: usize, actual: usize },

    #[error("incorrect key length")]
    InvalidKeyLen { expected: usize, actual: usize },

    #[error("incorrect nonce length")]
    InvalidNonceLen { expected: usize, actual: usize },

    /// 64-byte signing key whose public half does not match its seed.
    #[error("invalid secret key")]
    InvalidSecretKey,

    #[error("ciphertext too short")]
    CiphertextTooShort { min: usize, actual: usize },

    /// Authentication tag mismatch on box/secretbox open.
    #[error("ciphertext fails verification")]
    VerificationFailed,

    #[error("signed message too short")]
    SignedMessageTooShort { min: usize, actual: usize },

    #[error("signature fails verification")]
    BadSignature,

    #[error("encryption failed")]
    EncryptFailed,
}

/// A freshly generated (public, secret) pair.
///
/// The secret half is wiped from memory when the pair is dropped.
#[derive(Clone)]
pub struct KeyPair {
    pub public_key: Vec<u8>,
    pub secret_key: Zeroizing<Vec<u8>>,
}

impl KeyPair {
    pub fn into_parts(self) -> (Vec<u8>, Zeroizing<Vec<u8>>) {
        (self.public_key, self.secret_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &format_args!("<{} bytes redacted>", self.secret_key.len()))
            .finish()
    }
}
