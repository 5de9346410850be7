//! crypto/public_box.rs
//! Public-key authenticated encryption (Curve25519-XSalsa20-Poly1305) via crypto_box.
//!
//! Ciphertext layout is NaCl's "easy" form: 16-byte Poly1305 tag followed by
//! the encrypted message.

use crypto_box::aead::{self, Aead};
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use rand::rngs::OsRng;
use zeroize::{Zeroize, Zeroizing};

use crate::constants::{BOX_NONCEBYTES, BOX_PUBLICKEYBYTES, BOX_SECRETKEYBYTES, MAC_BYTES};
use crate::crypto::types::{KeyPair, PrimitiveError};

fn public_key(bytes: &[u8]) -> Result<PublicKey, PrimitiveError> {
    let raw: [u8; BOX_PUBLICKEYBYTES] = bytes
        .try_into()
        .map_err(|_| PrimitiveError::InvalidPublicKeyLen {
            expected: BOX_PUBLICKEYBYTES,
            actual: bytes.len(),
        })?;
    Ok(PublicKey::from(raw))
}

fn secret_key(bytes: &[u8]) -> Result<SecretKey, PrimitiveError> {
    let mut raw: [u8; BOX_SECRETKEYBYTES] = bytes
        .try_into()
        .map_err(|_| PrimitiveError::InvalidSecretKeyLen {
            expected: BOX_SECRETKEYBYTES,
            actual: bytes.len(),
        })?;
    let key = SecretKey::from(raw);
    raw.zeroize();
    Ok(key)
}

fn check_nonce(nonce: &[u8]) -> Result<&aead::Nonce<SalsaBox>, PrimitiveError> {
    if nonce.len() != BOX_NONCEBYTES {
        return Err(PrimitiveError::InvalidNonceLen {
            expected: BOX_NONCEBYTES,
            actual: nonce.len(),
        });
    }
    Ok(aead::Nonce::<SalsaBox>::from_slice(nonce))
}

fn salsa_box(public: &[u8], secret: &[u8]) -> Result<SalsaBox, PrimitiveError> {
    let pk = public_key(public)?;
    let sk = secret_key(secret)?;
    Ok(SalsaBox::new(&pk, &sk))
}

/// Encrypt and authenticate `message` from the owner of `secret` to the owner of `public`.
pub fn seal(message: &[u8], nonce: &[u8], public: &[u8], secret: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = salsa_box(public, secret)?;
    let nonce = check_nonce(nonce)?;
    cipher
        .encrypt(nonce, message)
        .map_err(|_| PrimitiveError::EncryptFailed)
}

/// Verify and decrypt a box produced by `seal` with the mirrored key pair.
pub fn open(ciphertext: &[u8], nonce: &[u8], public: &[u8], secret: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = salsa_box(public, secret)?;
    let nonce = check_nonce(nonce)?;
    if ciphertext.len() < MAC_BYTES {
        return Err(PrimitiveError::CiphertextTooShort { min: MAC_BYTES, actual: ciphertext.len() });
    }
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| PrimitiveError::VerificationFailed)
}

/// Generate a new box key pair from the OS RNG.
pub fn keypair() -> KeyPair {
    let secret = SecretKey::generate(&mut OsRng);
    let public = secret.public_key();
    KeyPair {
        public_key: public.as_bytes().to_vec(),
        secret_key: Zeroizing::new(secret.to_bytes().to_vec()),
    }
}
