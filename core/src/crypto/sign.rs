//! crypto/sign.rs
//! Ed25519 signatures in NaCl's combined layout via ed25519-dalek.
//!
//! - Signed message: `signature(64) || message`.
//! - Secret key: `seed(32) || public_key(32)`.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::constants::{SIGN_BYTES, SIGN_PUBLICKEYBYTES, SIGN_SECRETKEYBYTES};
use crate::crypto::types::{KeyPair, PrimitiveError};

/// Which half of a key pair was handed to `sign_open`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VerifyKeySource {
    PublicKey,
    /// 64-byte secret key; its trailing half is the public key.
    SecretKey,
}

impl VerifyKeySource {
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            SIGN_PUBLICKEYBYTES => Some(Self::PublicKey),
            SIGN_SECRETKEYBYTES => Some(Self::SecretKey),
            _ => None,
        }
    }
}

fn signing_key(secret: &[u8]) -> Result<SigningKey, PrimitiveError> {
    let raw: Zeroizing<[u8; SIGN_SECRETKEYBYTES]> = Zeroizing::new(
        secret
            .try_into()
            .map_err(|_| PrimitiveError::InvalidSecretKeyLen {
                expected: SIGN_SECRETKEYBYTES,
                actual: secret.len(),
            })?,
    );
    SigningKey::from_keypair_bytes(&raw).map_err(|_| PrimitiveError::InvalidSecretKey)
}

fn verifying_key(key: &[u8]) -> Result<VerifyingKey, PrimitiveError> {
    let public = match VerifyKeySource::from_len(key.len()) {
        Some(VerifyKeySource::PublicKey) => key,
        Some(VerifyKeySource::SecretKey) => &key[SIGN_SECRETKEYBYTES - SIGN_PUBLICKEYBYTES..],
        None => {
            return Err(PrimitiveError::InvalidPublicKeyLen {
                expected: SIGN_PUBLICKEYBYTES,
                actual: key.len(),
            })
        }
    };
    let raw: [u8; SIGN_PUBLICKEYBYTES] = public
        .try_into()
        .map_err(|_| PrimitiveError::InvalidPublicKeyLen {
            expected: SIGN_PUBLICKEYBYTES,
            actual: public.len(),
        })?;
    VerifyingKey::from_bytes(&raw).map_err(|_| PrimitiveError::BadSignature)
}

/// Sign `message`, returning the signature followed by the message.
pub fn sign(message: &[u8], secret: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
    let key = signing_key(secret)?;
    let signature = key.sign(message);

    let mut signed = Vec::with_capacity(SIGN_BYTES + message.len());
    signed.extend_from_slice(&signature.to_bytes());
    signed.extend_from_slice(message);
    Ok(signed)
}

/// Verify a signed message and return the embedded message.
pub fn sign_open(signed: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
    let verifier = verifying_key(key)?;
    if signed.len() < SIGN_BYTES {
        return Err(PrimitiveError::SignedMessageTooShort { min: SIGN_BYTES, actual: signed.len() });
    }

    let (sig, message) = signed.split_at(SIGN_BYTES);
    let sig: [u8; SIGN_BYTES] = sig
        .try_into()
        .map_err(|_| PrimitiveError::SignedMessageTooShort { min: SIGN_BYTES, actual: signed.len() })?;
    verifier
        .verify_strict(message, &Signature::from_bytes(&sig))
        .map_err(|_| PrimitiveError::BadSignature)?;
    Ok(message.to_vec())
}

/// Generate a new signing key pair from the OS RNG.
pub fn keypair() -> KeyPair {
    let key = SigningKey::generate(&mut OsRng);
    KeyPair {
        public_key: key.verifying_key().to_bytes().to_vec(),
        secret_key: Zeroizing::new(key.to_keypair_bytes().to_vec()),
    }
}
