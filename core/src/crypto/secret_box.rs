//! crypto/secret_box.rs
//! Secret-key authenticated encryption (XSalsa20-Poly1305) via crypto_secretbox.

use crypto_secretbox::aead::{self, Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;

use crate::constants::{MAC_BYTES, SECRETBOX_KEYBYTES, SECRETBOX_NONCEBYTES};
use crate::crypto::types::PrimitiveError;

fn cipher(key: &[u8]) -> Result<XSalsa20Poly1305, PrimitiveError> {
    if key.len() != SECRETBOX_KEYBYTES {
        return Err(PrimitiveError::InvalidKeyLen { expected: SECRETBOX_KEYBYTES, actual: key.len() });
    }
    XSalsa20Poly1305::new_from_slice(key)
        .map_err(|_| PrimitiveError::InvalidKeyLen { expected: SECRETBOX_KEYBYTES, actual: key.len() })
}

fn check_nonce(nonce: &[u8]) -> Result<&aead::Nonce<XSalsa20Poly1305>, PrimitiveError> {
    if nonce.len() != SECRETBOX_NONCEBYTES {
        return Err(PrimitiveError::InvalidNonceLen {
            expected: SECRETBOX_NONCEBYTES,
            actual: nonce.len(),
        });
    }
    Ok(aead::Nonce::<XSalsa20Poly1305>::from_slice(nonce))
}

pub fn seal(message: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = cipher(key)?;
    let nonce = check_nonce(nonce)?;
    cipher
        .encrypt(nonce, message)
        .map_err(|_| PrimitiveError::EncryptFailed)
}

pub fn open(ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = cipher(key)?;
    let nonce = check_nonce(nonce)?;
    if ciphertext.len() < MAC_BYTES {
        return Err(PrimitiveError::CiphertextTooShort { min: MAC_BYTES, actual: ciphertext.len() });
    }
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| PrimitiveError::VerificationFailed)
}
