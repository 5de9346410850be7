//! constants.rs
//! Primitive byte lengths and execution-layer defaults.
//!
//! The primitive lengths are defined by the external primitives and exposed
//! for callers sizing their buffers. Nothing in the dispatch path enforces
//! them; the primitive adapters are the authority.

/// Public-key box (Curve25519-XSalsa20-Poly1305).
pub const BOX_NONCEBYTES: usize = 24;
pub const BOX_PUBLICKEYBYTES: usize = crypto_box::KEY_SIZE;
pub const BOX_SECRETKEYBYTES: usize = crypto_box::KEY_SIZE;

/// Ed25519 signatures. The secret key is NaCl's `seed || public_key` layout.
pub const SIGN_PUBLICKEYBYTES: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;
pub const SIGN_SECRETKEYBYTES: usize = ed25519_dalek::KEYPAIR_LENGTH;
pub const SIGN_BYTES: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// Secret-key box (XSalsa20-Poly1305).
pub const SECRETBOX_NONCEBYTES: usize = 24;
pub const SECRETBOX_KEYBYTES: usize = 32;

/// Poly1305 tag prepended to every box/secretbox ciphertext.
pub const MAC_BYTES: usize = 16;

/// Initial output buffer of the codec loop (4 KiB). Grows by doubling.
pub const CODEC_CHUNK_SIZE: usize = 4 * 1024;

/// zlib level used when the config leaves it unset.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Longest single block inside `wait_all` before in-flight work is re-checked.
pub const WAIT_SLICE: std::time::Duration = std::time::Duration::from_millis(10);

/// Hard ceiling on background workers.
pub const MAX_WORKERS: usize = 256;

/// Failure texts for the compression stages of the pipeline variants.
pub const DEFLATE_FAILED: &str = "failed to deflate";
pub const INFLATE_FAILED: &str = "failed to inflate";
