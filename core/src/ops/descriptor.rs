//! ops/descriptor.rs
//! Operation descriptors: one variant per operation kind, owning its inputs.
//!
//! Construction from a positional argument list checks arity only. Byte
//! lengths are left to the primitive adapters.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::VerifyKeySource;

/// Operation kinds accepted by the dispatcher.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    Box,
    BoxOpen,
    DeflateBox,
    InflateBoxOpen,
    Sign,
    SignOpen,
    SecretBox,
    SecretBoxOpen,
}

impl OpKind {
    pub const ALL: [OpKind; 8] = [
        OpKind::Box,
        OpKind::BoxOpen,
        OpKind::DeflateBox,
        OpKind::InflateBoxOpen,
        OpKind::Sign,
        OpKind::SignOpen,
        OpKind::SecretBox,
        OpKind::SecretBoxOpen,
    ];

    /// Number of byte-string arguments the kind requires.
    pub const fn arity(self) -> usize {
        match self {
            OpKind::Box | OpKind::BoxOpen | OpKind::DeflateBox | OpKind::InflateBoxOpen => 4,
            OpKind::Sign | OpKind::SignOpen => 2,
            OpKind::SecretBox | OpKind::SecretBoxOpen => 3,
        }
    }

    /// Host-facing operation name.
    pub const fn name(self) -> &'static str {
        match self {
            OpKind::Box            => "box",
            OpKind::BoxOpen        => "box_open",
            OpKind::DeflateBox     => "deflate_box",
            OpKind::InflateBoxOpen => "inflate_box_open",
            OpKind::Sign           => "sign",
            OpKind::SignOpen       => "sign_open",
            OpKind::SecretBox      => "secretbox",
            OpKind::SecretBoxOpen  => "secretbox_open",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wrong number of arguments for an operation. Raised before any work starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} expects {expected} arguments, got {actual}")]
pub struct ArgumentError {
    pub kind: OpKind,
    pub expected: usize,
    pub actual: usize,
}

/// Inputs of the public-key box family, in call order.
///
/// For sealing: (message, nonce, recipient public key, sender secret key).
/// For opening: (ciphertext, nonce, sender public key, recipient secret key).
#[derive(Clone)]
pub struct BoxArgs {
    pub message: Vec<u8>,
    pub nonce: Vec<u8>,
    pub public_key: Vec<u8>,
    pub secret_key: Zeroizing<Vec<u8>>,
}

impl BoxArgs {
    /// Copy borrowed inputs into an owned descriptor.
    pub fn new(message: &[u8], nonce: &[u8], public_key: &[u8], secret_key: &[u8]) -> Self {
        Self {
            message: message.to_vec(),
            nonce: nonce.to_vec(),
            public_key: public_key.to_vec(),
            secret_key: Zeroizing::new(secret_key.to_vec()),
        }
    }
}

/// Inputs of sign / sign_open: (message, key).
#[derive(Clone)]
pub struct SignArgs {
    pub message: Vec<u8>,
    pub key: Zeroizing<Vec<u8>>,
}

impl SignArgs {
    pub fn new(message: &[u8], key: &[u8]) -> Self {
        Self { message: message.to_vec(), key: Zeroizing::new(key.to_vec()) }
    }

    pub fn key_source(&self) -> Option<VerifyKeySource> {
        VerifyKeySource::from_len(self.key.len())
    }
}

/// Inputs of secretbox / secretbox_open: (message, nonce, shared key).
#[derive(Clone)]
pub struct SecretBoxArgs {
    pub message: Vec<u8>,
    pub nonce: Vec<u8>,
    pub key: Zeroizing<Vec<u8>>,
}

impl SecretBoxArgs {
    pub fn new(message: &[u8], nonce: &[u8], key: &[u8]) -> Self {
        Self {
            message: message.to_vec(),
            nonce: nonce.to_vec(),
            key: Zeroizing::new(key.to_vec()),
        }
    }
}

/// One requested operation with exclusively owned copies of its inputs.
#[derive(Clone)]
pub enum Operation {
    Box(BoxArgs),
    BoxOpen(BoxArgs),
    DeflateBox(BoxArgs),
    InflateBoxOpen(BoxArgs),
    Sign(SignArgs),
    SignOpen(SignArgs),
    SecretBox(SecretBoxArgs),
    SecretBoxOpen(SecretBoxArgs),
}

impl Operation {
    /// Build a descriptor from positional arguments.
    pub fn from_args(kind: OpKind, args: Vec<Vec<u8>>) -> Result<Self, ArgumentError> {
        if args.len() != kind.arity() {
            return Err(ArgumentError { kind, expected: kind.arity(), actual: args.len() });
        }
        let mut it = args.into_iter();
        let mut next = || it.next().unwrap_or_default();

        let op = match kind {
            OpKind::Box | OpKind::BoxOpen | OpKind::DeflateBox | OpKind::InflateBoxOpen => {
                let args = BoxArgs {
                    message: next(),
                    nonce: next(),
                    public_key: next(),
                    secret_key: Zeroizing::new(next()),
                };
                match kind {
                    OpKind::Box        => Operation::Box(args),
                    OpKind::BoxOpen    => Operation::BoxOpen(args),
                    OpKind::DeflateBox => Operation::DeflateBox(args),
                    _                  => Operation::InflateBoxOpen(args),
                }
            }
            OpKind::Sign | OpKind::SignOpen => {
                let args = SignArgs { message: next(), key: Zeroizing::new(next()) };
                if kind == OpKind::Sign {
                    Operation::Sign(args)
                } else {
                    Operation::SignOpen(args)
                }
            }
            OpKind::SecretBox | OpKind::SecretBoxOpen => {
                let args = SecretBoxArgs {
                    message: next(),
                    nonce: next(),
                    key: Zeroizing::new(next()),
                };
                if kind == OpKind::SecretBox {
                    Operation::SecretBox(args)
                } else {
                    Operation::SecretBoxOpen(args)
                }
            }
        };
        Ok(op)
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Box(_)            => OpKind::Box,
            Operation::BoxOpen(_)        => OpKind::BoxOpen,
            Operation::DeflateBox(_)     => OpKind::DeflateBox,
            Operation::InflateBoxOpen(_) => OpKind::InflateBoxOpen,
            Operation::Sign(_)           => OpKind::Sign,
            Operation::SignOpen(_)       => OpKind::SignOpen,
            Operation::SecretBox(_)      => OpKind::SecretBox,
            Operation::SecretBoxOpen(_)  => OpKind::SecretBoxOpen,
        }
    }

    /// Length of the message/ciphertext input.
    pub fn input_len(&self) -> usize {
        match self {
            Operation::Box(a) | Operation::BoxOpen(a) | Operation::DeflateBox(a) | Operation::InflateBoxOpen(a) => {
                a.message.len()
            }
            Operation::Sign(a) | Operation::SignOpen(a) => a.message.len(),
            Operation::SecretBox(a) | Operation::SecretBoxOpen(a) => a.message.len(),
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind())
            .field("input_len", &self.input_len())
            .finish_non_exhaustive()
    }
}
