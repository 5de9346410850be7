//! ops/invoker.rs
//! Runs one operation to completion on the current thread.
//!
//! Two-stage variants are explicit pipelines: the second stage only runs when
//! the first succeeded. Every error is folded into the returned `Outcome`.

use thiserror::Error;
use zeroize::Zeroizing;

use crate::compression::{deflate_bytes, inflate_bytes, CodecError, CodecSettings};
use crate::constants::{DEFLATE_FAILED, INFLATE_FAILED};
use crate::crypto::{public_box, secret_box, sign, PrimitiveError};
use crate::ops::descriptor::{BoxArgs, Operation};
use crate::ops::outcome::Outcome;

/// Failure of a single invocation, before flattening into an `Outcome`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("{}", DEFLATE_FAILED)]
    Deflate(#[source] CodecError),

    #[error("{}", INFLATE_FAILED)]
    Inflate(#[source] CodecError),

    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

#[derive(Clone, Debug, Default)]
pub struct PrimitiveInvoker {
    codec: CodecSettings,
    /// Kind whose invocation panics; lets tests reach the worker fault path.
    #[cfg(test)]
    panic_on: Option<crate::ops::descriptor::OpKind>,
}

impl PrimitiveInvoker {
    pub fn new(codec: CodecSettings) -> Self {
        Self {
            codec,
            #[cfg(test)]
            panic_on: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn panicking_on(kind: crate::ops::descriptor::OpKind) -> Self {
        Self { panic_on: Some(kind), ..Self::default() }
    }

    pub fn codec(&self) -> &CodecSettings {
        &self.codec
    }

    /// Run `op` and consume it; key material is wiped when it drops here.
    pub fn invoke(&self, op: Operation) -> Outcome {
        #[cfg(test)]
        if self.panic_on == Some(op.kind()) {
            panic!("{} blew up", op.kind());
        }
        self.execute(&op).into()
    }

    pub fn execute(&self, op: &Operation) -> Result<Vec<u8>, InvokeError> {
        match op {
            Operation::Box(a)            => Ok(seal_box(&a.message, a)?),
            Operation::BoxOpen(a)        => Ok(open_box(a)?),
            Operation::DeflateBox(a)     => self.deflate(&a.message).and_then(|packed| Ok(seal_box(&packed, a)?)),
            Operation::InflateBoxOpen(a) => open_box(a)
                .map(Zeroizing::new)
                .map_err(InvokeError::from)
                .and_then(|plain| self.inflate(&plain)),
            Operation::Sign(a)           => Ok(sign::sign(&a.message, &a.key)?),
            Operation::SignOpen(a)       => Ok(sign::sign_open(&a.message, &a.key)?),
            Operation::SecretBox(a)      => Ok(secret_box::seal(&a.message, &a.nonce, &a.key)?),
            Operation::SecretBoxOpen(a)  => Ok(secret_box::open(&a.message, &a.nonce, &a.key)?),
        }
    }

    fn deflate(&self, input: &[u8]) -> Result<Vec<u8>, InvokeError> {
        deflate_bytes(input, &self.codec).map_err(InvokeError::Deflate)
    }

    fn inflate(&self, input: &[u8]) -> Result<Vec<u8>, InvokeError> {
        inflate_bytes(input, &self.codec).map_err(InvokeError::Inflate)
    }
}

fn seal_box(message: &[u8], a: &BoxArgs) -> Result<Vec<u8>, PrimitiveError> {
    public_box::seal(message, &a.nonce, &a.public_key, &a.secret_key)
}

fn open_box(a: &BoxArgs) -> Result<Vec<u8>, PrimitiveError> {
    public_box::open(&a.message, &a.nonce, &a.public_key, &a.secret_key)
}
