//! types.rs
//! Crate-wide error types.
//!
//! Operation failures (codec or primitive) never appear here at runtime: they
//! are folded into `Outcome::Failure` by the invoker. `NaclError` covers what
//! is raised synchronously to the caller: argument, config and dispatch errors.

use std::io;

use thiserror::Error;

use crate::compression::CodecError;
use crate::crypto::PrimitiveError;
use crate::ops::ArgumentError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Queue shut down; the task (and its continuation) was dropped undelivered.
    #[error("worker queue is closed")]
    QueueClosed,

    #[error("failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("timed out with {pending} request(s) still in flight")]
    Timeout { pending: u64 },
}

/// Unified error enabling `?` across config, dispatch and operation layers.
#[derive(Debug, Error)]
pub enum NaclError {
    #[error("argument error: {0}")]
    Argument(#[from] ArgumentError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("primitive error: {0}")]
    Primitive(#[from] PrimitiveError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
