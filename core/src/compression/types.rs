//! compression/types.rs
//! Engine-facing types for the growable codec loop.
use std::fmt;

use thiserror::Error;

/// Direction of a codec pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodecMode {
    Compress,
    Decompress,
}

impl fmt::Display for CodecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecMode::Compress   => f.write_str("deflate"),
            CodecMode::Decompress => f.write_str("inflate"),
        }
    }
}

/// Flush mode handed to the engine on each step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flush {
    /// More input may follow; the engine may hold state back.
    None,
    /// Input is exhausted; the engine must emit everything it holds.
    Finish,
}

/// What one engine step reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// Step made progress; the stream is not finished.
    Ok,
    /// Engine could not continue without more output space.
    NeedsOutput,
    /// Logical end of stream reached.
    StreamEnd,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("codec {mode} init failed: {msg}")]
    Init { mode: CodecMode, msg: String },

    #[error("codec {mode} step failed: {msg}")]
    Step { mode: CodecMode, msg: String },

    /// Engine made no progress while output space was available
    /// (e.g. truncated compressed input).
    #[error("codec {mode} stalled after {consumed} input bytes")]
    Stalled { mode: CodecMode, consumed: usize },

    #[error("codec output buffer growth to {requested} bytes failed")]
    Alloc { requested: usize },
}

/// A streaming (de)compression engine: init happens at construction, end on drop.
///
/// `step` consumes a prefix of `input` and writes a prefix of `output`. The
/// amounts are observed through the monotonic `total_in`/`total_out`
/// counters, the same way zlib's stream state reports them.
pub trait StreamEngine {
    fn mode(&self) -> CodecMode;

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<StepStatus, CodecError>;

    fn total_in(&self) -> u64;

    fn total_out(&self) -> u64;
}

/// Tunables for one codec pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodecSettings {
    pub level: u32,
    pub initial_chunk_size: usize,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            level: crate::constants::DEFAULT_COMPRESSION_LEVEL,
            initial_chunk_size: crate::constants::CODEC_CHUNK_SIZE,
        }
    }
}
