//! compression/engine.rs
//! zlib engines via flate2's low-level stream API.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::compression::types::{CodecError, CodecMode, Flush, StepStatus, StreamEngine};
use crate::constants::MAX_COMPRESSION_LEVEL;

fn map_status(status: Status) -> StepStatus {
    match status {
        Status::Ok        => StepStatus::Ok,
        Status::BufError  => StepStatus::NeedsOutput,
        Status::StreamEnd => StepStatus::StreamEnd,
    }
}

/// zlib-wrapped deflate.
pub struct ZlibDeflater {
    inner: Compress,
}

impl ZlibDeflater {
    pub fn new(level: u32) -> Result<Self, CodecError> {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(CodecError::Init {
                mode: CodecMode::Compress,
                msg: format!("level {} out of range 0..={}", level, MAX_COMPRESSION_LEVEL),
            });
        }
        Ok(Self { inner: Compress::new(Compression::new(level), true) })
    }
}

impl StreamEngine for ZlibDeflater {
    fn mode(&self) -> CodecMode {
        CodecMode::Compress
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<StepStatus, CodecError> {
        let flush = match flush {
            Flush::None   => FlushCompress::None,
            Flush::Finish => FlushCompress::Finish,
        };
        self.inner
            .compress(input, output, flush)
            .map(map_status)
            .map_err(|e| CodecError::Step { mode: CodecMode::Compress, msg: e.to_string() })
    }

    fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    fn total_out(&self) -> u64 {
        self.inner.total_out()
    }
}

/// zlib-wrapped inflate.
pub struct ZlibInflater {
    inner: Decompress,
}

impl ZlibInflater {
    pub fn new() -> Self {
        Self { inner: Decompress::new(true) }
    }
}

impl Default for ZlibInflater {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamEngine for ZlibInflater {
    fn mode(&self) -> CodecMode {
        CodecMode::Decompress
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<StepStatus, CodecError> {
        let flush = match flush {
            Flush::None   => FlushDecompress::None,
            Flush::Finish => FlushDecompress::Finish,
        };
        self.inner
            .decompress(input, output, flush)
            .map(map_status)
            .map_err(|e| CodecError::Step { mode: CodecMode::Decompress, msg: e.to_string() })
    }

    fn total_in(&self) -> u64 {
        self.inner.total_in()
    }

    fn total_out(&self) -> u64 {
        self.inner.total_out()
    }
}

/// Build the engine for `mode`. `level` only applies to compression.
pub fn create_engine(mode: CodecMode, level: u32) -> Result<Box<dyn StreamEngine + Send>, CodecError> {
    match mode {
        CodecMode::Compress   => Ok(Box::new(ZlibDeflater::new(level)?)),
        CodecMode::Decompress => Ok(Box::new(ZlibInflater::new())),
    }
}
