//! compression/stream.rs
//! Growable-buffer drive loop: known input, unknown output size.
//!
//! The whole input is handed to the engine up front. The output buffer starts
//! at `initial_chunk_size` and doubles whenever the engine fills it. Once the
//! input is exhausted the engine is switched to `Flush::Finish` so it emits
//! whatever state it still holds. The engine is dropped (ended) on every exit.

use crate::compression::engine::create_engine;
use crate::compression::types::{CodecError, CodecMode, CodecSettings, Flush, StepStatus, StreamEngine};

/// Output buffer state owned by one codec pass.
pub struct CodecBuffer<'a> {
    input: &'a [u8],
    consumed: usize,
    output: Vec<u8>,
    produced: usize,
    finished: bool,
}

impl<'a> CodecBuffer<'a> {
    pub fn new(input: &'a [u8], initial_chunk_size: usize) -> Result<Self, CodecError> {
        let initial = initial_chunk_size.max(1);
        let mut output = Vec::new();
        output
            .try_reserve_exact(initial)
            .map_err(|_| CodecError::Alloc { requested: initial })?;
        output.resize(initial, 0);

        Ok(Self { input, consumed: 0, output, produced: 0, finished: false })
    }

    /// Bytes currently allocated for output.
    pub fn capacity(&self) -> usize {
        self.output.len()
    }

    /// Valid output bytes written so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Double the output buffer. Bytes already written are kept in place.
    fn grow(&mut self) -> Result<(), CodecError> {
        let current = self.output.len();
        let requested = current
            .checked_mul(2)
            .ok_or(CodecError::Alloc { requested: usize::MAX })?;
        self.output
            .try_reserve_exact(requested - current)
            .map_err(|_| CodecError::Alloc { requested })?;
        self.output.resize(requested, 0);
        Ok(())
    }

    /// Step `engine` until it reports end of stream.
    ///
    /// Returns the output trimmed to exactly the bytes the engine produced.
    pub fn drive<E: StreamEngine + ?Sized>(mut self, engine: &mut E) -> Result<Vec<u8>, CodecError> {
        if self.input.is_empty() && engine.mode() == CodecMode::Decompress {
            self.output.clear();
            return Ok(self.output);
        }

        let base_in = engine.total_in();
        let base_out = engine.total_out();
        let mut flush = if self.input.is_empty() { Flush::Finish } else { Flush::None };

        while !self.finished {
            let before = (self.consumed, self.produced);
            let status = engine.step(
                &self.input[self.consumed..],
                &mut self.output[self.produced..],
                flush,
            )?;
            self.consumed = (engine.total_in() - base_in) as usize;
            self.produced = (engine.total_out() - base_out) as usize;

            if status == StepStatus::StreamEnd {
                self.finished = true;
                break;
            }
            if self.consumed >= self.input.len() {
                flush = Flush::Finish;
            }
            if self.produced == self.output.len() {
                self.grow()?;
                continue;
            }
            if (self.consumed, self.produced) == before {
                return Err(CodecError::Stalled { mode: engine.mode(), consumed: self.consumed });
            }
        }

        self.output.truncate(self.produced);
        Ok(self.output)
    }
}

/// Run one full pass of `engine` over `input`.
pub fn run_codec<E: StreamEngine + ?Sized>(
    engine: &mut E,
    input: &[u8],
    initial_chunk_size: usize,
) -> Result<Vec<u8>, CodecError> {
    CodecBuffer::new(input, initial_chunk_size)?.drive(engine)
}

/// Compress `input` into a single zlib stream.
pub fn deflate_bytes(input: &[u8], settings: &CodecSettings) -> Result<Vec<u8>, CodecError> {
    let mut engine = create_engine(CodecMode::Compress, settings.level)?;
    run_codec(engine.as_mut(), input, settings.initial_chunk_size)
}

/// Decompress a single zlib stream.
pub fn inflate_bytes(input: &[u8], settings: &CodecSettings) -> Result<Vec<u8>, CodecError> {
    let mut engine = create_engine(CodecMode::Decompress, settings.level)?;
    run_codec(engine.as_mut(), input, settings.initial_chunk_size)
}
