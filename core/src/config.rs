//! config.rs
//! Dispatcher configuration.
//!
//! Every field is optional; `None` falls back to the defaults in `constants`.
//! `resolve()` validates and produces the concrete settings the dispatcher uses.

use serde::{Deserialize, Serialize};

use crate::compression::CodecSettings;
use crate::constants::{CODEC_CHUNK_SIZE, DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL, MAX_WORKERS};
use crate::types::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Background worker threads.
    /// - `None` → one per logical CPU.
    pub workers: Option<usize>,

    /// zlib level (0..=9) for the deflate stage.
    pub compression_level: Option<u32>,

    /// Initial codec output buffer in bytes.
    pub initial_chunk_size: Option<usize>,
}

/// Validated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub workers: usize,
    pub codec: CodecSettings,
}

impl DispatcherConfig {
    pub fn new(workers: Option<usize>, compression_level: Option<u32>) -> Self {
        Self { workers, compression_level, initial_chunk_size: None }
    }

    /// Single worker; useful when ordering of log output matters.
    pub fn single_worker() -> Self {
        Self { workers: Some(1), ..Self::default() }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let workers = match self.workers {
            Some(0) => return Err(ConfigError::Invalid("workers must be at least 1".into())),
            Some(n) => n.min(MAX_WORKERS),
            None => num_cpus::get().clamp(1, MAX_WORKERS),
        };

        let level = self.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL);
        if level > MAX_COMPRESSION_LEVEL {
            return Err(ConfigError::Invalid(format!(
                "compression_level {} out of range 0..={}",
                level, MAX_COMPRESSION_LEVEL
            )));
        }

        let initial_chunk_size = self.initial_chunk_size.unwrap_or(CODEC_CHUNK_SIZE);
        if initial_chunk_size == 0 {
            return Err(ConfigError::Invalid("initial_chunk_size must be > 0".into()));
        }

        Ok(ResolvedConfig {
            workers,
            codec: CodecSettings { level, initial_chunk_size },
        })
    }
}
