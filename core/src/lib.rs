//! naclbox-core
//!
//! NaCl box, secretbox and sign operations behind a dispatcher that runs
//! them either on the caller's thread or on a pool of background workers,
//! with optional zlib compression in front of the public-key box.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod config;

// Operation layers
pub mod compression;
pub mod crypto;
pub mod ops;

// Execution
pub mod dispatch;
pub mod telemetry;

pub use config::DispatcherConfig;
pub use crypto::{box_keypair, sign_keypair, KeyPair};
pub use dispatch::{Dispatcher, RequestId};
pub use ops::{OpKind, Outcome};
pub use types::NaclError;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::DispatcherConfig;
    pub use crate::constants::*;
    pub use crate::crypto::{box_keypair, sign_keypair, KeyPair};
    pub use crate::dispatch::{Dispatcher, InlineQueue, RequestId, TaskQueue, WorkerPool};
    pub use crate::ops::{OpKind, Operation, Outcome};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{DispatchError, NaclError};
}
