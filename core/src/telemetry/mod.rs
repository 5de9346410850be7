//! telemetry/mod.rs
//! Dispatcher counters and immutable snapshots.
//!
//! Counters are shared by the caller's context and every worker, so they are
//! plain atomics. A snapshot is a point-in-time copy safe to serialize.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
