//! telemetry/counters.rs
//! Live counters updated while requests flow through the dispatcher.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ops::Outcome;
use crate::telemetry::snapshot::TelemetrySnapshot;

#[derive(Debug, Default)]
pub struct DispatchCounters {
    sync_calls: AtomicU64,
    async_submitted: AtomicU64,
    async_delivered: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    rejected: AtomicU64,
    worker_panics: AtomicU64,
    bytes_in: AtomicU64,
    bytes_out: AtomicU64,
}

impl DispatchCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sync_call(&self) {
        self.sync_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Counted before the job is queued so a delivery can never outrun it.
    pub fn record_submit(&self) {
        self.async_submitted.fetch_add(1, Ordering::AcqRel);
    }

    /// Undo `record_submit` for a job the queue refused.
    pub fn revoke_submit(&self) {
        self.async_submitted.fetch_sub(1, Ordering::AcqRel);
    }

    /// A continuation ran on the caller's context.
    pub fn record_delivery(&self) {
        self.async_delivered.fetch_add(1, Ordering::AcqRel);
    }

    /// Wrong arity; nothing ran.
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_panic(&self) {
        self.worker_panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one finished invocation.
    /// - `input_len`: message/ciphertext bytes handed in
    pub fn record_outcome(&self, input_len: usize, outcome: &Outcome) {
        self.bytes_in.fetch_add(input_len as u64, Ordering::Relaxed);
        if outcome.is_success() {
            self.successes.fetch_add(1, Ordering::Relaxed);
            self.bytes_out.fetch_add(outcome.value_len() as u64, Ordering::Relaxed);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Submitted but not yet delivered.
    pub fn in_flight(&self) -> u64 {
        let submitted = self.async_submitted.load(Ordering::Acquire);
        let delivered = self.async_delivered.load(Ordering::Acquire);
        submitted.saturating_sub(delivered)
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            sync_calls: self.sync_calls.load(Ordering::Relaxed),
            async_submitted: self.async_submitted.load(Ordering::Relaxed),
            async_delivered: self.async_delivered.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            worker_panics: self.worker_panics.load(Ordering::Relaxed),
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            bytes_out: self.bytes_out.load(Ordering::Relaxed),
        }
    }
}
