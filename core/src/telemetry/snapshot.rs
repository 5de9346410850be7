//! telemetry/snapshot.rs
//! Point-in-time copy of the dispatcher counters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub sync_calls: u64,
    pub async_submitted: u64,
    pub async_delivered: u64,
    pub successes: u64,
    pub failures: u64,
    pub rejected: u64,
    pub worker_panics: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl TelemetrySnapshot {
    pub fn in_flight(&self) -> u64 {
        self.async_submitted.saturating_sub(self.async_delivered)
    }

    /// Invocations that produced an outcome (sync or async).
    pub fn completed(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn failure_ratio(&self) -> f64 {
        let done = self.completed();
        if done == 0 {
            0.0
        } else {
            self.failures as f64 / done as f64
        }
    }

    /// Invariants between the counters.
    pub fn sanity_check(&self) -> bool {
        self.async_delivered <= self.async_submitted
            && self.completed() >= self.async_delivered
            && self.worker_panics <= self.failures
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
