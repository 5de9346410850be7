//! dispatch/completion.rs
//! One-shot continuations and their delivery on the caller's context.
//!
//! A worker never calls a continuation itself. It posts a `Delivery` to the
//! completion channel and the caller's context runs it from `run_pending` or
//! `wait_one`. `Continuation` is `FnOnce` and moved into the delivery, so it
//! can run at most once and is dropped right after.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use tracing::debug;

use crate::constants::WAIT_SLICE;
use crate::ops::{OpKind, Outcome};
use crate::telemetry::DispatchCounters;
use crate::types::DispatchError;

/// Two-slot callback: `(error, value)` with exactly one slot populated.
pub type Continuation = Box<dyn FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static>;

/// Identifier assigned to each asynchronous request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished request waiting to be handed to its continuation.
pub struct Delivery {
    pub id: RequestId,
    pub kind: OpKind,
    outcome: Outcome,
    continuation: Continuation,
}

impl Delivery {
    pub fn new(id: RequestId, kind: OpKind, outcome: Outcome, continuation: Continuation) -> Self {
        Self { id, kind, outcome, continuation }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Invoke the continuation, consuming both it and the outcome.
    pub fn deliver(self) {
        let (err, value) = self.outcome.into_slots();
        (self.continuation)(err, value);
    }
}

impl fmt::Debug for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delivery")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("success", &self.outcome.is_success())
            .finish_non_exhaustive()
    }
}

/// Caller-side end of the completion channel.
pub struct CompletionLoop {
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    counters: Arc<DispatchCounters>,
}

impl CompletionLoop {
    pub fn new(counters: Arc<DispatchCounters>) -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx, counters }
    }

    /// Handle given to each task so it can post its delivery.
    pub fn sender(&self) -> Sender<Delivery> {
        self.tx.clone()
    }

    /// Deliveries posted but not yet run.
    pub fn ready(&self) -> usize {
        self.rx.len()
    }

    fn deliver(&self, delivery: Delivery) -> RequestId {
        let id = delivery.id;
        debug!(request = %id, op = %delivery.kind, success = delivery.outcome.is_success(), "delivering");
        self.counters.record_delivery();
        delivery.deliver();
        id
    }

    /// Run every delivery that is ready now. Never blocks.
    pub fn run_pending(&self) -> usize {
        let mut delivered = 0;
        while let Ok(delivery) = self.rx.try_recv() {
            self.deliver(delivery);
            delivered += 1;
        }
        delivered
    }

    /// Block until one delivery is ready, then run it.
    pub fn wait_one(&self, timeout: Duration) -> Result<RequestId, DispatchError> {
        match self.rx.recv_timeout(timeout) {
            Ok(delivery) => Ok(self.deliver(delivery)),
            Err(RecvTimeoutError::Timeout) => Err(DispatchError::Timeout { pending: self.counters.in_flight() }),
            Err(RecvTimeoutError::Disconnected) => Err(DispatchError::QueueClosed),
        }
    }

    /// Run deliveries until nothing is in flight or `timeout` elapses.
    ///
    /// Other threads may take deliveries concurrently, so the receive is
    /// sliced and `in_flight` re-read after every slice.
    pub fn wait_all(&self, timeout: Duration) -> Result<usize, DispatchError> {
        let deadline = Instant::now() + timeout;
        let mut delivered = self.run_pending();

        while self.counters.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(DispatchError::Timeout { pending: self.counters.in_flight() });
            }
            match self.rx.recv_timeout(remaining.min(WAIT_SLICE)) {
                Ok(delivery) => {
                    self.deliver(delivery);
                    delivered += 1;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(DispatchError::QueueClosed),
            }
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn delivery_runs_continuation_with_two_slots() {
        let counters = Arc::new(DispatchCounters::new());
        let completions = CompletionLoop::new(Arc::clone(&counters));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for (i, outcome) in [Outcome::Success(vec![9]), Outcome::failure("nope")].into_iter().enumerate() {
            let seen = Arc::clone(&seen);
            let delivery = Delivery::new(
                RequestId(i as u64),
                OpKind::Box,
                outcome,
                Box::new(move |err, value| seen.lock().unwrap().push((err, value))),
            );
            completions.sender().send(delivery).unwrap();
        }

        assert_eq!(completions.ready(), 2);
        assert_eq!(completions.run_pending(), 2);
        assert_eq!(completions.run_pending(), 0);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], (None, Some(vec![9])));
        assert_eq!(seen[1], (Some("nope".to_string()), None));
    }

    #[test]
    fn wait_all_returns_when_another_thread_takes_the_delivery() {
        let counters = Arc::new(DispatchCounters::new());
        let completions = CompletionLoop::new(Arc::clone(&counters));
        counters.record_submit();

        std::thread::scope(|s| {
            let waiter = s.spawn(|| {
                let started = Instant::now();
                (completions.wait_all(Duration::from_secs(10)), started.elapsed())
            });
            // Let the waiter block first, then deliver from this thread.
            std::thread::sleep(Duration::from_millis(50));
            let delivery = Delivery::new(RequestId(1), OpKind::Sign, Outcome::Success(Vec::new()), Box::new(|_: Option<String>, _: Option<Vec<u8>>| {}));
            completions.sender().send(delivery).unwrap();

            // Either thread may win the delivery; both must see nothing in flight.
            let mine = completions.wait_all(Duration::from_secs(10)).unwrap();
            let (theirs, elapsed) = waiter.join().unwrap();
            assert_eq!(mine + theirs.unwrap(), 1);
            assert!(elapsed < Duration::from_secs(5), "waiter blocked for {:?}", elapsed);
        });
        assert_eq!(counters.in_flight(), 0);
    }

    #[test]
    fn wait_one_times_out_when_idle() {
        let completions = CompletionLoop::new(Arc::new(DispatchCounters::new()));
        let err = completions.wait_one(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, DispatchError::Timeout { pending: 0 }));
    }
}
