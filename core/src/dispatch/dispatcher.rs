//! dispatch/dispatcher.rs
//! Host-facing entry point: synchronous and asynchronous operation calls.
//!
//! Sync calls run on the caller's thread and return the outcome directly.
//! Async calls validate arity, copy the inputs into an owned `Operation`, hand
//! a job to the task queue and return a `RequestId`. The job runs the
//! operation, posts a `Delivery` to the completion channel and the caller's
//! context later runs the continuation (`run_pending` / `wait_one` / `wait_all`).
//!
//! `Ok(RequestId)` from an async call means the continuation runs exactly once.
//! `Err` means it never runs.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::compression::CodecSettings;
use crate::config::{DispatcherConfig, ResolvedConfig};
use crate::crypto::VerifyKeySource;
use crate::dispatch::completion::{CompletionLoop, Continuation, Delivery, RequestId};
use crate::dispatch::queue::{panic_message, InlineQueue, Job, TaskQueue, WorkerPool};
use crate::ops::{ArgumentError, BoxArgs, OpKind, Operation, Outcome, PrimitiveInvoker, SecretBoxArgs, SignArgs};
use crate::telemetry::{DispatchCounters, TelemetrySnapshot};
use crate::types::{DispatchError, NaclError};

pub struct Dispatcher<Q: TaskQueue = WorkerPool> {
    // Dropped first so queued jobs finish before the completion channel goes.
    queue: Q,
    invoker: Arc<PrimitiveInvoker>,
    completions: CompletionLoop,
    counters: Arc<DispatchCounters>,
    next_id: AtomicU64,
}

impl Dispatcher<WorkerPool> {
    /// Dispatcher backed by a pool of background worker threads.
    pub fn new(config: &DispatcherConfig) -> Result<Self, NaclError> {
        let resolved = config.resolve()?;
        let pool = WorkerPool::new(resolved.workers)?;
        Ok(Self::assemble(pool, resolved))
    }
}

impl Dispatcher<InlineQueue> {
    /// Dispatcher whose async jobs run during `call_async` itself.
    /// Continuations are still deferred until `run_pending`.
    pub fn inline(config: &DispatcherConfig) -> Result<Self, NaclError> {
        Self::with_queue(InlineQueue::new(), config)
    }
}

impl<Q: TaskQueue> Dispatcher<Q> {
    pub fn with_queue(queue: Q, config: &DispatcherConfig) -> Result<Self, NaclError> {
        let resolved = config.resolve()?;
        Ok(Self::assemble(queue, resolved))
    }

    fn assemble(queue: Q, resolved: ResolvedConfig) -> Self {
        let counters = Arc::new(DispatchCounters::new());
        debug!(
            workers = queue.workers(),
            level = resolved.codec.level,
            chunk = resolved.codec.initial_chunk_size,
            "dispatcher ready"
        );
        Self {
            queue,
            invoker: Arc::new(PrimitiveInvoker::new(resolved.codec)),
            completions: CompletionLoop::new(Arc::clone(&counters)),
            counters,
            next_id: AtomicU64::new(1),
        }
    }

    // -----------------------------------------------------------------------
    // Generic entry points
    // -----------------------------------------------------------------------

    /// Run `kind` on the caller's thread.
    pub fn call_sync(&self, kind: OpKind, args: Vec<Vec<u8>>) -> Result<Outcome, ArgumentError> {
        let op = self.describe(kind, args)?;
        Ok(self.run_sync(op))
    }

    pub fn run_sync(&self, op: Operation) -> Outcome {
        self.counters.record_sync_call();
        note_key_source(&op);
        let input_len = op.input_len();
        let outcome = self.invoker.invoke(op);
        self.counters.record_outcome(input_len, &outcome);
        outcome
    }

    /// Queue `kind` for a worker; `continuation` receives `(error, value)`.
    pub fn call_async<F>(&self, kind: OpKind, args: Vec<Vec<u8>>, continuation: F) -> Result<RequestId, NaclError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        let op = self.describe(kind, args)?;
        Ok(self.submit(op, Box::new(continuation))?)
    }

    pub fn submit(&self, op: Operation, continuation: Continuation) -> Result<RequestId, DispatchError> {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let kind = op.kind();
        note_key_source(&op);

        let invoker = Arc::clone(&self.invoker);
        let counters = Arc::clone(&self.counters);
        let completions = self.completions.sender();

        let job: Job = Box::new(move || {
            let input_len = op.input_len();
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| invoker.invoke(op))) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let msg = panic_message(payload.as_ref());
                    error!(request = %id, op = %kind, panic = %msg, "operation panicked");
                    counters.record_panic();
                    Outcome::failure(format!("worker panicked: {}", msg))
                }
            };
            counters.record_outcome(input_len, &outcome);
            if completions.send(Delivery::new(id, kind, outcome, continuation)).is_err() {
                warn!(request = %id, "completion channel gone; result dropped");
            }
        });

        self.counters.record_submit();
        self.queue.submit(job).map_err(|e| {
            self.counters.revoke_submit();
            warn!(request = %id, op = %kind, error = %e, "submit rejected");
            e
        })?;
        debug!(request = %id, op = %kind, "submitted");
        Ok(id)
    }

    fn describe(&self, kind: OpKind, args: Vec<Vec<u8>>) -> Result<Operation, ArgumentError> {
        Operation::from_args(kind, args).map_err(|e| {
            self.counters.record_rejection();
            warn!(op = %kind, expected = e.expected, actual = e.actual, "wrong argument count");
            e
        })
    }

    // -----------------------------------------------------------------------
    // Typed entry points
    // -----------------------------------------------------------------------

    /// Seal `message` for the holder of `public_key`, authenticated by `secret_key`.
    pub fn box_seal_sync(&self, message: &[u8], nonce: &[u8], public_key: &[u8], secret_key: &[u8]) -> Outcome {
        self.run_sync(Operation::Box(BoxArgs::new(message, nonce, public_key, secret_key)))
    }

    pub fn box_seal_async<F>(
        &self,
        message: &[u8],
        nonce: &[u8],
        public_key: &[u8],
        secret_key: &[u8],
        continuation: F,
    ) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        let op = Operation::Box(BoxArgs::new(message, nonce, public_key, secret_key));
        self.submit(op, Box::new(continuation))
    }

    pub fn box_open_sync(&self, ciphertext: &[u8], nonce: &[u8], public_key: &[u8], secret_key: &[u8]) -> Outcome {
        self.run_sync(Operation::BoxOpen(BoxArgs::new(ciphertext, nonce, public_key, secret_key)))
    }

    pub fn box_open_async<F>(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        public_key: &[u8],
        secret_key: &[u8],
        continuation: F,
    ) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        let op = Operation::BoxOpen(BoxArgs::new(ciphertext, nonce, public_key, secret_key));
        self.submit(op, Box::new(continuation))
    }

    /// zlib-compress `message`, then seal it.
    pub fn deflate_box_sync(&self, message: &[u8], nonce: &[u8], public_key: &[u8], secret_key: &[u8]) -> Outcome {
        self.run_sync(Operation::DeflateBox(BoxArgs::new(message, nonce, public_key, secret_key)))
    }

    pub fn deflate_box_async<F>(
        &self,
        message: &[u8],
        nonce: &[u8],
        public_key: &[u8],
        secret_key: &[u8],
        continuation: F,
    ) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        let op = Operation::DeflateBox(BoxArgs::new(message, nonce, public_key, secret_key));
        self.submit(op, Box::new(continuation))
    }

    /// Open, then zlib-decompress the recovered plaintext.
    pub fn inflate_box_open_sync(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        public_key: &[u8],
        secret_key: &[u8],
    ) -> Outcome {
        self.run_sync(Operation::InflateBoxOpen(BoxArgs::new(ciphertext, nonce, public_key, secret_key)))
    }

    pub fn inflate_box_open_async<F>(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        public_key: &[u8],
        secret_key: &[u8],
        continuation: F,
    ) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        let op = Operation::InflateBoxOpen(BoxArgs::new(ciphertext, nonce, public_key, secret_key));
        self.submit(op, Box::new(continuation))
    }

    pub fn sign_sync(&self, message: &[u8], secret_key: &[u8]) -> Outcome {
        self.run_sync(Operation::Sign(SignArgs::new(message, secret_key)))
    }

    pub fn sign_async<F>(&self, message: &[u8], secret_key: &[u8], continuation: F) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        self.submit(Operation::Sign(SignArgs::new(message, secret_key)), Box::new(continuation))
    }

    /// `key` is a 32-byte public key or a 64-byte secret key.
    pub fn sign_open_sync(&self, signed: &[u8], key: &[u8]) -> Outcome {
        self.run_sync(Operation::SignOpen(SignArgs::new(signed, key)))
    }

    pub fn sign_open_async<F>(&self, signed: &[u8], key: &[u8], continuation: F) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        self.submit(Operation::SignOpen(SignArgs::new(signed, key)), Box::new(continuation))
    }

    pub fn secretbox_sync(&self, message: &[u8], nonce: &[u8], key: &[u8]) -> Outcome {
        self.run_sync(Operation::SecretBox(SecretBoxArgs::new(message, nonce, key)))
    }

    pub fn secretbox_async<F>(
        &self,
        message: &[u8],
        nonce: &[u8],
        key: &[u8],
        continuation: F,
    ) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        self.submit(Operation::SecretBox(SecretBoxArgs::new(message, nonce, key)), Box::new(continuation))
    }

    pub fn secretbox_open_sync(&self, ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Outcome {
        self.run_sync(Operation::SecretBoxOpen(SecretBoxArgs::new(ciphertext, nonce, key)))
    }

    pub fn secretbox_open_async<F>(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        key: &[u8],
        continuation: F,
    ) -> Result<RequestId, DispatchError>
    where
        F: FnOnce(Option<String>, Option<Vec<u8>>) + Send + 'static,
    {
        self.submit(Operation::SecretBoxOpen(SecretBoxArgs::new(ciphertext, nonce, key)), Box::new(continuation))
    }

    // -----------------------------------------------------------------------
    // Completion side
    // -----------------------------------------------------------------------

    /// Run every continuation whose result is ready. Never blocks.
    pub fn run_pending(&self) -> usize {
        self.completions.run_pending()
    }

    pub fn wait_one(&self, timeout: Duration) -> Result<RequestId, DispatchError> {
        self.completions.wait_one(timeout)
    }

    /// Deliver until nothing is in flight.
    pub fn wait_all(&self, timeout: Duration) -> Result<usize, DispatchError> {
        self.completions.wait_all(timeout)
    }

    // -----------------------------------------------------------------------
    // Introspection and lifecycle
    // -----------------------------------------------------------------------

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.counters.snapshot()
    }

    pub fn in_flight(&self) -> u64 {
        self.counters.in_flight()
    }

    pub fn workers(&self) -> usize {
        self.queue.workers()
    }

    pub fn codec(&self) -> &CodecSettings {
        self.invoker.codec()
    }

    /// Stop the queue, finish queued work and deliver every remaining result.
    /// Returns the number of continuations run here.
    pub fn shutdown(mut self) -> usize {
        self.finish()
    }

    fn finish(&mut self) -> usize {
        self.queue.shutdown();
        let delivered = self.completions.run_pending();
        if delivered > 0 {
            debug!(delivered, "flushed deliveries on shutdown");
        }
        delivered
    }
}

impl<Q: TaskQueue> Drop for Dispatcher<Q> {
    fn drop(&mut self) {
        self.finish();
    }
}

fn note_key_source(op: &Operation) {
    if let Operation::SignOpen(args) = op {
        if args.key_source() == Some(VerifyKeySource::SecretKey) {
            warn!("sign_open given a 64-byte secret key; verifying with its public half");
        }
    }
}
