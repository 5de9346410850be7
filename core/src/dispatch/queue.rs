//! dispatch/queue.rs
//! Task queues the dispatcher hands asynchronous work to.
//!
//! - `WorkerPool`: one shared crossbeam channel drained by N worker threads.
//! - `InlineQueue`: runs each job on the submitting thread (deterministic tests).

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error};

use crate::types::DispatchError;

/// One unit of background work. Runs to completion without suspending.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub trait TaskQueue: Send + Sync {
    /// Enqueue `job`. On error the job is dropped without running.
    fn submit(&self, job: Job) -> Result<(), DispatchError>;

    /// Stop accepting work and finish everything already queued.
    fn shutdown(&mut self) {}

    /// Threads executing jobs (0 for inline execution).
    fn workers(&self) -> usize;
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ---------------------------------------------------------------------------
// Worker pool
// ---------------------------------------------------------------------------

pub struct WorkerPool {
    tx: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, DispatchError> {
        let (tx, rx) = channel::unbounded::<Job>();
        let mut handles = Vec::with_capacity(workers);

        for index in 0..workers {
            let rx = rx.clone();
            let handle = thread::Builder::new()
                .name(format!("naclbox-worker-{}", index))
                .spawn(move || run_worker(index, rx))
                .map_err(|source| DispatchError::Spawn { index, source })?;
            handles.push(handle);
        }

        debug!(workers, "worker pool started");
        Ok(Self { tx: Some(tx), handles })
    }

    /// Jobs waiting for a free worker.
    pub fn queued(&self) -> usize {
        self.tx.as_ref().map_or(0, |tx| tx.len())
    }
}

/// Worker loop: exits once the queue is closed and drained.
fn run_worker(index: usize, rx: Receiver<Job>) {
    while let Ok(job) = rx.recv() {
        // Jobs built by the dispatcher catch their own panics; this keeps the
        // thread alive for anything else submitted directly.
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            error!(worker = index, panic = %panic_message(payload.as_ref()), "job panicked");
        }
    }
    debug!(worker = index, "worker stopped");
}

impl TaskQueue for WorkerPool {
    fn submit(&self, job: Job) -> Result<(), DispatchError> {
        let tx = self.tx.as_ref().ok_or(DispatchError::QueueClosed)?;
        tx.send(job).map_err(|_| DispatchError::QueueClosed)
    }

    fn shutdown(&mut self) {
        // Dropping the sender disconnects the channel once it is drained.
        if self.tx.take().is_none() {
            return;
        }
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
        debug!("worker pool shut down");
    }

    fn workers(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Inline queue
// ---------------------------------------------------------------------------

/// Runs every job immediately on the caller's thread.
#[derive(Debug, Default)]
pub struct InlineQueue {
    closed: AtomicBool,
}

impl InlineQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskQueue for InlineQueue {
    fn submit(&self, job: Job) -> Result<(), DispatchError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DispatchError::QueueClosed);
        }
        job();
        Ok(())
    }

    fn shutdown(&mut self) {
        self.closed.store(true, Ordering::Release);
    }

    fn workers(&self) -> usize {
        0
    }
}
