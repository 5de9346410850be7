//! dispatch/mod.rs
//! Request dispatch: task queues, one-shot completions and the dispatcher.
//!
//! Notes:
//! - Workers only compute. Continuations always run on the caller's context.
//! - Worker panics surface as a failure outcome on the affected request only.

pub mod queue;
pub mod completion;
pub mod dispatcher;

pub use queue::{panic_message, InlineQueue, Job, TaskQueue, WorkerPool};
pub use completion::{CompletionLoop, Continuation, Delivery, RequestId};
pub use dispatcher::Dispatcher;
