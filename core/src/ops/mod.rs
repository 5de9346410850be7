//! ops/mod.rs
//! Operation descriptors, outcomes and the primitive invoker.

pub mod descriptor;
pub mod outcome;
pub mod invoker;

pub use descriptor::{ArgumentError, BoxArgs, OpKind, Operation, SecretBoxArgs, SignArgs};
pub use outcome::Outcome;
pub use invoker::{InvokeError, PrimitiveInvoker};
