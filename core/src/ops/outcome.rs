//! ops/outcome.rs
//! The result of one completed operation.

/// Exactly one of success bytes or failure text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success(Vec<u8>),
    Failure(String),
}

impl Outcome {
    pub fn failure(msg: impl Into<String>) -> Self {
        Outcome::Failure(msg.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Two-slot `(error, value)` form: exactly one slot is populated.
    pub fn into_slots(self) -> (Option<String>, Option<Vec<u8>>) {
        match self {
            Outcome::Success(bytes) => (None, Some(bytes)),
            Outcome::Failure(msg)   => (Some(msg), None),
        }
    }

    pub fn into_result(self) -> Result<Vec<u8>, String> {
        match self {
            Outcome::Success(bytes) => Ok(bytes),
            Outcome::Failure(msg)   => Err(msg),
        }
    }

    /// Length of the success value; zero on failure.
    pub fn value_len(&self) -> usize {
        match self {
            Outcome::Success(bytes) => bytes.len(),
            Outcome::Failure(_)     => 0,
        }
    }
}

impl<E: std::fmt::Display> From<Result<Vec<u8>, E>> for Outcome {
    fn from(res: Result<Vec<u8>, E>) -> Self {
        match res {
            Ok(bytes) => Outcome::Success(bytes),
            Err(e)    => Outcome::Failure(e.to_string()),
        }
    }
}
