//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum DuelqError {
    /// Tried to sample a minibatch from a replay buffer that holds no
    /// transitions. Callers are expected to gate sampling behind a warm-up
    /// period; hitting this error means the gate is broken.
    #[error("Cannot sample from an empty replay buffer")]
    EmptyBuffer,

    /// A transition pushed into a replay buffer disagrees with the shape
    /// established by the first insert.
    #[error("Transition shape mismatch: expected {expected}, got {actual} elements")]
    ShapeMismatch {
        /// Number of elements per entry established at the first insert.
        expected: usize,
        /// Number of elements per entry of the rejected transition.
        actual: usize,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
