//! Core functionalities.
mod agent;
mod batch;
mod counter;
mod env;
mod policy;
mod replay_buffer;
mod step;
pub use agent::Agent;
pub use batch::TransitionBatch;
pub use counter::StepCounter;
pub use env::Env;
pub use policy::Policy;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Info, Step, StepProcessor};

/// An observation of an environment.
///
/// For frame-based environments this is typically a fixed-depth stack of the
/// most recent observation frames rather than a single frame.
pub trait Obs: Clone + Debug {
    /// Returns a dummy observation, used as a placeholder.
    fn dummy() -> Self;

    /// Returns the number of elements of the flattened observation.
    fn len(&self) -> usize;

    /// Returns `true` if the observation has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An action on an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of elements of the action.
    fn len(&self) -> usize;
}
