//! Policy.
use super::{Env, StepCounter};

/// A policy on an environment.
///
/// A policy is a mapping from an observation to an action. The mapping can be
/// either deterministic or stochastic. The step counters of the training loop
/// are passed in so that schedules depending on them, like frame-skipped
/// exploration, can be implemented without hidden global state.
pub trait Policy<E: Env> {
    /// Configuration of the policy.
    type Config: Clone;

    /// Builds the policy.
    fn build(config: Self::Config) -> Self;

    /// Samples an action given an observation.
    fn sample(&mut self, obs: &E::Obs, counter: &StepCounter) -> E::Act;
}
