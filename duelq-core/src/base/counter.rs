//! Step counters of the training loop.

/// Step counters owned by the training loop and passed by reference into the
/// agent.
///
/// Two distinct counters with different increment triggers:
///
/// * `env_steps` -- the *time step*, incremented once per environment tick.
///   It gates the warm-up period, the frame-skip decision of the exploration
///   schedule, and the target-network synchronization cadence.
/// * `opt_steps` -- the *global step*, incremented once per completed
///   optimization step. It drives the learning-rate decay and the
///   explore/exploit phase boundary.
///
/// The two must not be conflated; they are kept in one struct only so that a
/// single context reference can be threaded through [`Policy::sample`] and
/// [`Agent::opt`].
///
/// [`Policy::sample`]: crate::Policy::sample
/// [`Agent::opt`]: crate::Agent::opt
#[derive(Clone, Copy, Debug, Default)]
pub struct StepCounter {
    /// Environment ticks so far (the time step).
    pub env_steps: usize,

    /// Completed optimization steps so far (the global step).
    pub opt_steps: usize,
}

impl StepCounter {
    /// Creates counters with both steps at zero.
    pub fn new() -> Self {
        Self::default()
    }
}
