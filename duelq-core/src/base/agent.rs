//! Agent.
use super::{Env, Policy, ReplayBufferBase, StepCounter};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Sets the policy to training mode.
    fn train(&mut self);

    /// Sets the policy to evaluation mode.
    fn eval(&mut self);

    /// Returns if it is in training mode.
    fn is_train(&self) -> bool;

    /// Performs an optimization step.
    ///
    /// `buffer` is a replay buffer from which a minibatch of transitions is
    /// taken for updating the model parameters. Returns `None` if the agent
    /// skipped the step, e.g., because the buffer holds no transitions yet.
    ///
    /// Errors from the model evaluate/train path are propagated; the caller
    /// is expected to halt training rather than continue on garbage values.
    fn opt(&mut self, buffer: &mut R, counter: &StepCounter) -> Result<Option<Record>>;

    /// Saves the parameters of the agent in the given directory.
    ///
    /// This method commonly creates a number of files in the directory. For
    /// example, a DQN agent saves two Q-networks corresponding to the online
    /// and target networks.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
