//! Value estimators.
mod dueling;
use anyhow::Result;
use ndarray::Array2;
use std::{fmt::Debug, path::Path};

pub use dueling::{DuelingMlp, DuelingMlpConfig};

/// A trainable state-action value estimator.
///
/// Two structurally identical instances of an implementation are held by the
/// agent: the *online* estimator that is trained, and the *target* estimator
/// that is only ever written to by [`QFunc::snapshot_into`]. The snapshot is
/// a full value-semantics copy, never a shared reference, so online updates
/// are invisible through the target until the next snapshot.
pub trait QFunc: Clone {
    /// Configuration of the estimator.
    type Config: Clone + Debug + PartialEq;

    /// Builds an estimator from the configuration.
    fn build(config: &Self::Config) -> Self;

    /// Number of elements of a flattened input observation.
    fn in_dim(&self) -> usize;

    /// Number of actions in the action set.
    fn n_actions(&self) -> usize;

    /// Evaluates a batch of observations, returning one action-value vector
    /// per row.
    fn q_values(&self, obs: &Array2<f32>) -> Array2<f32>;

    /// Performs one gradient step.
    ///
    /// For every row, the action value selected by the one-hot `act_mask` is
    /// pushed toward the corresponding scalar target by minimizing the mean
    /// squared error with learning rate `lr`. Returns the loss before the
    /// update.
    fn train_step(
        &mut self,
        obs: &Array2<f32>,
        act_mask: &Array2<f32>,
        targets: &[f32],
        lr: f32,
    ) -> f32;

    /// Overwrites every parameter of `dst` with a copy of this estimator's
    /// parameters, all-or-nothing.
    fn snapshot_into(&self, dst: &mut Self);

    /// Saves the parameters to the given file.
    fn save(&self, path: &Path) -> Result<()>;

    /// Loads the parameters from the given file.
    fn load(&mut self, path: &Path) -> Result<()>;
}
