//! Transition batch.

/// A minibatch of transitions sampled from a replay buffer.
///
/// Columns are parallel ordered sequences aligned by index: the `i`-th
/// observation, action, next observation, reward and flags together form the
/// `i`-th sampled transition.
pub trait TransitionBatch {
    /// A batch of observations.
    type ObsBatch;

    /// A batch of actions.
    type ActBatch;

    /// Unpacks the batch into its columns:
    /// `(obs, act, next_obs, reward, is_terminated, is_truncated)`.
    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
        Vec<i8>,
    );

    /// Returns the number of transitions in the batch.
    fn len(&self) -> usize;

    /// Returns `true` if the batch contains no transitions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the observations.
    fn obs(&self) -> &Self::ObsBatch;

    /// Returns a reference to the actions.
    fn act(&self) -> &Self::ActBatch;
}
