//! Transition batch over generic observation and action columns.
use super::BatchBase;
use crate::TransitionBatch;

/// A batch of transitions with columnar storage.
///
/// Produced both by step processors (as a batch of length one, pushed into a
/// replay buffer) and by [`SimpleReplayBuffer::batch`] (as a sampled
/// minibatch). Columns are parallel sequences aligned by index.
///
/// [`SimpleReplayBuffer::batch`]: super::SimpleReplayBuffer
#[derive(Debug)]
pub struct ReplayBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Observations before the action was taken.
    pub obs: O,

    /// Actions.
    pub act: A,

    /// Observations after the action was taken.
    pub next_obs: O,

    /// Rewards.
    pub reward: Vec<f32>,

    /// Episode termination flags.
    pub is_terminated: Vec<i8>,

    /// Episode truncation flags.
    pub is_truncated: Vec<i8>,
}

impl<O, A> TransitionBatch for ReplayBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type ObsBatch = O;
    type ActBatch = A;

    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
        Vec<i8>,
    ) {
        (
            self.obs,
            self.act,
            self.next_obs,
            self.reward,
            self.is_terminated,
            self.is_truncated,
        )
    }

    fn len(&self) -> usize {
        self.reward.len()
    }

    fn obs(&self) -> &Self::ObsBatch {
        &self.obs
    }

    fn act(&self) -> &Self::ActBatch {
        &self.act
    }
}
