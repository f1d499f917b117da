//! Simple generic replay buffer.
use super::{BatchBase, ReplayBatch, SimpleReplayBufferConfig};
use crate::{error::DuelqError, ExperienceBufferBase, ReplayBufferBase, TransitionBatch};
use anyhow::Result;
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// A fixed-capacity, uniformly-sampled replay buffer.
///
/// Transitions are kept in parallel columns (observations, actions, next
/// observations, rewards, termination and truncation flags) backed by a
/// preallocated arena of `capacity` slots. The write position advances modulo
/// capacity, so once the buffer is full each insert silently overwrites the
/// logically oldest transition. A separate `size` field distinguishes "not
/// yet full" from "full and wrapping".
///
/// Sampling draws indices independently and uniformly at random with
/// replacement from the currently held entries and copies the selected
/// transitions out, so a sampled batch is unaffected by later evictions.
///
/// # Type Parameters
///
/// * `O` - Observation column type, implements [`BatchBase`]
/// * `A` - Action column type, implements [`BatchBase`]
pub struct SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Current insertion index.
    i: usize,

    /// Current number of stored transitions.
    size: usize,

    /// Storage for observations.
    obs: O,

    /// Storage for actions.
    act: A,

    /// Storage for next observations.
    next_obs: O,

    /// Storage for rewards.
    reward: Vec<f32>,

    /// Storage for termination flags.
    is_terminated: Vec<i8>,

    /// Storage for truncation flags.
    is_truncated: Vec<i8>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<O, A> SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    #[inline]
    fn push_reward(&mut self, i: usize, b: &[f32]) {
        let mut j = i;
        for r in b.iter() {
            self.reward[j] = *r;
            j += 1;
            if j == self.capacity {
                j = 0;
            }
        }
    }

    #[inline]
    fn push_is_terminated(&mut self, i: usize, b: &[i8]) {
        let mut j = i;
        for d in b.iter() {
            self.is_terminated[j] = *d;
            j += 1;
            if j == self.capacity {
                j = 0;
            }
        }
    }

    #[inline]
    fn push_is_truncated(&mut self, i: usize, b: &[i8]) {
        let mut j = i;
        for d in b.iter() {
            self.is_truncated[j] = *d;
            j += 1;
            if j == self.capacity {
                j = 0;
            }
        }
    }

    fn sample_reward(&self, ixs: &[usize]) -> Vec<f32> {
        ixs.iter().map(|ix| self.reward[*ix]).collect()
    }

    fn sample_is_terminated(&self, ixs: &[usize]) -> Vec<i8> {
        ixs.iter().map(|ix| self.is_terminated[*ix]).collect()
    }

    fn sample_is_truncated(&self, ixs: &[usize]) -> Vec<i8> {
        ixs.iter().map(|ix| self.is_truncated[*ix]).collect()
    }

    /// Returns the number of termination flags set in the buffer.
    pub fn num_terminated_flags(&self) -> usize {
        self.is_terminated
            .iter()
            .map(|is_terminated| *is_terminated as usize)
            .sum()
    }

    /// Returns the sum of all rewards in the buffer.
    pub fn sum_rewards(&self) -> f32 {
        self.reward.iter().sum()
    }
}

impl<O, A> ExperienceBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Item = ReplayBatch<O, A>;

    fn len(&self) -> usize {
        self.size
    }

    /// Adds transitions to the buffer, evicting the oldest entries once the
    /// buffer is at capacity.
    ///
    /// Returns [`DuelqError::ShapeMismatch`] if the observation or action
    /// shape disagrees with the shape established by the first insert. The
    /// buffer copies the data in; it never aliases caller-held storage.
    fn push(&mut self, tr: Self::Item) -> Result<()> {
        let len = tr.len();
        let (obs, act, next_obs, reward, is_terminated, is_truncated) = tr.unpack();
        self.obs.push(self.i, obs)?;
        self.act.push(self.i, act)?;
        self.next_obs.push(self.i, next_obs)?;
        self.push_reward(self.i, &reward);
        self.push_is_terminated(self.i, &is_terminated);
        self.push_is_truncated(self.i, &is_truncated);

        self.i = (self.i + len) % self.capacity;
        self.size += len;
        if self.size >= self.capacity {
            self.size = self.capacity;
        }

        Ok(())
    }
}

impl<O, A> ReplayBufferBase for SimpleReplayBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = SimpleReplayBufferConfig;
    type Batch = ReplayBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        let capacity = config.capacity;

        Self {
            capacity,
            i: 0,
            size: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: vec![0.; capacity],
            is_terminated: vec![0; capacity],
            is_truncated: vec![0; capacity],
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Samples a batch of `size` transitions uniformly at random with
    /// replacement.
    ///
    /// Sampling an empty buffer returns [`DuelqError::EmptyBuffer`].
    /// Oversampling (`size` greater than the number of held transitions) is
    /// permitted; gating sampling behind a warm-up period is the caller's
    /// responsibility.
    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if self.size == 0 {
            return Err(DuelqError::EmptyBuffer.into());
        }

        let ixs = (0..size)
            .map(|_| (self.rng.next_u32() as usize) % self.size)
            .collect::<Vec<_>>();

        Ok(Self::Batch {
            obs: self.obs.sample(&ixs),
            act: self.act.sample(&ixs),
            next_obs: self.next_obs.sample(&ixs),
            reward: self.sample_reward(&ixs),
            is_terminated: self.sample_is_terminated(&ixs),
            is_truncated: self.sample_is_truncated(&ixs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DuelqError;

    /// One-element-per-entry column used to exercise the ring semantics.
    #[derive(Debug)]
    struct ScalarColumn(Vec<f32>);

    impl BatchBase for ScalarColumn {
        fn new(capacity: usize) -> Self {
            Self(vec![0.; capacity])
        }

        fn push(&mut self, ix: usize, data: Self) -> Result<()> {
            let capacity = self.0.len();
            let mut j = ix;
            for x in data.0.iter() {
                self.0[j] = *x;
                j += 1;
                if j == capacity {
                    j = 0;
                }
            }
            Ok(())
        }

        fn sample(&self, ixs: &[usize]) -> Self {
            Self(ixs.iter().map(|ix| self.0[*ix]).collect())
        }
    }

    fn transition(v: f32) -> ReplayBatch<ScalarColumn, ScalarColumn> {
        ReplayBatch {
            obs: ScalarColumn(vec![v]),
            act: ScalarColumn(vec![0.]),
            next_obs: ScalarColumn(vec![v + 0.5]),
            reward: vec![v],
            is_terminated: vec![0],
            is_truncated: vec![0],
        }
    }

    fn build(capacity: usize) -> SimpleReplayBuffer<ScalarColumn, ScalarColumn> {
        let config = SimpleReplayBufferConfig::default().capacity(capacity);
        SimpleReplayBuffer::build(&config)
    }

    #[test]
    fn test_empty_buffer_error() {
        let mut buffer = build(3);
        let err = buffer.batch(1).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DuelqError>(),
            Some(DuelqError::EmptyBuffer)
        ));
    }

    #[test]
    fn test_oldest_eviction() {
        // capacity 3, inserts A, B, C, D: the buffer logically holds
        // {B, C, D} and sampling must never return A.
        let mut buffer = build(3);
        for v in [1., 2., 3., 4.].iter() {
            buffer.push(transition(*v)).unwrap();
        }
        assert_eq!(buffer.len(), 3);

        let batch = buffer.batch(64).unwrap();
        assert_eq!(batch.len(), 64);
        for r in batch.reward.iter() {
            assert!(*r >= 2., "evicted transition was sampled: {}", r);
        }
    }

    #[test]
    fn test_sample_returns_held_entries() {
        let mut buffer = build(10);
        for v in 0..4 {
            buffer.push(transition(v as f32)).unwrap();
        }

        let batch = buffer.batch(32).unwrap();
        assert_eq!(batch.len(), 32);
        for (r, o) in batch.reward.iter().zip(batch.obs.0.iter()) {
            assert!((0..4).any(|v| *r == v as f32));
            // columns stay aligned by index
            assert_eq!(*o, *r);
        }
    }

    #[test]
    fn test_oversampling_with_replacement() {
        let mut buffer = build(10);
        buffer.push(transition(7.)).unwrap();

        let batch = buffer.batch(5).unwrap();
        assert_eq!(batch.len(), 5);
        assert!(batch.reward.iter().all(|r| *r == 7.));
    }

    #[test]
    fn test_size_capped_at_capacity() {
        let mut buffer = build(5);
        for v in 0..17 {
            buffer.push(transition(v as f32)).unwrap();
        }
        assert_eq!(buffer.len(), 5);
        // holds exactly the 5 most recent rewards
        assert_eq!(buffer.sum_rewards(), (12..17).sum::<i32>() as f32);
    }
}
