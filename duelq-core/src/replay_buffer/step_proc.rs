//! Builds transitions from environment steps.
use super::{BatchBase, ReplayBatch};
use crate::{Env, StepProcessor};
use std::{default::Default, marker::PhantomData};

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug, Default)]
pub struct SimpleStepProcessorConfig {}

/// Builds one-step transitions `(o_t, a_t, o_t+1, r_t)` from [`Step`] objects.
///
/// The processor keeps the current observation between steps: the observation
/// that arrives with a step becomes `next_obs` of the produced transition and
/// is then adopted as the current observation for the following step, so
/// consecutive transitions within one episode overlap as required. When an
/// episode ends, the current observation is replaced by the initial
/// observation of the next episode.
///
/// [`Step`]: crate::Step
pub struct SimpleStepProcessor<E, O, A> {
    prev_obs: Option<O>,
    phantom: PhantomData<(E, A)>,
}

impl<E, O, A> StepProcessor<E> for SimpleStepProcessor<E, O, A>
where
    E: Env,
    O: BatchBase + From<E::Obs>,
    A: BatchBase + From<E::Act>,
{
    type Config = SimpleStepProcessorConfig;
    type Output = ReplayBatch<O, A>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.into());
    }

    /// Processes a step into a transition batch of length one.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::reset`] has not been called before the first step,
    /// or if the episode ended but the step carries no initial observation.
    fn process(&mut self, step: crate::Step<E>) -> Self::Output {
        let is_done = step.is_done();
        let next_obs = step.obs.clone().into();
        let obs = self
            .prev_obs
            .replace(step.obs.into())
            .expect("prev_obs is not set. Forgot to call reset()?");
        let act = step.act.into();
        let reward = vec![step.reward];
        let is_terminated = vec![step.is_terminated as i8];
        let is_truncated = vec![step.is_truncated as i8];

        if is_done {
            self.prev_obs
                .replace(step.init_obs.expect("Failed to unwrap init_obs").into());
        }

        ReplayBatch {
            obs,
            act,
            next_obs,
            reward,
            is_terminated,
            is_truncated,
        }
    }
}
