//! Samples transitions from the environment and pushes them into a buffer.
use crate::{record::Record, Env, ExperienceBufferBase, Policy, StepCounter, StepProcessor};
use anyhow::Result;

/// Drives the interaction between a policy and an environment.
///
/// On every call to [`Sampler::sample_and_push`] the policy chooses an action
/// for the current observation, the environment applies it, and the resulting
/// step is turned into a transition by the step processor and pushed into the
/// replay buffer. The sampler keeps the current observation between calls and
/// hands episode boundaries over to the step processor.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,
    prev_obs: Option<E::Obs>,
    step_processor: P,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a sampler for the given environment and step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
        }
    }

    /// Performs one environment step and pushes the produced transition into
    /// the replay buffer.
    ///
    /// Returns the record emitted by the environment for this step.
    pub fn sample_and_push<Po, R>(
        &mut self,
        policy: &mut Po,
        buffer: &mut R,
        counter: &StepCounter,
    ) -> Result<Record>
    where
        Po: Policy<E>,
        R: ExperienceBufferBase<Item = P::Output>,
    {
        // Lazily reset the environment on the first call
        if self.prev_obs.is_none() {
            self.prev_obs = Some(self.env.reset()?);
            self.step_processor
                .reset(self.prev_obs.as_ref().unwrap().clone());
        }

        // Sample an action and apply it to the environment
        let (step, record, is_done) = {
            let act = policy.sample(self.prev_obs.as_ref().unwrap(), counter);
            let (step, record) = self.env.step_with_reset(&act);
            let is_done = step.is_done();
            (step, record, is_done)
        };

        // Adopt the new observation as the current state
        self.prev_obs = match is_done {
            true => Some(step.init_obs.clone().expect("Failed to unwrap init_obs")),
            false => Some(step.obs.clone()),
        };

        let transition = self.step_processor.process(step);
        buffer.push(transition)?;

        if is_done {
            self.step_processor
                .reset(self.prev_obs.as_ref().unwrap().clone());
        }

        Ok(record)
    }
}
