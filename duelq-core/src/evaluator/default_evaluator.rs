//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{Env, Policy, StepCounter};
use anyhow::Result;

/// Runs a fixed number of episodes and averages the episode returns.
///
/// Each episode resets the environment with the episode index, so evaluation
/// runs are reproducible across calls.
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment used for evaluation.
    env: E,
}

impl<E: Env, P: Policy<E>> Evaluator<E, P> for DefaultEvaluator<E> {
    fn evaluate(&mut self, policy: &mut P) -> Result<f32> {
        let mut r_total = 0f32;
        // Counters are irrelevant in evaluation mode, where action selection
        // is greedy regardless of schedule state.
        let counter = StepCounter::new();

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            loop {
                let act = policy.sample(&prev_obs, &counter);
                let (step, _) = self.env.step(&act);
                r_total += step.reward;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        Ok(r_total / self.n_episodes as f32)
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// * `config` - Configuration of the evaluation environment.
    /// * `seed` - Random seed for the environment.
    /// * `n_episodes` - Number of episodes run per evaluation.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }
}
