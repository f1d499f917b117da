//! Evaluate a [`Policy`].
use crate::{Env, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluates a [`Policy`].
///
/// The caller is responsible for the mode of the policy: an agent is expected
/// to be switched to evaluation mode before `evaluate` and back afterwards.
pub trait Evaluator<E: Env, P: Policy<E>> {
    /// Evaluates the policy and returns a scalar score, typically the mean
    /// episode return.
    fn evaluate(&mut self, policy: &mut P) -> Result<f32>;
}
