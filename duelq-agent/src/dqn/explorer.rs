//! Exploration schedule of the DQN agent.
use duelq_core::StepCounter;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Index of the row maximum; ties resolve to the first maximum.
pub(crate) fn argmax(q: &Array1<f32>) -> usize {
    let mut best = 0;
    for (i, v) in q.iter().enumerate() {
        if *v > q[best] {
            best = i;
        }
    }
    best
}

/// A two-phase exploration schedule.
///
/// While fewer than `n_explore` optimization steps have been taken, the agent
/// is in the explore phase: on every `frame_per_action`-th environment tick
/// it flips a fair coin between a uniformly random action and the greedy one,
/// and on all other ticks it emits the no-op action (index 0) without
/// consulting the estimator at all. From the `n_explore`-th optimization step
/// on, every tick is greedy; the switch is one-directional.
///
/// Note this is deliberately not a decaying epsilon: the explore probability
/// is a constant 0.5 until the phase boundary, then drops to zero in one
/// step.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TwoPhaseExplorer {
    /// Number of optimization steps spent in the explore phase.
    pub n_explore: usize,

    /// In the explore phase, the estimator is consulted only on ticks
    /// divisible by this period.
    pub frame_per_action: usize,
}

impl Default for TwoPhaseExplorer {
    fn default() -> Self {
        Self {
            n_explore: 10_000,
            frame_per_action: 4,
        }
    }
}

impl TwoPhaseExplorer {
    /// Constructs the explorer.
    pub fn new(n_explore: usize, frame_per_action: usize) -> Self {
        Self {
            n_explore,
            frame_per_action,
        }
    }

    /// Selects an action index for the current step.
    ///
    /// `q_values` is evaluated lazily; on frame-skipped ticks of the explore
    /// phase the estimator is never consulted.
    pub fn action<F>(&self, counter: &StepCounter, n_actions: usize, q_values: F) -> usize
    where
        F: FnOnce() -> Array1<f32>,
    {
        if counter.opt_steps < self.n_explore {
            if counter.env_steps % self.frame_per_action == 0 {
                if fastrand::f32() <= 0.5 {
                    fastrand::usize(..n_actions)
                } else {
                    argmax(&q_values())
                }
            } else {
                // no-op on skipped frames
                0
            }
        } else {
            argmax(&q_values())
        }
    }
}
