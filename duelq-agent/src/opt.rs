//! Optimizers.
use serde::{Deserialize, Serialize};

/// Configures an optimizer for training the value estimator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Plain SGD with a geometrically decaying learning rate.
    Sgd {
        /// Initial learning rate.
        lr: f64,

        /// Multiplicative decay applied every `decay_period` steps.
        decay_rate: f64,

        /// Decay period in optimization steps.
        decay_period: usize,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Sgd {
            lr: 0.000025,
            decay_rate: 0.96,
            decay_period: 10_000,
        }
    }
}

impl OptimizerConfig {
    /// Constructs an optimizer.
    pub fn build(&self) -> Optimizer {
        match self {
            Self::Sgd {
                lr,
                decay_rate,
                decay_period,
            } => Optimizer::Sgd {
                lr: *lr,
                decay_rate: *decay_rate,
                decay_period: *decay_period,
            },
        }
    }
}

/// Optimizers.
///
/// The parameter update itself is applied by the value estimator; this type
/// owns the learning-rate schedule, which is part of the training contract:
/// the rate is multiplied by `decay_rate` once every `decay_period`
/// optimization steps.
pub enum Optimizer {
    /// Plain SGD with a geometrically decaying learning rate.
    Sgd {
        /// Initial learning rate.
        lr: f64,

        /// Multiplicative decay applied every `decay_period` steps.
        decay_rate: f64,

        /// Decay period in optimization steps.
        decay_period: usize,
    },
}

impl Optimizer {
    /// The learning rate at the given optimization step.
    pub fn lr(&self, opt_steps: usize) -> f32 {
        match self {
            Self::Sgd {
                lr,
                decay_rate,
                decay_period,
            } => (lr * decay_rate.powi((opt_steps / decay_period) as i32)) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lr_decays_every_period() {
        let opt = OptimizerConfig::Sgd {
            lr: 1.0,
            decay_rate: 0.96,
            decay_period: 10_000,
        }
        .build();

        assert_eq!(opt.lr(0), 1.0);
        assert_eq!(opt.lr(9_999), 1.0);
        assert_eq!(opt.lr(10_000), 0.96);
        assert_eq!(opt.lr(19_999), 0.96);
        assert!((opt.lr(20_000) - 0.96 * 0.96).abs() < 1e-7);
    }
}
