//! DQN agent with a dueling value estimator.
mod base;
mod config;
mod explorer;
pub use base::Dqn;
pub use config::DqnConfig;
pub use explorer::TwoPhaseExplorer;
