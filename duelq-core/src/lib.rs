#![warn(missing_docs)]
//! Backend-agnostic building blocks for value-based reinforcement learning
//! with experience replay.
//!
//! This crate provides the abstractions an agent implementation is built on:
//!
//! * [`Env`], [`Obs`], [`Act`] and [`Step`] describe the interaction with an
//!   environment.
//! * [`Policy`] and [`Agent`] describe trainable policies.
//! * [`ExperienceBufferBase`] and [`ReplayBufferBase`] describe transition
//!   stores, with [`SimpleReplayBuffer`] as the uniform-sampling ring-buffer
//!   implementation.
//! * [`Trainer`] drives the training loop: environment interaction, warm-up
//!   gating, optimization steps, evaluation and checkpointing.
//! * [`record`] contains a small metrics system used by the trainer and
//!   agents.
//!
//! [`SimpleReplayBuffer`]: replay_buffer::SimpleReplayBuffer
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step, StepCounter,
    StepProcessor, TransitionBatch,
};

mod trainer;
pub use trainer::{Sampler, Trainer, TrainerConfig};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};
