#![warn(missing_docs)]
//! A dueling DQN agent over [`ndarray`] for [`duelq_core`].
//!
//! This crate provides the concrete pieces that plug into the training engine
//! of `duelq-core`:
//!
//! * [`FrameStack`] and [`OneHotAct`] - observation and action types for
//!   frame-based environments with a discrete action set.
//! * [`ArrayBatch`] - columnar batch storage for both, used by the replay
//!   buffer.
//! * [`model`] - the [`QFunc`](model::QFunc) interface of value estimators
//!   and [`DuelingMlp`](model::DuelingMlp), a dueling-head implementation.
//! * [`opt`] - plain SGD with the geometric learning-rate decay schedule.
//! * [`dqn`] - the [`Dqn`](dqn::Dqn) agent: Bellman updates with terminal
//!   masking against a periodically synchronized target network, and a
//!   two-phase exploration schedule.
mod array_batch;
mod frame_stack;
mod one_hot;

pub use array_batch::ArrayBatch;
pub use frame_stack::FrameStack;
pub use one_hot::OneHotAct;

pub mod dqn;
pub mod model;
pub mod opt;
