//! A generic implementation of a uniform replay buffer.
//!
//! [`SimpleReplayBuffer`] stores transitions of arbitrary observation and
//! action types in a fixed-capacity ring and samples minibatches uniformly at
//! random with replacement. There is no temporal or priority weighting.
mod base;
mod batch;
mod config;
mod step_proc;
mod subbatch;
pub use base::SimpleReplayBuffer;
pub use batch::ReplayBatch;
pub use config::SimpleReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
pub use subbatch::BatchBase;
