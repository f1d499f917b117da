//! Types and traits for recording training metrics.
//!
//! * [`Record`] - a container of key-value pairs emitted during training.
//! * [`RecordValue`] - the types of values that can be stored.
//! * [`Recorder`] - the interface to an output destination for records.
//! * [`BufferedRecorder`] - a recorder that keeps records in memory.
//! * [`NullRecorder`] - a recorder that discards all records.
//!
//! The trainer emits scalar metrics like `score` and `opt_steps_per_sec`,
//! while agents emit metrics like `mean_loss` and `mean_q`. Failure to emit a
//! record is never fatal to training.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
