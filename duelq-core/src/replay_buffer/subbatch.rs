//! Columnar storage of observation and action batches.
use anyhow::Result;

/// A growable column of observations or actions with ring-buffer semantics.
///
/// Implementations back one column of a [`SimpleReplayBuffer`]: a
/// preallocated arena of `capacity` fixed-size slots, written at an index
/// that the buffer advances modulo capacity.
///
/// [`SimpleReplayBuffer`]: super::SimpleReplayBuffer
pub trait BatchBase {
    /// Creates a new column with the given number of slots.
    fn new(capacity: usize) -> Self;

    /// Writes `data` starting at slot `ix`, wrapping around at capacity.
    ///
    /// Returns an error if the shape of `data` entries disagrees with the
    /// shape this column was established with; the caller must reject the
    /// whole transition in that case.
    fn push(&mut self, ix: usize, data: Self) -> Result<()>;

    /// Copies out the entries at the given slots as a new batch.
    ///
    /// The returned batch owns its data; evictions in the source column after
    /// this call do not affect it.
    fn sample(&self, ixs: &[usize]) -> Self;
}
