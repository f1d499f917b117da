//! Columnar batch storage over `ndarray`.
use crate::{FrameStack, OneHotAct};
use anyhow::Result;
use duelq_core::{error::DuelqError, replay_buffer::BatchBase};
use ndarray::{Array1, Array2, Axis};

/// A column of flattened observations or one-hot actions.
///
/// Backs one column of a replay buffer: a preallocated `capacity x m` arena
/// of rows, one row per stored entry. The row width `m` is established by the
/// first insert; later inserts with a different width are rejected with
/// [`DuelqError::ShapeMismatch`]. Data is copied in on push and copied out on
/// sample, so the buffer never aliases caller-held storage.
pub struct ArrayBatch {
    buf: Array2<f32>,
    capacity: usize,
}

impl ArrayBatch {
    /// The stored rows as a 2-dimensional array (entries x elements).
    pub fn as_array(&self) -> &Array2<f32> {
        &self.buf
    }

    /// Number of elements per entry, or 0 if nothing was inserted yet.
    pub fn entry_len(&self) -> usize {
        self.buf.ncols()
    }
}

impl BatchBase for ArrayBatch {
    fn new(capacity: usize) -> Self {
        Self {
            buf: Array2::zeros((0, 0)),
            capacity,
        }
    }

    fn push(&mut self, ix: usize, data: Self) -> Result<()> {
        if data.buf.nrows() == 0 {
            return Ok(());
        }

        let m = data.buf.ncols();
        if self.buf.nrows() == 0 {
            // The first insert establishes the entry shape
            self.buf = Array2::zeros((self.capacity, m));
        } else if m != self.buf.ncols() {
            return Err(DuelqError::ShapeMismatch {
                expected: self.buf.ncols(),
                actual: m,
            }
            .into());
        }

        for (k, row) in data.buf.rows().into_iter().enumerate() {
            let j = (ix + k) % self.capacity;
            self.buf.row_mut(j).assign(&row);
        }

        Ok(())
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self {
            buf: self.buf.select(Axis(0), ixs),
            capacity: ixs.len(),
        }
    }
}

impl From<FrameStack> for ArrayBatch {
    fn from(obs: FrameStack) -> Self {
        let row = Array1::from(obs.as_slice().to_vec()).insert_axis(Axis(0));
        Self {
            buf: row,
            capacity: 1,
        }
    }
}

impl From<OneHotAct> for ArrayBatch {
    fn from(act: OneHotAct) -> Self {
        let row = Array1::from(act.to_vec()).insert_axis(Axis(0));
        Self {
            buf: row,
            capacity: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_wraps_and_samples() {
        let mut col = ArrayBatch::new(3);
        for v in 0..4 {
            let entry: ArrayBatch = FrameStack::repeat(&[v as f32], 2).into();
            col.push(v % 3, entry).unwrap();
        }

        let sampled = col.sample(&[0, 1, 2]);
        assert_eq!(sampled.as_array().row(0)[0], 3.);
        assert_eq!(sampled.as_array().row(1)[0], 1.);
        assert_eq!(sampled.as_array().row(2)[0], 2.);
    }

    #[test]
    fn test_shape_mismatch_rejected_at_insert() {
        let mut col = ArrayBatch::new(4);
        col.push(0, FrameStack::repeat(&[0.; 2], 2).into()).unwrap();

        let err = col
            .push(1, FrameStack::repeat(&[0.; 3], 2).into())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DuelqError>(),
            Some(DuelqError::ShapeMismatch {
                expected: 4,
                actual: 6
            })
        ));
    }

    #[test]
    fn test_sample_is_a_copy() {
        let mut col = ArrayBatch::new(2);
        col.push(0, FrameStack::repeat(&[5.], 1).into()).unwrap();
        let sampled = col.sample(&[0]);

        // overwrite the slot; the sampled batch must be unaffected
        col.push(0, FrameStack::repeat(&[9.], 1).into()).unwrap();
        assert_eq!(sampled.as_array()[[0, 0]], 5.);
    }
}
