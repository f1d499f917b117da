//! Frame-stack observations.
use duelq_core::Obs;
use serde::{Deserialize, Serialize};

/// An ordered stack of the last `depth` observation frames.
///
/// The stack represents recent history for environments whose single frames
/// are not Markovian. It is stored flat, oldest frame first. An episode
/// starts with the initial frame repeated `depth` times; afterwards every
/// step drops the oldest frame and appends the newest, so the stacks of
/// consecutive steps overlap in `depth - 1` frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameStack {
    data: Vec<f32>,
    depth: usize,
    frame_len: usize,
}

impl FrameStack {
    /// Creates a stack holding `depth` copies of the given frame.
    pub fn repeat(frame: &[f32], depth: usize) -> Self {
        assert!(depth > 0, "frame stack depth must be positive");
        let frame_len = frame.len();
        let mut data = Vec::with_capacity(depth * frame_len);
        for _ in 0..depth {
            data.extend_from_slice(frame);
        }
        Self {
            data,
            depth,
            frame_len,
        }
    }

    /// Shifts the stack: drops the oldest frame and appends the given one.
    ///
    /// # Panics
    ///
    /// Panics if the frame length differs from the stack's frame length.
    pub fn append(&mut self, frame: &[f32]) {
        assert_eq!(
            frame.len(),
            self.frame_len,
            "appended frame has a different length"
        );
        self.data.copy_within(self.frame_len.., 0);
        let tail = self.data.len() - self.frame_len;
        self.data[tail..].copy_from_slice(frame);
    }

    /// Number of stacked frames.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of elements per frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// The flattened stack, oldest frame first.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl Obs for FrameStack {
    fn dummy() -> Self {
        Self {
            data: vec![],
            depth: 0,
            frame_len: 0,
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
