//! One-hot actions.
use duelq_core::Act;
use serde::{Deserialize, Serialize};

/// A discrete action encoded as a one-hot vector over the action set.
///
/// By convention index 0 is the environment's no-op action; the exploration
/// schedule emits it on frame-skipped ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotAct {
    index: usize,
    n_actions: usize,
}

impl OneHotAct {
    /// Creates a one-hot action with the given component set.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn new(index: usize, n_actions: usize) -> Self {
        assert!(index < n_actions, "action index out of range");
        Self { index, n_actions }
    }

    /// The no-op action (index 0).
    pub fn no_op(n_actions: usize) -> Self {
        Self::new(0, n_actions)
    }

    /// The index of the set component.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The number of actions in the action set.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// The one-hot vector, used as a selection mask in the Bellman update.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut v = vec![0.; self.n_actions];
        v[self.index] = 1.;
        v
    }
}

impl Act for OneHotAct {
    fn len(&self) -> usize {
        self.n_actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_mask() {
        let a = OneHotAct::new(2, 4);
        assert_eq!(a.to_vec(), vec![0., 0., 1., 0.]);
        assert_eq!(OneHotAct::no_op(4).index(), 0);
    }
}
