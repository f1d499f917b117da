//! Dueling value estimator.
use super::QFunc;
use anyhow::Result;
use ndarray::{Array1, Array2, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Configuration of [`DuelingMlp`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DuelingMlpConfig {
    /// Number of elements of a flattened input observation.
    pub in_dim: usize,

    /// Width of the shared hidden layer.
    pub hidden_dim: usize,

    /// Number of actions.
    pub out_dim: usize,

    /// Random seed for weight initialization.
    pub seed: u64,
}

impl Default for DuelingMlpConfig {
    fn default() -> Self {
        Self {
            in_dim: 16,
            hidden_dim: 64,
            out_dim: 2,
            seed: 42,
        }
    }
}

impl DuelingMlpConfig {
    /// Creates a configuration with the given input and output dimensions.
    pub fn new(in_dim: usize, hidden_dim: usize, out_dim: usize) -> Self {
        Self {
            in_dim,
            hidden_dim,
            out_dim,
            seed: 42,
        }
    }

    /// Sets the output dimension (the number of actions).
    pub fn out_dim(mut self, v: usize) -> Self {
        self.out_dim = v;
        self
    }

    /// Sets the random seed for weight initialization.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }
}

/// A dueling value estimator over a shared linear feature layer.
///
/// The action values decompose into a scalar state-value term and a
/// per-action advantage term computed from shared ReLU features:
/// `q(s, a) = v(s) + adv(s, a)`. Training applies plain SGD to all
/// parameters; the learning-rate schedule lives in
/// [`Optimizer`](crate::opt::Optimizer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuelingMlp {
    w1: Array2<f32>,
    b1: Array1<f32>,
    w_v: Array1<f32>,
    b_v: f32,
    w_a: Array2<f32>,
    b_a: Array1<f32>,
}

impl DuelingMlp {
    fn init_weights(rng: &mut StdRng, rows: usize, cols: usize) -> Array2<f32> {
        let scale = (6. / (rows + cols) as f32).sqrt();
        Array2::from_shape_fn((rows, cols), |_| (rng.gen::<f32>() * 2. - 1.) * scale)
    }

    /// Shared hidden features with pre-activations.
    fn features(&self, obs: &Array2<f32>) -> (Array2<f32>, Array2<f32>) {
        let pre = obs.dot(&self.w1) + &self.b1;
        let h = pre.mapv(|z| z.max(0.));
        (pre, h)
    }

    fn q_from_features(&self, h: &Array2<f32>) -> Array2<f32> {
        let v = h.dot(&self.w_v) + self.b_v;
        let adv = h.dot(&self.w_a) + &self.b_a;
        adv + &v.insert_axis(Axis(1))
    }
}

impl QFunc for DuelingMlp {
    type Config = DuelingMlpConfig;

    fn build(config: &Self::Config) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (d, h, n) = (config.in_dim, config.hidden_dim, config.out_dim);
        Self {
            w1: Self::init_weights(&mut rng, d, h),
            b1: Array1::zeros(h),
            w_v: Self::init_weights(&mut rng, h, 1).remove_axis(Axis(1)),
            b_v: 0.,
            w_a: Self::init_weights(&mut rng, h, n),
            b_a: Array1::zeros(n),
        }
    }

    fn in_dim(&self) -> usize {
        self.w1.nrows()
    }

    fn n_actions(&self) -> usize {
        self.w_a.ncols()
    }

    fn q_values(&self, obs: &Array2<f32>) -> Array2<f32> {
        let (_, h) = self.features(obs);
        self.q_from_features(&h)
    }

    fn train_step(
        &mut self,
        obs: &Array2<f32>,
        act_mask: &Array2<f32>,
        targets: &[f32],
        lr: f32,
    ) -> f32 {
        let batch = targets.len();
        let y = Array1::from(targets.to_vec());

        let (pre, h) = self.features(obs);
        let q = self.q_from_features(&h);
        let q_sel = (&q * act_mask).sum_axis(Axis(1));
        let err = &q_sel - &y;
        let loss = err.mapv(|e| e * e).mean().unwrap_or(0.);

        // Backward pass of the squared-error loss
        let g = err.mapv(|e| 2. * e / batch as f32);
        let dq = act_mask * &g.clone().insert_axis(Axis(1));
        let dv = dq.sum_axis(Axis(1));

        let dw_a = h.t().dot(&dq);
        let db_a = dq.sum_axis(Axis(0));
        let dw_v = h.t().dot(&dv);
        let db_v = dv.sum();

        let mut dh = dq.dot(&self.w_a.t())
            + &(dv.insert_axis(Axis(1)).dot(&self.w_v.clone().insert_axis(Axis(0))));
        dh.zip_mut_with(&pre, |d, z| {
            if *z <= 0. {
                *d = 0.;
            }
        });
        let dw1 = obs.t().dot(&dh);
        let db1 = dh.sum_axis(Axis(0));

        self.w1.scaled_add(-lr, &dw1);
        self.b1.scaled_add(-lr, &db1);
        self.w_v.scaled_add(-lr, &dw_v);
        self.b_v -= lr * db_v;
        self.w_a.scaled_add(-lr, &dw_a);
        self.b_a.scaled_add(-lr, &db_a);

        loss
    }

    fn snapshot_into(&self, dst: &mut Self) {
        dst.clone_from(self);
    }

    fn save(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, self)?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let file = BufReader::new(File::open(path)?);
        *self = serde_json::from_reader(file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn model() -> DuelingMlp {
        DuelingMlp::build(&DuelingMlpConfig::new(3, 8, 2))
    }

    #[test]
    fn test_q_values_shape() {
        let m = model();
        let obs = Array2::zeros((5, 3));
        let q = m.q_values(&obs);
        assert_eq!(q.dim(), (5, 2));
    }

    #[test]
    fn test_train_step_reduces_loss() {
        let mut m = model();
        let obs = Array2::from_shape_fn((4, 3), |(i, j)| (i + j) as f32 / 4.);
        let mask = Array2::from_shape_fn((4, 2), |(i, j)| ((i % 2 == j) as i32) as f32);
        let targets = vec![1., -1., 0.5, 2.];

        let loss0 = m.train_step(&obs, &mask, &targets, 0.05);
        for _ in 0..200 {
            m.train_step(&obs, &mask, &targets, 0.05);
        }
        let loss1 = m.train_step(&obs, &mask, &targets, 0.05);
        assert!(loss1 < loss0, "loss did not decrease: {} -> {}", loss0, loss1);
    }

    #[test]
    fn test_snapshot_is_bit_for_bit() {
        let src = model();
        let mut dst = DuelingMlp::build(&DuelingMlpConfig::new(3, 8, 2).seed(7));
        assert_ne!(src, dst);

        src.snapshot_into(&mut dst);
        assert_eq!(src, dst);

        let obs = Array2::from_shape_fn((2, 3), |(i, j)| (i * 3 + j) as f32);
        assert_eq!(src.q_values(&obs), dst.q_values(&obs));
    }

    #[test]
    fn test_snapshot_is_a_copy_not_an_alias() {
        let mut online = model();
        let mut target = model();
        online.snapshot_into(&mut target);

        let obs = Array2::from_shape_fn((2, 3), |(i, j)| (i + j) as f32);
        let before = target.q_values(&obs);

        // training the online net must not show through the target
        let mask = Array2::from_shape_fn((2, 2), |(_, j)| (j == 0) as i32 as f32);
        online.train_step(&obs, &mask, &[1., 1.], 0.1);
        assert_eq!(target.q_values(&obs), before);
    }

    #[test]
    fn test_save_load_roundtrip() -> Result<()> {
        let m = model();
        let dir = TempDir::new("dueling_mlp")?;
        let path = dir.path().join("qnet.json");
        m.save(&path)?;

        let mut m2 = DuelingMlp::build(&DuelingMlpConfig::new(3, 8, 2).seed(99));
        m2.load(&path)?;
        assert_eq!(m, m2);
        Ok(())
    }
}
