//! DQN agent.
use super::{config::DqnConfig, explorer::argmax, explorer::TwoPhaseExplorer};
use crate::{model::QFunc, opt::Optimizer, ArrayBatch, OneHotAct};
use anyhow::Result;
use duelq_core::{
    record::{Record, RecordValue::Scalar},
    replay_buffer::ReplayBatch,
    Agent, Env, Policy, ReplayBufferBase, StepCounter, TransitionBatch,
};
use ndarray::Array2;
use std::{fs, marker::PhantomData, path::Path};

/// Computes the Bellman regression targets for a sampled minibatch.
///
/// For terminal transitions the target is the raw reward, with no bootstrap
/// term: whatever the target estimator produced for that row is ignored, so
/// value estimates never leak across an episode boundary. For all other
/// transitions the target is `reward + gamma * max(q_tgt)`.
fn bellman_targets(
    q_tgt: &Array2<f32>,
    reward: &[f32],
    is_terminated: &[i8],
    gamma: f32,
) -> Vec<f32> {
    reward
        .iter()
        .zip(is_terminated.iter())
        .enumerate()
        .map(|(i, (r, t))| {
            if *t == 1 {
                *r
            } else {
                let max = q_tgt
                    .row(i)
                    .iter()
                    .cloned()
                    .fold(f32::NEG_INFINITY, f32::max);
                r + gamma * max
            }
        })
        .collect()
}

/// A value-based agent with experience replay and a frozen target estimator.
///
/// The agent owns two structurally identical value estimators: the *online*
/// one, updated by every optimization step, and the *target* one, used only
/// to compute Bellman targets and overwritten with a snapshot of the online
/// parameters every `sync_interval` environment ticks. Action selection
/// follows the two-phase schedule of [`TwoPhaseExplorer`] in training mode
/// and is plain greedy in evaluation mode.
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: QFunc,
    R: ReplayBufferBase<Batch = ReplayBatch<ArrayBatch, ArrayBatch>>,
    E::Obs: Into<ArrayBatch>,
    E::Act: From<OneHotAct>,
{
    pub(in crate::dqn) qnet: Q,
    pub(in crate::dqn) qnet_tgt: Q,
    pub(in crate::dqn) opt: Optimizer,
    pub(in crate::dqn) batch_size: usize,
    pub(in crate::dqn) discount_factor: f32,
    pub(in crate::dqn) sync_interval: usize,
    pub(in crate::dqn) explorer: TwoPhaseExplorer,
    pub(in crate::dqn) train: bool,
    pub(in crate::dqn) phantom: PhantomData<(E, R)>,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: QFunc,
    R: ReplayBufferBase<Batch = ReplayBatch<ArrayBatch, ArrayBatch>>,
    E::Obs: Into<ArrayBatch>,
    E::Act: From<OneHotAct>,
{
    /// Samples a minibatch and performs one optimization step of the online
    /// estimator toward the Bellman targets.
    fn update_critic(&mut self, buffer: &mut R, counter: &StepCounter) -> Result<Record> {
        let batch = buffer.batch(self.batch_size)?;
        let (obs, act, next_obs, reward, is_terminated, _) = batch.unpack();

        let q_tgt = self.qnet_tgt.q_values(next_obs.as_array());
        let targets = bellman_targets(&q_tgt, &reward, &is_terminated, self.discount_factor);

        let mean_q = self
            .qnet
            .q_values(obs.as_array())
            .mean()
            .unwrap_or(0.);
        let lr = self.opt.lr(counter.opt_steps);
        let loss = self
            .qnet
            .train_step(obs.as_array(), act.as_array(), &targets, lr);

        Ok(Record::from_slice(&[
            ("mean_loss", Scalar(loss)),
            ("mean_q", Scalar(mean_q)),
        ]))
    }

    /// Overwrites the target estimator with the online parameters when the
    /// tick counter is an exact multiple of the synchronization cadence.
    fn maybe_sync(&mut self, counter: &StepCounter) {
        if counter.env_steps % self.sync_interval == 0 {
            self.qnet.snapshot_into(&mut self.qnet_tgt);
        }
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: QFunc,
    R: ReplayBufferBase<Batch = ReplayBatch<ArrayBatch, ArrayBatch>>,
    E::Obs: Into<ArrayBatch>,
    E::Act: From<OneHotAct>,
{
    type Config = DqnConfig<Q>;

    fn build(config: Self::Config) -> Self {
        let qnet = Q::build(&config.model_config);
        let qnet_tgt = qnet.clone();

        Self {
            qnet,
            qnet_tgt,
            opt: config.opt_config.build(),
            batch_size: config.batch_size,
            discount_factor: config.discount_factor as f32,
            sync_interval: config.sync_interval,
            explorer: config.explorer,
            train: config.train,
            phantom: PhantomData,
        }
    }

    fn sample(&mut self, obs: &E::Obs, counter: &StepCounter) -> E::Act {
        let obs: ArrayBatch = obs.clone().into();
        let n_actions = self.qnet.n_actions();
        let qnet = &self.qnet;
        let q_row = || qnet.q_values(obs.as_array()).row(0).to_owned();

        let ix = if self.train {
            self.explorer.action(counter, n_actions, q_row)
        } else {
            argmax(&q_row())
        };

        OneHotAct::new(ix, n_actions).into()
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: QFunc,
    R: ReplayBufferBase<Batch = ReplayBatch<ArrayBatch, ArrayBatch>>,
    E::Obs: Into<ArrayBatch>,
    E::Act: From<OneHotAct>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut R, counter: &StepCounter) -> Result<Option<Record>> {
        let record = self.update_critic(buffer, counter)?;
        self.maybe_sync(counter);
        Ok(Some(record))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(&path.join("qnet.json"))?;
        self.qnet_tgt.save(&path.join("qnet_tgt.json"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(&path.join("qnet.json"))?;
        self.qnet_tgt.load(&path.join("qnet_tgt.json"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{DuelingMlp, DuelingMlpConfig},
        FrameStack,
    };
    use duelq_core::{replay_buffer::SimpleReplayBuffer, Step};
    use ndarray::arr2;

    /// An environment that is never stepped; the sync tests only exercise the
    /// agent's internal state.
    struct NullEnv;

    impl Env for NullEnv {
        type Config = ();
        type Obs = FrameStack;
        type Act = OneHotAct;
        type Info = ();

        fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
            Ok(Self)
        }

        fn step(&mut self, _a: &Self::Act) -> (Step<Self>, Record) {
            unimplemented!()
        }

        fn step_with_reset(&mut self, _a: &Self::Act) -> (Step<Self>, Record) {
            unimplemented!()
        }

        fn reset(&mut self) -> Result<Self::Obs> {
            unimplemented!()
        }

        fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
            unimplemented!()
        }
    }

    type TestDqn = Dqn<NullEnv, DuelingMlp, SimpleReplayBuffer<ArrayBatch, ArrayBatch>>;

    fn counter(env_steps: usize, opt_steps: usize) -> StepCounter {
        StepCounter {
            env_steps,
            opt_steps,
        }
    }

    fn drifted_agent() -> TestDqn {
        let config = DqnConfig::default()
            .model_config(DuelingMlpConfig::new(4, 8, 2))
            .sync_interval(500);
        let mut agent = TestDqn::build(config);

        let obs = arr2(&[[0.1, 0.2, 0.3, 0.4], [0.4, 0.3, 0.2, 0.1]]);
        let mask = arr2(&[[1., 0.], [0., 1.]]);
        agent.qnet.train_step(&obs, &mask, &[1., -1.], 0.1);
        agent
    }

    #[test]
    fn test_sync_fires_only_on_exact_multiples_of_the_tick_counter() {
        let mut agent = drifted_agent();
        assert_ne!(agent.qnet, agent.qnet_tgt);

        // the cadence is keyed off the time-step counter, not the
        // optimization-step counter
        agent.maybe_sync(&counter(499, 500));
        agent.maybe_sync(&counter(501, 1_000));
        assert_ne!(agent.qnet, agent.qnet_tgt);

        agent.maybe_sync(&counter(1_000, 123));
        assert_eq!(agent.qnet, agent.qnet_tgt);
    }

    #[test]
    fn test_terminal_target_equals_reward() {
        // masking must hold even against adversarial estimator output
        let q_tgt = arr2(&[[1e6, -1e6], [f32::NAN, f32::NAN]]);
        let targets = bellman_targets(&q_tgt, &[0.5, -2.0], &[1, 1], 0.99);
        assert_eq!(targets, vec![0.5, -2.0]);
    }

    #[test]
    fn test_non_terminal_target_bootstraps() {
        let q_tgt = arr2(&[[1.0, 3.0], [2.0, -1.0]]);
        let targets = bellman_targets(&q_tgt, &[1.0, 0.0], &[0, 0], 0.99);
        assert!((targets[0] - (1.0 + 0.99 * 3.0)).abs() < 1e-6);
        assert!((targets[1] - 0.99 * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_mixed_batch() {
        let q_tgt = arr2(&[[10.0, 20.0], [10.0, 20.0]]);
        let targets = bellman_targets(&q_tgt, &[1.0, 1.0], &[1, 0], 0.5);
        assert_eq!(targets[0], 1.0);
        assert!((targets[1] - 11.0).abs() < 1e-6);
    }
}
