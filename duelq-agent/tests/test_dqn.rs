//! End-to-end training of the DQN agent on a small corridor environment.
use anyhow::Result;
use duelq_agent::{
    dqn::{Dqn, DqnConfig},
    model::{DuelingMlp, DuelingMlpConfig},
    ArrayBatch, FrameStack, OneHotAct,
};
use duelq_core::{
    record::{BufferedRecorder, Record},
    replay_buffer::{
        SimpleReplayBuffer, SimpleReplayBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    },
    Agent, DefaultEvaluator, Env, ExperienceBufferBase, Policy, ReplayBufferBase, Sampler, Step,
    StepCounter, StepProcessor, Trainer, TrainerConfig,
};
use tempdir::TempDir;

const GOAL: i32 = 5;
const MAX_EPISODE_STEPS: usize = 30;
const DEPTH: usize = 4;

/// A one-dimensional corridor. Action 1 moves right, action 0 stays.
/// Reaching the goal position terminates the episode with reward 1;
/// episodes are truncated after a step limit.
struct CorridorEnv {
    pos: i32,
    n_steps: usize,
    stack: FrameStack,
}

impl CorridorEnv {
    fn frame(pos: i32) -> [f32; 1] {
        [pos as f32 / GOAL as f32]
    }

    fn reset_(&mut self) -> FrameStack {
        self.pos = 0;
        self.n_steps = 0;
        self.stack = FrameStack::repeat(&Self::frame(0), DEPTH);
        self.stack.clone()
    }
}

impl Env for CorridorEnv {
    type Config = ();
    type Obs = FrameStack;
    type Act = OneHotAct;
    type Info = ();

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            pos: 0,
            n_steps: 0,
            stack: FrameStack::repeat(&Self::frame(0), DEPTH),
        })
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        if a.index() == 1 {
            self.pos += 1;
        }
        self.n_steps += 1;
        self.stack.append(&Self::frame(self.pos));

        let is_terminated = self.pos >= GOAL;
        let is_truncated = !is_terminated && self.n_steps >= MAX_EPISODE_STEPS;
        let reward = if is_terminated { 1. } else { 0. };

        let step = Step::new(
            self.stack.clone(),
            *a,
            reward,
            is_terminated,
            is_truncated,
            (),
            None,
        );
        (step, Record::empty())
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            step.init_obs = Some(self.reset_());
        }
        (step, record)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        Ok(self.reset_())
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        Ok(self.reset_())
    }
}

type Buffer = SimpleReplayBuffer<ArrayBatch, ArrayBatch>;
type Proc = SimpleStepProcessor<CorridorEnv, ArrayBatch, ArrayBatch>;
type CorridorAgent = Dqn<CorridorEnv, DuelingMlp, Buffer>;

fn agent_config() -> DqnConfig<DuelingMlp> {
    DqnConfig::default().model_config(DuelingMlpConfig::new(DEPTH, 16, 2))
}

#[test]
fn test_first_opt_right_after_warmup() -> Result<()> {
    fastrand::seed(42);
    let trainer_config = TrainerConfig::default().max_opts(100).warmup_period(32);
    let mut trainer = Trainer::<CorridorEnv, Proc, Buffer>::build(
        trainer_config,
        (),
        SimpleStepProcessorConfig::default(),
        SimpleReplayBufferConfig::default().capacity(100),
    );

    let mut agent = CorridorAgent::build(agent_config());
    agent.train();

    let env = CorridorEnv::build(&(), 0)?;
    let producer = Proc::build(&SimpleStepProcessorConfig::default());
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(100));
    let mut sampler = Sampler::new(env, producer);
    let mut counter = StepCounter::new();

    // The warm-up gate compares the tick counter to the warm-up period,
    // so the first optimization step lands on tick 33, not earlier.
    for t in 0..34 {
        let (_, is_opt) =
            trainer.train_step(&mut agent, &mut buffer, &mut sampler, &mut counter)?;
        if t < 33 {
            assert!(!is_opt, "optimized during warm-up at tick {}", t);
            assert_eq!(counter.opt_steps, 0);
        } else {
            assert!(is_opt);
        }
    }

    assert_eq!(counter.opt_steps, 1);
    assert_eq!(counter.env_steps, 34);
    assert_eq!(buffer.len(), 34);
    Ok(())
}

#[test]
fn test_train_loop_evaluates_and_saves() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    fastrand::seed(42);
    let dir = TempDir::new("dqn_train")?;
    let model_dir = dir.path().join("model");

    let trainer_config = TrainerConfig::default()
        .max_opts(50)
        .eval_interval(25)
        .flush_record_interval(25)
        .record_agent_info_interval(5)
        .record_compute_cost_interval(25)
        .warmup_period(32)
        .save_interval(50)
        .model_dir(model_dir.to_str().unwrap());

    let mut trainer = Trainer::<CorridorEnv, Proc, Buffer>::build(
        trainer_config,
        (),
        SimpleStepProcessorConfig::default(),
        SimpleReplayBufferConfig::default().capacity(200),
    );

    let mut agent = CorridorAgent::build(agent_config());
    let mut recorder = BufferedRecorder::new();
    let mut evaluator = DefaultEvaluator::<CorridorEnv>::new(&(), 0, 2)?;

    trainer.train(&mut agent, &mut recorder, &mut evaluator)?;

    assert!(model_dir.join("best").join("qnet.json").exists());
    assert!(model_dir.join("best").join("qnet_tgt.json").exists());
    assert!(model_dir.join("50").join("qnet.json").exists());

    let flushed: Vec<_> = recorder.iter().collect();
    assert!(!flushed.is_empty());
    assert!(flushed.iter().any(|(_, r)| r.get_scalar("mean_loss").is_ok()));
    assert!(flushed.iter().any(|(_, r)| r.get_scalar("score").is_ok()));
    Ok(())
}

#[test]
fn test_save_load_params_roundtrip() -> Result<()> {
    let dir = TempDir::new("dqn_params")?;
    let mut agent = CorridorAgent::build(agent_config());
    agent.save_params(dir.path())?;

    // A differently-initialized agent adopts the saved parameters
    let mut agent2 = CorridorAgent::build(
        agent_config().model_config(DuelingMlpConfig::new(DEPTH, 16, 2).seed(7)),
    );
    agent2.load_params(dir.path())?;

    agent.eval();
    agent2.eval();
    let counter = StepCounter::new();
    for pos in 0..GOAL {
        let mut obs = FrameStack::repeat(&[0.], DEPTH);
        obs.append(&[pos as f32 / GOAL as f32]);
        let a = agent.sample(&obs, &counter);
        let a2 = agent2.sample(&obs, &counter);
        assert_eq!(a.index(), a2.index());
    }
    Ok(())
}

#[test]
fn test_eval_mode_is_greedy_and_deterministic() {
    fastrand::seed(42);
    let mut agent = CorridorAgent::build(agent_config());
    agent.eval();
    assert!(!agent.is_train());

    let counter = StepCounter::new();
    let obs = FrameStack::repeat(&[0.2], DEPTH);
    let first = agent.sample(&obs, &counter).index();
    // schedule state must not leak into evaluation
    for env_steps in 1..16 {
        let c = StepCounter {
            env_steps,
            opt_steps: 0,
        };
        assert_eq!(agent.sample(&obs, &c).index(), first);
    }
}
