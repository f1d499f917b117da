//! Train [`Agent`].
mod config;
mod sampler;
use std::time::{Duration, SystemTime};

use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, Evaluator, ExperienceBufferBase, ReplayBufferBase, StepCounter, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{info, warn};
pub use sampler::Sampler;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop and its related objects.
///
/// # Training loop
///
/// On every environment tick the trainer:
///
/// 1. Samples an action from the agent, applies it to the environment, and
///    pushes the produced transition into the replay buffer ([`Sampler`]).
/// 2. If the environment-step counter has passed the warm-up period and the
///    optimization interval divides it, performs one optimization step for
///    the agent with a minibatch sampled from the replay buffer, then
///    advances the optimization-step counter by exactly one.
/// 3. Increments the environment-step counter.
///
/// Both counters live in a [`StepCounter`] owned by the trainer and passed by
/// reference into the agent; the agent never keeps its own copies.
///
/// On cadences in optimization steps, the trainer additionally evaluates the
/// agent (recording the result as `score` and keeping a `best` copy of the
/// model), saves the model parameters, records computational cost
/// (`opt_steps_per_sec`), and flushes records. All persistence failures are
/// logged and training continues; errors from the optimization path itself
/// abort training.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|ReplayBufferBase::Item|D[ReplayBufferBase]
///     D -->|TransitionBatch|A
/// ```
pub struct Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Configuration of the environment for training.
    env_config: E::Config,

    /// Configuration of the transition producer.
    step_proc_config: P::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: R::Config,

    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Interval of optimization in environment steps.
    opt_interval: usize,

    /// Interval of recording agent information in optimization steps.
    record_agent_info_interval: usize,

    /// Interval of recording computational cost in optimization steps.
    record_compute_cost_interval: usize,

    /// Interval of flushing records in optimization steps.
    flush_record_interval: usize,

    /// Interval of evaluation in optimization steps.
    eval_interval: usize,

    /// Interval of saving the model in optimization steps.
    save_interval: usize,

    /// The maximal number of optimization steps.
    max_opts: usize,

    /// Warm-up period, in environment steps, before optimization starts.
    warmup_period: usize,

    /// Optimization steps since the last compute-cost report.
    opt_steps_for_ops: usize,

    /// Timer for computing optimization steps per second.
    timer_for_ops: Duration,
}

impl<E, P, R> Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Constructs a trainer.
    pub fn build(
        config: TrainerConfig,
        env_config: E::Config,
        step_proc_config: P::Config,
        replay_buffer_config: R::Config,
    ) -> Self {
        Self {
            env_config,
            step_proc_config,
            replay_buffer_config,
            model_dir: config.model_dir,
            opt_interval: config.opt_interval,
            record_agent_info_interval: config.record_agent_info_interval,
            record_compute_cost_interval: config.record_compute_cost_interval,
            flush_record_interval: config.flush_record_interval,
            eval_interval: config.eval_interval,
            save_interval: config.save_interval,
            max_opts: config.max_opts,
            warmup_period: config.warmup_period,
            opt_steps_for_ops: 0,
            timer_for_ops: Duration::new(0, 0),
        }
    }

    fn save_model<A: Agent<E, R>>(agent: &A, model_dir: String) {
        match agent.save_params(model_dir.as_ref()) {
            Ok(()) => info!("Saved the model in {:?}", &model_dir),
            Err(_) => warn!("Failed to save model in {:?}", &model_dir),
        }
    }

    fn save_best_model<A: Agent<E, R>>(agent: &A, model_dir: String) {
        let model_dir = model_dir + "/best";
        Self::save_model(agent, model_dir);
    }

    fn save_model_with_steps<A: Agent<E, R>>(agent: &A, model_dir: String, steps: usize) {
        let model_dir = model_dir + format!("/{}", steps).as_str();
        Self::save_model(agent, model_dir);
    }

    /// Restores the agent from `(model_dir)/best` if it exists.
    ///
    /// A missing or unreadable checkpoint is not an error; training simply
    /// starts from scratch.
    fn maybe_restore<A: Agent<E, R>>(&self, agent: &mut A) {
        if let Some(model_dir) = self.model_dir.as_ref() {
            let best = std::path::Path::new(model_dir).join("best");
            if best.exists() {
                match agent.load_params(&best) {
                    Ok(()) => info!("Successfully loaded model from {:?}", &best),
                    Err(e) => warn!("Could not load model from {:?}: {}", &best, e),
                }
            } else {
                info!("No saved model found in {:?}", &best);
            }
        }
    }

    /// Returns optimization steps per second, then resets the internal
    /// counters.
    fn opt_steps_per_sec(&mut self) -> f32 {
        let osps = 1000. * self.opt_steps_for_ops as f32 / (self.timer_for_ops.as_millis() as f32);
        self.opt_steps_for_ops = 0;
        self.timer_for_ops = Duration::new(0, 0);
        osps
    }

    /// Performs one training step.
    ///
    /// First performs one environment step and pushes the transition into the
    /// buffer with [`Sampler`]. Then, once the environment-step counter
    /// exceeds the warm-up period and the optimization interval divides it,
    /// performs one optimization step. Finally the environment-step counter
    /// is advanced, so the first optimization step runs on the tick right
    /// after the warm-up period (with `warmup_period = 32` that is tick 33).
    ///
    /// The second return value is whether an optimization step was done.
    pub fn train_step<A>(
        &mut self,
        agent: &mut A,
        buffer: &mut R,
        sampler: &mut Sampler<E, P>,
        counter: &mut StepCounter,
    ) -> Result<(Record, bool)>
    where
        A: Agent<E, R>,
    {
        // Sample a transition and push it into the replay buffer
        let mut record = sampler.sample_and_push(agent, buffer, counter)?;

        // Warm-up gate compares the tick counter, not the buffer occupancy
        let is_opt = counter.env_steps > self.warmup_period
            && counter.env_steps % self.opt_interval == 0;

        if is_opt {
            let timer = SystemTime::now();
            let record_agent = agent.opt(buffer, counter)?;
            counter.opt_steps += 1;
            self.timer_for_ops += timer.elapsed()?;
            self.opt_steps_for_ops += 1;

            if let Some(record_agent) = record_agent {
                if counter.opt_steps % self.record_agent_info_interval == 0 {
                    record = record.merge(record_agent);
                }
            }
        }

        counter.env_steps += 1;

        Ok((record, is_opt))
    }

    /// Trains the agent until `max_opts` optimization steps are completed.
    pub fn train<A, D>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn Recorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        A: Agent<E, R>,
        D: Evaluator<E, A>,
    {
        let env = E::build(&self.env_config, 0)?;
        let producer = P::build(&self.step_proc_config);
        let mut buffer = R::build(&self.replay_buffer_config);
        let mut sampler = Sampler::new(env, producer);
        let mut counter = StepCounter::new();
        let mut max_score = f32::MIN;

        self.maybe_restore(agent);
        agent.train();

        loop {
            let (mut record, is_opt) =
                self.train_step(agent, &mut buffer, &mut sampler, &mut counter)?;

            if is_opt {
                let opt_steps = counter.opt_steps;

                if opt_steps % self.record_compute_cost_interval == 0 {
                    record.insert("opt_steps_per_sec", Scalar(self.opt_steps_per_sec()));
                }

                if opt_steps % self.eval_interval == 0 {
                    info!("Starts evaluation of the trained model");
                    agent.eval();
                    let score = evaluator.evaluate(agent)?;
                    agent.train();
                    record.insert("score", Scalar(score));

                    // Keep the best model up to the current iteration
                    if score > max_score {
                        max_score = score;
                        if let Some(model_dir) = self.model_dir.as_ref() {
                            Self::save_best_model(agent, model_dir.clone());
                        }
                    }
                }

                if (self.save_interval > 0) && (opt_steps % self.save_interval == 0) {
                    if let Some(model_dir) = self.model_dir.as_ref() {
                        Self::save_model_with_steps(agent, model_dir.clone(), opt_steps);
                    }
                }

                if opt_steps == self.max_opts {
                    if !record.is_empty() {
                        recorder.store(record);
                    }
                    recorder.flush(opt_steps as _);
                    break;
                }
            }

            if !record.is_empty() {
                recorder.store(record);
            }

            if is_opt && (counter.opt_steps % self.flush_record_interval == 0) {
                recorder.flush(counter.opt_steps as _);
            }
        }

        Ok(())
    }
}
