//! Configuration of the DQN agent.
use super::explorer::TwoPhaseExplorer;
use crate::{model::QFunc, opt::OptimizerConfig};
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Dqn`](super::Dqn).
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(bound(
    serialize = "Q::Config: Serialize",
    deserialize = "Q::Config: DeserializeOwned"
))]
pub struct DqnConfig<Q>
where
    Q: QFunc,
{
    /// Configuration of the value estimator.
    pub model_config: Q::Config,

    /// Configuration of the optimizer, including the learning-rate schedule.
    pub opt_config: OptimizerConfig,

    /// Minibatch size of optimization steps.
    pub batch_size: usize,

    /// Discount factor in (0, 1).
    pub discount_factor: f64,

    /// Target-network synchronization cadence in environment ticks.
    ///
    /// Keyed off the time-step counter, not the optimization-step counter.
    pub sync_interval: usize,

    /// Exploration schedule.
    pub explorer: TwoPhaseExplorer,

    /// Whether the agent starts in training mode.
    pub train: bool,
}

impl<Q> Clone for DqnConfig<Q>
where
    Q: QFunc,
{
    fn clone(&self) -> Self {
        Self {
            model_config: self.model_config.clone(),
            opt_config: self.opt_config.clone(),
            batch_size: self.batch_size,
            discount_factor: self.discount_factor,
            sync_interval: self.sync_interval,
            explorer: self.explorer.clone(),
            train: self.train,
        }
    }
}

impl<Q> Default for DqnConfig<Q>
where
    Q: QFunc,
    Q::Config: Default,
{
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            opt_config: Default::default(),
            batch_size: 32,
            discount_factor: 0.99,
            sync_interval: 500,
            explorer: Default::default(),
            train: false,
        }
    }
}

impl<Q> DqnConfig<Q>
where
    Q: QFunc,
{
    /// Sets the configuration of the value estimator.
    pub fn model_config(mut self, v: Q::Config) -> Self {
        self.model_config = v;
        self
    }

    /// Sets the configuration of the optimizer.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the minibatch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the target-network synchronization cadence in environment ticks.
    pub fn sync_interval(mut self, v: usize) -> Self {
        self.sync_interval = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn explorer(mut self, v: TwoPhaseExplorer) -> Self {
        self.explorer = v;
        self
    }

    /// Loads [`DqnConfig`] from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self>
    where
        Q::Config: DeserializeOwned,
    {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let c = serde_yaml::from_reader(rdr)?;
        info!("Loaded DQN agent config from {}", path_.to_string_lossy());
        Ok(c)
    }

    /// Saves [`DqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()>
    where
        Q::Config: Serialize,
    {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Saved DQN agent config into {}", path_.to_string_lossy());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DuelingMlp;
    use tempdir::TempDir;

    #[test]
    fn test_serde_dqn_config() -> Result<()> {
        let config = DqnConfig::<DuelingMlp>::default()
            .batch_size(16)
            .sync_interval(100);

        let dir = TempDir::new("dqn_config")?;
        let path = dir.path().join("dqn.yaml");
        config.save(&path)?;
        let config_ = DqnConfig::<DuelingMlp>::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
