//! Rollout configuration.

use serde::{Deserialize, Serialize};

/// Default observation magnitude bound
pub const DEFAULT_OBS_BOUND: f64 = 5.0;

/// Configuration for full-episode rollouts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloutConfig {
    /// Every observation component must satisfy `|x| < obs_bound`
    pub obs_bound: f64,
    /// Seed for `reset()` and for sampling actions
    pub seed: Option<u64>,
    /// Stop an episode after this many steps even if it is not done.
    /// `None` runs until the environment terminates or truncates.
    pub max_steps: Option<u64>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            obs_bound: DEFAULT_OBS_BOUND,
            seed: None,
            max_steps: None,
        }
    }
}

impl RolloutConfig {
    pub fn obs_bound(mut self, bound: f64) -> Self {
        self.obs_bound = bound;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }
}
