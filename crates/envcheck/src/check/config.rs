//! Checker configuration.

use serde::{Deserialize, Serialize};

/// Configuration for `check_env`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Run the advisory space checks
    pub warn: bool,
    /// Skip rendering every declared render mode
    pub skip_render_check: bool,
    /// Drop render modes that need a display (`human`)
    pub headless: bool,
    /// Compare the step reward of goal environments against
    /// `compute_reward(achieved_goal, desired_goal, info)`
    pub check_goal_reward: bool,
    /// Seed for `reset()` and for sampling the probe action
    pub seed: Option<u64>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            warn: true,
            skip_render_check: true,
            headless: false,
            check_goal_reward: false,
            seed: None,
        }
    }
}

impl CheckConfig {
    /// Enable/disable advisory warnings.
    pub fn warn(mut self, enabled: bool) -> Self {
        self.warn = enabled;
        self
    }

    /// Enable/disable the render check.
    pub fn skip_render_check(mut self, skip: bool) -> Self {
        self.skip_render_check = skip;
        self
    }

    pub fn headless(mut self, enabled: bool) -> Self {
        self.headless = enabled;
        self
    }

    pub fn check_goal_reward(mut self, enabled: bool) -> Self {
        self.check_goal_reward = enabled;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
