//! Environment wrappers for common functionality.

use super::{Environment, GoalEnv, Metadata, RenderFrame};
use crate::spaces::{DynSpace, Value};
use crate::Result;

/// Wrapper that truncates episodes after a fixed number of steps.
///
/// Sets the `truncated` flag of the step tuple once the limit is reached.
/// Return values that are not a well-formed five-tuple are passed through
/// untouched so that a checker still sees them as the inner env produced them.
pub struct TimeLimit<E: Environment> {
    env: E,
    max_episode_steps: u64,
    elapsed_steps: u64,
}

impl<E: Environment> TimeLimit<E> {
    /// Wrap an environment with a step limit
    pub fn new(env: E, max_episode_steps: u64) -> Self {
        Self {
            env,
            max_episode_steps,
            elapsed_steps: 0,
        }
    }

    /// Steps taken since the last reset
    pub fn elapsed_steps(&self) -> u64 {
        self.elapsed_steps
    }

    /// Get a reference to the inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }
}

impl<E: Environment> Environment for TimeLimit<E> {
    fn observation_space(&self) -> Option<DynSpace> {
        self.env.observation_space()
    }

    fn action_space(&self) -> Option<DynSpace> {
        self.env.action_space()
    }

    fn metadata(&self) -> Metadata {
        self.env.metadata()
    }

    fn reset(&mut self, seed: Option<u64>) -> Value {
        self.elapsed_steps = 0;
        self.env.reset(seed)
    }

    fn step(&mut self, action: &Value) -> Value {
        let mut result = self.env.step(action);
        self.elapsed_steps += 1;

        if self.elapsed_steps >= self.max_episode_steps {
            if let Value::Tuple(fields) = &mut result {
                if let [_, _, _, Value::Bool(truncated), _] = fields.as_mut_slice() {
                    *truncated = true;
                }
            }
        }

        result
    }

    fn render(&self, mode: &str) -> Result<RenderFrame> {
        self.env.render(mode)
    }

    fn close(&mut self) {
        self.env.close()
    }

    fn goal_env(&self) -> Option<&dyn GoalEnv> {
        self.env.goal_env()
    }
}
