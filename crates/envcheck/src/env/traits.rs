//! Core environment trait definitions.

use crate::spaces::{DynSpace, Value};
use crate::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Diagnostic key/value mapping returned by `reset()` and `step()`
pub type Info = BTreeMap<String, Value>;

/// Declared environment metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Supported render modes, e.g. `["human", "rgb_array"]`
    pub render_modes: Option<Vec<String>>,
    /// Frames per second for rendering
    pub render_fps: Option<u32>,
}

impl Metadata {
    pub fn with_render_modes(mut self, modes: &[&str]) -> Self {
        self.render_modes = Some(modes.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn with_render_fps(mut self, fps: u32) -> Self {
        self.render_fps = Some(fps);
        self
    }
}

/// A frame returned by `Environment::render`.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderFrame {
    /// Textual representation of a frame (ANSI / ASCII art)
    Text(String),
    /// Row-major RGB pixel buffer, 3 bytes per pixel
    Pixels {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
}

/// Result from a single environment step
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// Observation after the step
    pub observation: Value,
    /// Reward received
    pub reward: f64,
    /// Whether episode terminated (goal reached, failure, etc.)
    pub terminated: bool,
    /// Whether episode truncated (time limit, etc.)
    pub truncated: bool,
    /// Additional info
    pub info: Info,
}

impl StepResult {
    /// Check if episode is done (terminated or truncated)
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }

    /// Safety cost of this step, `0.0` when the env reports none
    pub fn cost(&self) -> Result<f64> {
        match self.info.get("cost") {
            None => Ok(0.0),
            Some(v) => v.as_f64().ok_or_else(|| CheckError::InfoType {
                method: "step",
                reason: format!("key `cost` must be a number, got {}", v.type_name()),
            }),
        }
    }

    /// Build the raw five-tuple an environment returns from `step()`
    pub fn into_value(self) -> Value {
        Value::Tuple(vec![
            self.observation,
            Value::Float(self.reward),
            Value::Bool(self.terminated),
            Value::Bool(self.truncated),
            Value::Dict(self.info),
        ])
    }

    /// Decode and type-check a raw `step()` return value
    pub fn from_value(value: Value) -> Result<Self> {
        Self::from_fields(unpack::<5>("step", value)?)
    }

    /// Type-check already unpacked `step()` fields
    pub fn from_fields(fields: [Value; 5]) -> Result<Self> {
        let [observation, reward, terminated, truncated, info] = fields;

        // Integers are accepted since they widen to a float reward
        let reward = reward.as_f64().ok_or_else(|| CheckError::RewardType {
            found: reward.type_name().to_string(),
        })?;
        let terminated = decode_flag("terminated", &terminated)?;
        let truncated = decode_flag("truncated", &truncated)?;
        let info = decode_info("step", info)?;

        Ok(Self {
            observation,
            reward,
            terminated,
            truncated,
            info,
        })
    }
}

/// Build the raw pair an environment returns from `reset()`
pub fn reset_value(observation: Value, info: Info) -> Value {
    Value::Tuple(vec![observation, Value::Dict(info)])
}

/// Split a raw return value into exactly `N` fields.
///
/// Anything that is not a tuple counts as a single value.
pub fn unpack<const N: usize>(method: &'static str, value: Value) -> Result<[Value; N]> {
    let items = match value {
        Value::Tuple(items) => items,
        other => vec![other],
    };
    let actual = items.len();
    items.try_into().map_err(|_| CheckError::Arity {
        method,
        expected: N,
        actual,
    })
}

/// Require an info mapping
pub fn decode_info(method: &'static str, info: Value) -> Result<Info> {
    match info {
        Value::Dict(map) => Ok(map),
        other => Err(CheckError::InfoType {
            method,
            reason: format!("must be a mapping, got {}", other.type_name()),
        }),
    }
}

fn decode_flag(flag: &'static str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| CheckError::FlagType {
        flag,
        found: value.type_name().to_string(),
    })
}

/// Multi-goal sub-protocol.
///
/// Goal-conditioned environments return a `Dict` observation with
/// `observation`, `achieved_goal` and `desired_goal` entries and can recompute
/// the reward for any pair of goals.
pub trait GoalEnv {
    fn compute_reward(&self, achieved_goal: &Value, desired_goal: &Value, info: &Info) -> f64;
}

/// Capability set every checked environment provides.
///
/// Any type implementing this trait is a valid environment; nothing else is
/// assumed about it. `reset()` and `step()` return raw [`Value`]s rather than
/// typed structs so that arity and type violations can be reported.
///
/// # Example
///
/// ```rust,ignore
/// use envcheck::env::{reset_value, Environment, Info, StepResult};
/// use envcheck::spaces::{Box as BoxSpace, Discrete, DynSpace, Value};
///
/// struct MyEnv {
///     state: f32,
/// }
///
/// impl Environment for MyEnv {
///     fn observation_space(&self) -> Option<DynSpace> {
///         Some(DynSpace::Box(BoxSpace::uniform(&[1], -1.0, 1.0)))
///     }
///
///     fn action_space(&self) -> Option<DynSpace> {
///         Some(DynSpace::Discrete(Discrete::new(2)))
///     }
///
///     fn reset(&mut self, seed: Option<u64>) -> Value {
///         self.state = 0.0;
///         reset_value(Value::Array(ArrayD::from_elem(IxDyn(&[1]), self.state)), Info::new())
///     }
///
///     fn step(&mut self, action: &Value) -> Value {
///         // ... implement step logic
///     }
/// }
/// ```
pub trait Environment: Send {
    /// Declared observation space, `None` if the environment declares none
    fn observation_space(&self) -> Option<DynSpace>;

    /// Declared action space, `None` if the environment declares none
    fn action_space(&self) -> Option<DynSpace>;

    /// Declared metadata
    fn metadata(&self) -> Metadata {
        Metadata::default()
    }

    /// Reset the environment to initial state
    ///
    /// # Returns
    /// The pair `(observation, info)`
    fn reset(&mut self, seed: Option<u64>) -> Value;

    /// Take a single step in the environment
    ///
    /// # Returns
    /// The five-tuple `(observation, reward, terminated, truncated, info)`
    fn step(&mut self, action: &Value) -> Value;

    /// Render a frame in the given mode
    fn render(&self, mode: &str) -> Result<RenderFrame> {
        Err(CheckError::Render {
            mode: mode.to_string(),
            reason: "rendering is not supported".to_string(),
        })
    }

    /// Close the environment and free resources
    fn close(&mut self) {}

    /// The multi-goal interface, if the environment implements it
    fn goal_env(&self) -> Option<&dyn GoalEnv> {
        None
    }
}

impl<E: Environment + ?Sized> Environment for std::boxed::Box<E> {
    fn observation_space(&self) -> Option<DynSpace> {
        (**self).observation_space()
    }

    fn action_space(&self) -> Option<DynSpace> {
        (**self).action_space()
    }

    fn metadata(&self) -> Metadata {
        (**self).metadata()
    }

    fn reset(&mut self, seed: Option<u64>) -> Value {
        (**self).reset(seed)
    }

    fn step(&mut self, action: &Value) -> Value {
        (**self).step(action)
    }

    fn render(&self, mode: &str) -> Result<RenderFrame> {
        (**self).render(mode)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn goal_env(&self) -> Option<&dyn GoalEnv> {
        (**self).goal_env()
    }
}
