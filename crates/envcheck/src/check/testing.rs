//! Scripted environment for validator unit tests.

use crate::env::{reset_value, Environment, GoalEnv, Info, Metadata, RenderFrame};
use crate::spaces::{Box as BoxSpace, Dict, Discrete, DynSpace, Value};
use crate::{CheckError, Result};
use ndarray::{ArrayD, IxDyn};
use std::cell::RefCell;

/// Environment whose declarations and return values are set by the test
pub struct ScriptedEnv {
    pub observation_space: Option<DynSpace>,
    pub action_space: Option<DynSpace>,
    pub metadata: Metadata,
    pub reset_return: Value,
    pub step_return: Value,
    pub goal: bool,
    pub failing_render_mode: Option<String>,
    pub steps: u32,
    pub closed: bool,
    pub rendered: RefCell<Vec<String>>,
}

fn point(x: f32, y: f32) -> Value {
    Value::Array(ArrayD::from_shape_vec(IxDyn(&[2]), vec![x, y]).unwrap())
}

impl ScriptedEnv {
    /// Box observation in [0, 1]^2, two discrete actions, valid returns
    pub fn well_behaved() -> Self {
        let mut info = Info::new();
        info.insert("cost".to_string(), Value::Float(0.0));
        Self {
            observation_space: Some(DynSpace::Box(BoxSpace::unit(&[2]))),
            action_space: Some(DynSpace::Discrete(Discrete::new(2))),
            metadata: Metadata::default(),
            reset_return: reset_value(point(0.5, 0.5), Info::new()),
            step_return: Value::Tuple(vec![
                point(0.5, 0.5),
                Value::Float(1.0),
                Value::Bool(false),
                Value::Bool(false),
                Value::Dict(info),
            ]),
            goal: false,
            failing_render_mode: None,
            steps: 0,
            closed: false,
            rendered: RefCell::new(Vec::new()),
        }
    }

    /// Goal-conditioned Dict observation whose reward is `-|achieved - desired|`
    pub fn goal_reaching() -> Self {
        let space = DynSpace::Dict(Dict::from_pairs(vec![
            ("observation", DynSpace::Box(BoxSpace::unit(&[2]))),
            ("achieved_goal", DynSpace::Box(BoxSpace::unit(&[2]))),
            ("desired_goal", DynSpace::Box(BoxSpace::unit(&[2]))),
        ]));
        let obs = |achieved: Value| {
            let mut map = std::collections::BTreeMap::new();
            map.insert("observation".to_string(), point(0.5, 0.5));
            map.insert("achieved_goal".to_string(), achieved);
            map.insert("desired_goal".to_string(), point(0.0, 0.0));
            Value::Dict(map)
        };

        let mut env = Self::well_behaved();
        env.observation_space = Some(space);
        env.goal = true;
        env.reset_return = reset_value(obs(point(0.0, 0.0)), Info::new());
        env.step_return = Value::Tuple(vec![
            obs(point(0.3, 0.4)),
            Value::Float(-0.5),
            Value::Bool(false),
            Value::Bool(false),
            Value::Dict(Info::new()),
        ]);
        env
    }
}

impl GoalEnv for ScriptedEnv {
    fn compute_reward(&self, achieved_goal: &Value, desired_goal: &Value, _info: &Info) -> f64 {
        match (achieved_goal.as_array(), desired_goal.as_array()) {
            (Some(a), Some(d)) => {
                let dist_sq: f32 = a.iter().zip(d.iter()).map(|(x, y)| (x - y).powi(2)).sum();
                -(dist_sq.sqrt() as f64)
            }
            _ => f64::NAN,
        }
    }
}

impl Environment for ScriptedEnv {
    fn observation_space(&self) -> Option<DynSpace> {
        self.observation_space.clone()
    }

    fn action_space(&self) -> Option<DynSpace> {
        self.action_space.clone()
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn reset(&mut self, _seed: Option<u64>) -> Value {
        self.steps = 0;
        self.reset_return.clone()
    }

    fn step(&mut self, _action: &Value) -> Value {
        self.steps += 1;
        self.step_return.clone()
    }

    fn render(&self, mode: &str) -> Result<RenderFrame> {
        if self.failing_render_mode.as_deref() == Some(mode) {
            return Err(CheckError::Render {
                mode: mode.to_string(),
                reason: "no display".to_string(),
            });
        }
        self.rendered.borrow_mut().push(mode.to_string());
        Ok(RenderFrame::Text(String::new()))
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn goal_env(&self) -> Option<&dyn GoalEnv> {
        if self.goal {
            Some(self)
        } else {
            None
        }
    }
}
