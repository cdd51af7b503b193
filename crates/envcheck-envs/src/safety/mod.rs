//! Safety benchmark environments.
//!
//! Every combination of [`Agent`] and [`Task`] is a separate environment with
//! id `Safety{Agent}{Task}-{version}`. Steps report the safety cost of the
//! transition under the `cost` key of `info`. All observation features are
//! squashed into [-1, 1].

mod agent;
mod task;

pub use agent::{Agent, Body};
pub use task::{Layout, Task, TaskState};

use agent::ARENA;
use envcheck::env::{reset_value, Environment, Info, Metadata, RenderFrame, StepResult};
use envcheck::spaces::{Box as BoxSpace, DynSpace, Value};
use envcheck::{CheckError, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;

const GRID_SIZE: usize = 21;
const FRAME_SIZE: u32 = 64;

/// Registry id of an agent/task pair
pub fn env_id(agent: Agent, task: Task, version: &str) -> String {
    format!("Safety{}{}-{}", agent, task, version)
}

/// An agent solving a task under a safety constraint
pub struct SafetyEnv {
    agent: Agent,
    task: Task,
    layout: Layout,
    body: Body,
    state: TaskState,
    rng: StdRng,
}

impl SafetyEnv {
    pub fn new(agent: Agent, task: Task) -> Self {
        Self {
            agent,
            task,
            layout: Layout::default(),
            body: Body::spawn(agent, 0.0, 0.0, 0.0),
            state: TaskState::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Override the number of hazards, apples and bombs
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn observation_dim(&self) -> usize {
        self.agent.observation_dim() + self.task.observation_dim()
    }

    fn observation(&self) -> Value {
        let mut features = self.body.features(self.agent);
        features.extend(self.state.features(self.task, self.agent, &self.body));
        Value::Array(Array1::from(features).into_dyn())
    }

    fn decode_action(&self, action: &Value) -> Vec<f32> {
        match action.as_array() {
            Some(a) if a.len() == self.agent.action_dim() => a.iter().copied().collect(),
            _ => {
                tracing::warn!(
                    agent = %self.agent,
                    action = %action,
                    "Invalid action, applying zero action"
                );
                vec![0.0; self.agent.action_dim()]
            }
        }
    }

    /// Grid cell of a world position, row 0 at the top
    fn cell(pos: [f32; 2], size: usize) -> (usize, usize) {
        let scale = |v: f32| {
            let t = (v + ARENA) / (2.0 * ARENA);
            ((t * (size - 1) as f32).round() as usize).min(size - 1)
        };
        (size - 1 - scale(pos[1]), scale(pos[0]))
    }

    fn render_text(&self) -> String {
        let mut grid = vec![vec!['.'; GRID_SIZE]; GRID_SIZE];
        let mut mark = |pos: [f32; 2], c: char| {
            let (row, col) = Self::cell(pos, GRID_SIZE);
            grid[row][col] = c;
        };

        if self.task == Task::Reach {
            mark(self.state.goal, 'G');
        }
        for apple in &self.state.apples {
            mark(*apple, 'o');
        }
        for obstacle in self.state.obstacles() {
            mark(*obstacle, 'x');
        }
        mark([self.body.pos[0], self.body.pos[1]], '@');

        grid.iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_pixels(&self) -> RenderFrame {
        let size = FRAME_SIZE as usize;
        let mut data = vec![40u8; size * size * 3];
        let mut paint = |pos: [f32; 2], rgb: [u8; 3]| {
            let (row, col) = Self::cell(pos, size);
            let offset = (row * size + col) * 3;
            data[offset..offset + 3].copy_from_slice(&rgb);
        };

        if self.task == Task::Reach {
            paint(self.state.goal, [255, 220, 0]);
        }
        for apple in &self.state.apples {
            paint(*apple, [0, 200, 0]);
        }
        for obstacle in self.state.obstacles() {
            paint(*obstacle, [220, 0, 0]);
        }
        paint([self.body.pos[0], self.body.pos[1]], [255, 255, 255]);

        RenderFrame::Pixels {
            width: FRAME_SIZE,
            height: FRAME_SIZE,
            data,
        }
    }
}

impl Environment for SafetyEnv {
    fn observation_space(&self) -> Option<DynSpace> {
        Some(DynSpace::Box(BoxSpace::unbounded(&[self.observation_dim()])))
    }

    fn action_space(&self) -> Option<DynSpace> {
        Some(DynSpace::Box(BoxSpace::symmetric(&[self.agent.action_dim()])))
    }

    fn metadata(&self) -> Metadata {
        Metadata::default()
            .with_render_modes(&["human", "rgb_array"])
            .with_render_fps(20)
    }

    fn reset(&mut self, seed: Option<u64>) -> Value {
        if let Some(s) = seed {
            self.rng = StdRng::seed_from_u64(s);
        }

        let (x, y, yaw) = self.state.reset(self.task, &self.layout, &mut self.rng);
        self.body = Body::spawn(self.agent, x, y, yaw);
        reset_value(self.observation(), Info::new())
    }

    fn step(&mut self, action: &Value) -> Value {
        let action = self.decode_action(action);
        self.agent.apply(&mut self.body, &action);

        let (reward, cost) = self
            .state
            .evaluate(self.task, self.agent, &self.body, &mut self.rng);
        let terminated = self.body.crashed(self.agent) || self.state.finished(self.task);

        let mut info = Info::new();
        info.insert("cost".to_string(), Value::Float(cost));

        StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated: false,
            info,
        }
        .into_value()
    }

    fn render(&self, mode: &str) -> Result<RenderFrame> {
        match mode {
            "human" => Ok(RenderFrame::Text(self.render_text())),
            "rgb_array" => Ok(self.render_pixels()),
            _ => Err(CheckError::Render {
                mode: mode.to_string(),
                reason: "unsupported render mode".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn step(env: &mut SafetyEnv, action: Vec<f32>) -> StepResult {
        let n = action.len();
        let action = Value::Array(ArrayD::from_shape_vec(IxDyn(&[n]), action).unwrap());
        StepResult::from_value(env.step(&action)).unwrap()
    }

    #[test]
    fn test_env_ids() {
        assert_eq!(env_id(Agent::Ball, Task::Reach, "v0"), "SafetyBallReach-v0");
        assert_eq!(env_id(Agent::Drone, Task::Gather, "v1"), "SafetyDroneGather-v1");
    }

    #[test]
    fn test_observation_matches_space() {
        for agent in Agent::ALL {
            for task in Task::ALL {
                let mut env = SafetyEnv::new(agent, task);
                let space = env.observation_space().unwrap();
                let obs = match env.reset(Some(0)) {
                    Value::Tuple(mut fields) => fields.remove(0),
                    other => panic!("unexpected reset value {}", other),
                };
                assert!(space.contains(&obs), "{} {}", agent, task);
            }
        }
    }

    #[test]
    fn test_step_reports_cost() {
        let mut env = SafetyEnv::new(Agent::Ball, Task::Reach);
        env.reset(Some(1));
        let result = step(&mut env, vec![0.5, -0.5]);
        assert!(result.info.contains_key("cost"));
        assert!(result.cost().unwrap() >= 0.0);
    }

    #[test]
    fn test_seeded_reset_is_deterministic() {
        let mut a = SafetyEnv::new(Agent::Ant, Task::Gather);
        let mut b = SafetyEnv::new(Agent::Ant, Task::Gather);
        assert_eq!(a.reset(Some(9)), b.reset(Some(9)));
        for _ in 0..5 {
            assert_eq!(step(&mut a, vec![0.3; 8]), step(&mut b, vec![0.3; 8]));
        }
    }

    #[test]
    fn test_wrong_action_shape_is_zero_action() {
        let mut env = SafetyEnv::new(Agent::Car, Task::Run);
        env.reset(Some(2));
        let result = step(&mut env, vec![1.0; 5]);
        assert!(!result.terminated);
        assert_eq!(result.reward, 0.0);
    }

    #[test]
    fn test_render_modes() {
        let mut env = SafetyEnv::new(Agent::Ball, Task::Gather);
        env.reset(Some(3));

        let Ok(RenderFrame::Text(text)) = env.render("human") else {
            panic!("human mode must render text");
        };
        assert_eq!(text.lines().count(), GRID_SIZE);
        assert_eq!(text.matches('@').count(), 1);

        let Ok(RenderFrame::Pixels { width, height, data }) = env.render("rgb_array") else {
            panic!("rgb_array mode must render pixels");
        };
        assert_eq!(data.len(), (width * height * 3) as usize);

        assert!(matches!(env.render("depth"), Err(CheckError::Render { .. })));
    }
}
