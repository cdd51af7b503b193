//! Tasks: what an agent is rewarded and charged for.

use super::agent::{Agent, Body, ARENA};
use rand::Rng;
use std::f32::consts::PI;
use std::fmt;

/// Number of angular bins of the pseudo-lidar
pub const LIDAR_BINS: usize = 8;
const LIDAR_RANGE: f32 = 4.0;

const GOAL_RADIUS: f32 = 0.5;
const HAZARD_RADIUS: f32 = 0.7;
const COLLECT_RADIUS: f32 = 0.5;
const CIRCLE_RADIUS: f32 = 3.0;
/// Walls of the Circle task, at `|x| = CIRCLE_X_LIMIT`
const CIRCLE_X_LIMIT: f32 = 2.5;
/// Corridor half-width of the Run task
const RUN_BOUNDARY: f32 = 2.0;

/// Task an agent has to solve
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Reach goals while avoiding hazards
    Reach,
    /// Run in a circle without crossing the walls
    Circle,
    /// Run forward inside a corridor below a speed limit
    Run,
    /// Collect apples while avoiding bombs
    Gather,
}

impl Task {
    pub const ALL: [Task; 4] = [Task::Reach, Task::Circle, Task::Run, Task::Gather];

    pub fn name(self) -> &'static str {
        match self {
            Task::Reach => "Reach",
            Task::Circle => "Circle",
            Task::Run => "Run",
            Task::Gather => "Gather",
        }
    }

    /// Length of the task part of the observation
    pub fn observation_dim(self) -> usize {
        match self {
            Task::Reach => 3 + LIDAR_BINS,
            Task::Circle => 3,
            Task::Run => 2,
            Task::Gather => 2 * LIDAR_BINS,
        }
    }

    pub fn max_episode_steps(self) -> u64 {
        match self {
            Task::Reach | Task::Gather => 250,
            Task::Circle | Task::Run => 500,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Object counts of a task layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub hazards: usize,
    pub apples: usize,
    pub bombs: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            hazards: 4,
            apples: 8,
            bombs: 8,
        }
    }
}

/// Per-episode task state
#[derive(Clone, Debug, Default)]
pub struct TaskState {
    pub goal: [f32; 2],
    pub hazards: Vec<[f32; 2]>,
    pub apples: Vec<[f32; 2]>,
    pub bombs: Vec<[f32; 2]>,
    previous: f32,
}

fn random_point<R: Rng>(rng: &mut R, extent: f32) -> [f32; 2] {
    [rng.gen_range(-extent..extent), rng.gen_range(-extent..extent)]
}

impl TaskState {
    /// Lay out a new episode and return the spawn pose `(x, y, yaw)`
    pub fn reset<R: Rng>(
        &mut self,
        task: Task,
        layout: &Layout,
        rng: &mut R,
    ) -> (f32, f32, f32) {
        self.hazards.clear();
        self.apples.clear();
        self.bombs.clear();
        let yaw = rng.gen_range(-PI..PI);

        match task {
            Task::Reach => {
                self.goal = random_point(rng, ARENA / 2.0);
                self.hazards = (0..layout.hazards)
                    .map(|_| random_point(rng, ARENA / 2.0))
                    .collect();
                self.previous = self.goal[0].hypot(self.goal[1]);
                (0.0, 0.0, yaw)
            }
            Task::Circle => {
                self.previous = 0.0;
                (0.0, 0.0, yaw)
            }
            Task::Run => {
                self.previous = -ARENA / 2.0;
                (-ARENA / 2.0, 0.0, 0.0)
            }
            Task::Gather => {
                self.apples = (0..layout.apples)
                    .map(|_| random_point(rng, ARENA / 2.0))
                    .collect();
                self.bombs = (0..layout.bombs)
                    .map(|_| random_point(rng, ARENA / 2.0))
                    .collect();
                (0.0, 0.0, yaw)
            }
        }
    }

    /// Reward and cost of the step that moved the agent to `body`
    pub fn evaluate<R: Rng>(
        &mut self,
        task: Task,
        agent: Agent,
        body: &Body,
        rng: &mut R,
    ) -> (f64, f64) {
        let [x, y, _] = body.pos;

        match task {
            Task::Reach => {
                let dist = body.distance_to(self.goal);
                let mut reward = self.previous - dist;
                if dist < GOAL_RADIUS {
                    reward += 1.0;
                    self.goal = random_point(rng, ARENA / 2.0);
                }
                self.previous = body.distance_to(self.goal);

                let inside = self
                    .hazards
                    .iter()
                    .any(|&hazard| body.distance_to(hazard) < HAZARD_RADIUS);
                (reward as f64, if inside { 1.0 } else { 0.0 })
            }
            Task::Circle => {
                let [vx, vy, _] = body.vel;
                let r = x.hypot(y);
                let reward =
                    ((-vx * y + vy * x) / CIRCLE_RADIUS) / (1.0 + (r - CIRCLE_RADIUS).abs());
                let cost = if x.abs() > CIRCLE_X_LIMIT { 1.0 } else { 0.0 };
                (reward as f64, cost)
            }
            Task::Run => {
                let reward = x - self.previous;
                self.previous = x;
                let unsafe_state = y.abs() > RUN_BOUNDARY || body.speed() > agent.speed_limit();
                (reward as f64, if unsafe_state { 1.0 } else { 0.0 })
            }
            Task::Gather => {
                let before = (self.apples.len(), self.bombs.len());
                self.apples.retain(|&apple| body.distance_to(apple) >= COLLECT_RADIUS);
                self.bombs.retain(|&bomb| body.distance_to(bomb) >= COLLECT_RADIUS);
                let reward = (before.0 - self.apples.len()) as f64;
                let cost = (before.1 - self.bombs.len()) as f64;
                (reward, cost)
            }
        }
    }

    /// Whether the episode is over for task reasons
    pub fn finished(&self, task: Task) -> bool {
        task == Task::Gather && self.apples.is_empty()
    }

    /// Task features, each component in [-1, 1]
    pub fn features(&self, task: Task, agent: Agent, body: &Body) -> Vec<f32> {
        let [x, y, _] = body.pos;

        match task {
            Task::Reach => {
                let dx = self.goal[0] - x;
                let dy = self.goal[1] - y;
                let mut features =
                    vec![(dx / 3.0).tanh(), (dy / 3.0).tanh(), (-dx.hypot(dy)).exp()];
                features.extend(lidar(body, &self.hazards));
                features
            }
            Task::Circle => vec![
                (x / CIRCLE_RADIUS).tanh(),
                (y / CIRCLE_RADIUS).tanh(),
                (x.hypot(y) - CIRCLE_RADIUS).tanh(),
            ],
            Task::Run => vec![
                (y / RUN_BOUNDARY).tanh(),
                (body.speed() - agent.speed_limit()).tanh(),
            ],
            Task::Gather => {
                let mut features = lidar(body, &self.apples);
                features.extend(lidar(body, &self.bombs));
                features
            }
        }
    }

    /// Cost-carrying positions, for rendering
    pub fn obstacles(&self) -> impl Iterator<Item = &[f32; 2]> {
        self.hazards.iter().chain(self.bombs.iter())
    }
}

/// Closeness of the nearest point in each angular bin around the body,
/// relative to its heading: `1` on top of the body, `0` at or beyond range.
pub fn lidar(body: &Body, points: &[[f32; 2]]) -> Vec<f32> {
    let mut bins = vec![0.0f32; LIDAR_BINS];
    for point in points {
        let dist = body.distance_to(*point);
        if dist >= LIDAR_RANGE {
            continue;
        }
        let angle = (point[1] - body.pos[1]).atan2(point[0] - body.pos[0]) - body.yaw;
        let bin = ((angle.rem_euclid(2.0 * PI) / (2.0 * PI)) * LIDAR_BINS as f32) as usize;
        let bin = bin.min(LIDAR_BINS - 1);
        bins[bin] = bins[bin].max(1.0 - dist / LIDAR_RANGE);
    }
    bins
}
