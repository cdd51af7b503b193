//! Agent bodies and their kinematics.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

/// Integration timestep in seconds
pub const DT: f32 = 0.05;
/// Half-width of the square arena
pub const ARENA: f32 = 10.0;
/// Hover altitude of the drone
pub const HOVER_HEIGHT: f32 = 1.0;

const GRAVITY: f32 = 9.81;
const CEILING: f32 = 5.0;

/// Controllable agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Agent {
    /// Point mass pushed in x and y
    Ball,
    /// Differential drive with two wheels
    Car,
    /// Four legs with two joints each
    Ant,
    /// Quadrotor with four rotors
    Drone,
}

impl Agent {
    pub const ALL: [Agent; 4] = [Agent::Ball, Agent::Car, Agent::Ant, Agent::Drone];

    pub fn name(self) -> &'static str {
        match self {
            Agent::Ball => "Ball",
            Agent::Car => "Car",
            Agent::Ant => "Ant",
            Agent::Drone => "Drone",
        }
    }

    pub fn action_dim(self) -> usize {
        match self {
            Agent::Ball | Agent::Car => 2,
            Agent::Ant => 8,
            Agent::Drone => 4,
        }
    }

    /// Length of the body part of the observation
    pub fn observation_dim(self) -> usize {
        match self {
            Agent::Drone => 8,
            _ => 6,
        }
    }

    /// Planar speed above which the Run task charges a cost
    pub fn speed_limit(self) -> f32 {
        match self {
            Agent::Ball => 2.0,
            Agent::Car => 1.5,
            Agent::Ant => 1.0,
            Agent::Drone => 2.5,
        }
    }

    /// Advance `body` by one timestep. Action components are clipped to [-1, 1].
    pub fn apply(self, body: &mut Body, action: &[f32]) {
        let a = |i: usize| action.get(i).copied().unwrap_or(0.0).clamp(-1.0, 1.0);

        match self {
            Agent::Ball => {
                body.vel[0] = 0.95 * body.vel[0] + 4.0 * a(0) * DT;
                body.vel[1] = 0.95 * body.vel[1] + 4.0 * a(1) * DT;
                if body.speed() > 1e-3 {
                    body.yaw = body.vel[1].atan2(body.vel[0]);
                }
            }
            Agent::Car => {
                let (left, right) = (a(0), a(1));
                body.yaw = wrap_angle(body.yaw + 2.0 * (right - left) * DT);
                let forward = 1.5 * (left + right);
                let (sin, cos) = body.yaw.sin_cos();
                body.vel[0] = 0.8 * body.vel[0] + 0.2 * forward * cos;
                body.vel[1] = 0.8 * body.vel[1] + 0.2 * forward * sin;
            }
            Agent::Ant => {
                // Each leg pushes along its own direction; the knee sets how much of the
                // hip torque reaches the ground
                let mut force = [0.0f32; 2];
                let mut turn = 0.0;
                for leg in 0..4 {
                    let hip = a(2 * leg);
                    let knee = a(2 * leg + 1).abs();
                    let (sin, cos) = (body.yaw + leg as f32 * FRAC_PI_2).sin_cos();
                    force[0] += 2.0 * hip * knee * cos;
                    force[1] += 2.0 * hip * knee * sin;
                    let sign = if leg % 2 == 0 { 1.0 } else { -1.0 };
                    turn += sign * hip * (1.0 - knee);
                }
                body.vel[0] = 0.9 * body.vel[0] + force[0] * DT;
                body.vel[1] = 0.9 * body.vel[1] + force[1] * DT;
                body.yaw = wrap_angle(body.yaw + 0.5 * turn * DT);
            }
            Agent::Drone => {
                // Rotors ordered front, right, back, left; thrust in [0, 1] each
                let thrust: Vec<f32> = (0..4).map(|i| 0.5 * (a(i) + 1.0)).collect();
                let total: f32 = thrust.iter().sum();
                let pitch = thrust[2] - thrust[0];
                let roll = thrust[3] - thrust[1];

                body.vel[2] = 0.95 * body.vel[2] + (0.5 * GRAVITY * total - GRAVITY) * DT;
                let (sin, cos) = body.yaw.sin_cos();
                body.vel[0] = 0.95 * body.vel[0] + 3.0 * (pitch * cos - roll * sin) * DT;
                body.vel[1] = 0.95 * body.vel[1] + 3.0 * (pitch * sin + roll * cos) * DT;
                let spin = (thrust[0] + thrust[2]) - (thrust[1] + thrust[3]);
                body.yaw = wrap_angle(body.yaw + spin * DT);
            }
        }

        body.integrate();
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rigid-body state shared by all agents
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    pub pos: [f32; 3],
    pub vel: [f32; 3],
    pub yaw: f32,
}

impl Body {
    /// Body at rest at `(x, y)`; drones start at hover height
    pub fn spawn(agent: Agent, x: f32, y: f32, yaw: f32) -> Self {
        let z = if agent == Agent::Drone { HOVER_HEIGHT } else { 0.0 };
        Self {
            pos: [x, y, z],
            vel: [0.0; 3],
            yaw,
        }
    }

    /// Planar speed
    pub fn speed(&self) -> f32 {
        self.vel[0].hypot(self.vel[1])
    }

    pub fn distance_to(&self, point: [f32; 2]) -> f32 {
        (self.pos[0] - point[0]).hypot(self.pos[1] - point[1])
    }

    /// Whether a drone has hit the ground
    pub fn crashed(&self, agent: Agent) -> bool {
        agent == Agent::Drone && self.pos[2] <= 0.0
    }

    /// Body features, each component in [-1, 1]
    pub fn features(&self, agent: Agent) -> Vec<f32> {
        let mut features = vec![
            (self.pos[0] / ARENA).tanh(),
            (self.pos[1] / ARENA).tanh(),
            self.vel[0].tanh(),
            self.vel[1].tanh(),
            self.yaw.sin(),
            self.yaw.cos(),
        ];
        if agent == Agent::Drone {
            features.push((self.pos[2] - HOVER_HEIGHT).tanh());
            features.push(self.vel[2].tanh());
        }
        features
    }

    fn integrate(&mut self) {
        for axis in 0..2 {
            self.pos[axis] += self.vel[axis] * DT;
            // Arena walls absorb the velocity component that hits them
            if self.pos[axis].abs() > ARENA {
                self.pos[axis] = self.pos[axis].clamp(-ARENA, ARENA);
                self.vel[axis] = 0.0;
            }
        }
        self.pos[2] += self.vel[2] * DT;
        if self.pos[2] < 0.0 || self.pos[2] > CEILING {
            self.pos[2] = self.pos[2].clamp(0.0, CEILING);
            self.vel[2] = 0.0;
        }
    }
}

/// Wrap an angle into [-pi, pi)
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}
