//! CartPole classic control environment.

use envcheck::env::{reset_value, Environment, Info, Metadata, RenderFrame, StepResult};
use envcheck::spaces::{Box as BoxSpace, Discrete, DynSpace, Value};
use envcheck::{CheckError, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// CartPole environment
///
/// A pole is attached to a cart on a frictionless track. The goal
/// is to balance the pole by applying forces to the cart.
///
/// Observation: [cart_pos, cart_vel, pole_angle, pole_vel]
/// Action: 0 = push left, 1 = push right
///
/// Episodes only terminate; the step limit comes from the registry.
pub struct CartPole {
    // Physics constants
    gravity: f32,
    mass_pole: f32,
    total_mass: f32,
    length: f32, // half-pole length
    pole_mass_length: f32,
    force_mag: f32,
    tau: f32, // timestep

    // Thresholds
    theta_threshold: f32,
    x_threshold: f32,

    // State
    state: [f32; 4], // x, x_dot, theta, theta_dot
    rng: StdRng,
}

impl CartPole {
    /// Create a new CartPole environment
    pub fn new() -> Self {
        let mass_cart = 1.0;
        let mass_pole = 0.1;
        let length = 0.5;

        Self {
            gravity: 9.8,
            mass_pole,
            total_mass: mass_cart + mass_pole,
            length,
            pole_mass_length: mass_pole * length,
            force_mag: 10.0,
            tau: 0.02,
            theta_threshold: 12.0 * 2.0 * PI / 360.0, // 12 degrees
            x_threshold: 2.4,
            state: [0.0; 4],
            rng: StdRng::from_entropy(),
        }
    }

    fn is_terminal(&self) -> bool {
        let x = self.state[0];
        let theta = self.state[2];

        x.abs() > self.x_threshold || theta.abs() > self.theta_threshold
    }

    fn observation(&self) -> Value {
        Value::Array(Array1::from(self.state.to_vec()).into_dyn())
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for CartPole {
    fn observation_space(&self) -> Option<DynSpace> {
        // Velocities are unbounded
        let high = Array1::from(vec![
            2.0 * self.x_threshold,
            f32::INFINITY,
            2.0 * self.theta_threshold,
            f32::INFINITY,
        ])
        .into_dyn();
        Some(DynSpace::Box(BoxSpace::new(-&high, high)))
    }

    fn action_space(&self) -> Option<DynSpace> {
        Some(DynSpace::Discrete(Discrete::new(2)))
    }

    fn metadata(&self) -> Metadata {
        Metadata::default().with_render_modes(&["ansi"])
    }

    fn reset(&mut self, seed: Option<u64>) -> Value {
        if let Some(s) = seed {
            self.rng = StdRng::seed_from_u64(s);
        }

        // Initialize state randomly in [-0.05, 0.05]
        for i in 0..4 {
            self.state[i] = self.rng.gen::<f32>() * 0.1 - 0.05;
        }

        reset_value(self.observation(), Info::new())
    }

    fn step(&mut self, action: &Value) -> Value {
        let [x, x_dot, theta, theta_dot] = self.state;

        // Apply force
        let force = match action.as_int() {
            Some(1) => self.force_mag,
            Some(0) => -self.force_mag,
            _ => {
                tracing::warn!(action = %action, "Invalid CartPole action, applying no force");
                0.0
            }
        };

        // Physics simulation
        let cos_theta = theta.cos();
        let sin_theta = theta.sin();

        let temp = (force + self.pole_mass_length * theta_dot * theta_dot * sin_theta)
            / self.total_mass;
        let theta_acc = (self.gravity * sin_theta - cos_theta * temp)
            / (self.length
                * (4.0 / 3.0 - self.mass_pole * cos_theta * cos_theta / self.total_mass));
        let x_acc = temp - self.pole_mass_length * theta_acc * cos_theta / self.total_mass;

        // Euler integration
        self.state[0] = x + self.tau * x_dot;
        self.state[1] = x_dot + self.tau * x_acc;
        self.state[2] = theta + self.tau * theta_dot;
        self.state[3] = theta_dot + self.tau * theta_acc;

        let terminated = self.is_terminal();
        let reward = if !terminated { 1.0 } else { 0.0 };

        StepResult {
            observation: self.observation(),
            reward,
            terminated,
            truncated: false,
            info: Info::new(),
        }
        .into_value()
    }

    fn render(&self, mode: &str) -> Result<RenderFrame> {
        if mode != "ansi" {
            return Err(CheckError::Render {
                mode: mode.to_string(),
                reason: "only `ansi` is supported".to_string(),
            });
        }

        let [x, _, theta, _] = self.state;

        // Simple ASCII rendering
        let cart_pos = ((x + 2.4) / 4.8 * 20.0) as i32;
        let cart_pos = cart_pos.clamp(0, 20);

        let mut line = vec![' '; 21];
        line[cart_pos as usize] = if theta.abs() < 0.1 { '|' } else { '/' };

        Ok(RenderFrame::Text(format!("[{}]", line.iter().collect::<String>())))
    }
}
