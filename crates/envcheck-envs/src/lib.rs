//! Built-in environments for envcheck.
//!
//! Provides:
//! - `SafetyEnv` - agent/task safety benchmark, ids `Safety{Agent}{Task}-v0`
//! - `CartPole` - classic control, id `CartPole-v1`
//!
//! [`register_all`] adds every environment to a [`Registry`].

mod cartpole;
pub mod safety;

pub use cartpole::CartPole;
pub use safety::{env_id, Agent, Layout, SafetyEnv, Task};

use envcheck::registry::{EnvSpec, Registry};

/// Version suffix of the default layouts
pub const SAFETY_VERSION: &str = "v0";

/// Layout of the denser `-v1` Reach and Gather variants
pub const DENSE_LAYOUT: Layout = Layout {
    hazards: 8,
    apples: 8,
    bombs: 16,
};

/// Register every bundled environment.
pub fn register_all(registry: &mut Registry) {
    registry.register_spec(EnvSpec::new("CartPole-v1", CartPole::new).max_episode_steps(500));

    for agent in Agent::ALL {
        for task in Task::ALL {
            let spec = EnvSpec::new(env_id(agent, task, SAFETY_VERSION), move || {
                SafetyEnv::new(agent, task)
            });
            registry.register_spec(spec.max_episode_steps(task.max_episode_steps()));
        }

        for task in [Task::Reach, Task::Gather] {
            let spec = EnvSpec::new(env_id(agent, task, "v1"), move || {
                SafetyEnv::new(agent, task).with_layout(DENSE_LAYOUT)
            });
            registry.register_spec(spec.max_episode_steps(task.max_episode_steps()));
        }
    }

    tracing::debug!(count = registry.len(), "Registered bundled environments");
}

/// A registry holding every bundled environment
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    register_all(&mut registry);
    registry
}
