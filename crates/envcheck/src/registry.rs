//! Explicit environment registry.
//!
//! Environments are registered by id with a factory closure and created on
//! demand. The registry is built at startup and handed to whoever needs it.

use crate::env::{Environment, TimeLimit};
use crate::{CheckError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Factory producing a fresh environment instance
pub type EnvFactory = Box<dyn Fn() -> Box<dyn Environment> + Send + Sync>;

/// A registered environment
pub struct EnvSpec {
    pub id: String,
    /// Truncate episodes after this many steps
    pub max_episode_steps: Option<u64>,
    factory: EnvFactory,
}

impl EnvSpec {
    pub fn new<F, E>(id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: Environment + 'static,
    {
        Self {
            id: id.into(),
            max_episode_steps: None,
            factory: Box::new(move || Box::new(factory())),
        }
    }

    pub fn max_episode_steps(mut self, steps: u64) -> Self {
        self.max_episode_steps = Some(steps);
        self
    }

    /// Create a new instance, wrapped in a `TimeLimit` when a limit is set
    pub fn make(&self) -> Box<dyn Environment> {
        let env = (self.factory)();
        match self.max_episode_steps {
            Some(limit) => Box::new(TimeLimit::new(env, limit)),
            None => env,
        }
    }
}

impl fmt::Debug for EnvSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSpec")
            .field("id", &self.id)
            .field("max_episode_steps", &self.max_episode_steps)
            .finish_non_exhaustive()
    }
}

/// Environment ids mapped to their specs, ordered by id
#[derive(Debug, Default)]
pub struct Registry {
    specs: BTreeMap<String, EnvSpec>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `id`, replacing any previous entry
    pub fn register<F, E>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: Environment + 'static,
    {
        self.register_spec(EnvSpec::new(id, factory));
    }

    pub fn register_spec(&mut self, spec: EnvSpec) {
        if self.specs.contains_key(&spec.id) {
            tracing::debug!(id = %spec.id, "Replacing registered environment");
        }
        self.specs.insert(spec.id.clone(), spec);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.specs.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&EnvSpec> {
        self.specs.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Registered ids containing `marker`
    pub fn matching<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.ids().filter(move |id| id.contains(marker))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Create the environment registered under `id`
    pub fn make(&self, id: &str) -> Result<Box<dyn Environment>> {
        self.specs
            .get(id)
            .map(EnvSpec::make)
            .ok_or_else(|| CheckError::UnknownEnv(id.to_string()))
    }
}
