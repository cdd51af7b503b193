//! # envcheck
//!
//! Conformance checking for reinforcement-learning environments.
//!
//! ## Overview
//!
//! envcheck provides:
//! - Gymnasium-style space descriptors (`Discrete`, `Box`, `Dict`, `Tuple`) with
//!   explicit membership predicates
//! - The `Environment` capability trait every checked environment implements
//! - A space validator that reports advisory diagnostics about declared spaces
//! - An interaction validator that drives one reset/step cycle and fails hard on
//!   any contract violation
//! - A batch rollout driver that runs full episodes over a registry of
//!   environments and enforces an observation-bounds property
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use envcheck::prelude::*;
//!
//! let mut env = MyEnv::new();
//! let report = check_env(&mut env, &CheckConfig::default())?;
//! for warning in report.warnings() {
//!     println!("{}", warning.message);
//! }
//! ```

pub mod check;
pub mod env;
pub mod log;
pub mod registry;
pub mod rollout;
pub mod spaces;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::check::{
        check_env, CheckConfig, CheckReport, Diagnostic, DiagnosticKind, Severity,
    };
    pub use crate::env::{Environment, Info, Metadata, RenderFrame, StepResult};
    pub use crate::log::{CompositeLogger, ConsoleLogger, MetricLogger, NoOpLogger};
    pub use crate::registry::{EnvSpec, Registry};
    pub use crate::rollout::{
        check_suite, run_episode, run_suite, EpisodeSummary, RolloutConfig, SuiteConfig,
    };
    pub use crate::spaces::{
        Box as BoxSpace, DType, Dict, Discrete, DynSpace, Space, Tuple, Value,
    };
    pub use crate::{CheckError, Result};
}

/// Fatal conformance failures.
///
/// Every variant aborts the check of the current environment. Advisory findings
/// are reported as [`check::Diagnostic`] records instead.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("You must specify an {which} space (cf envcheck::spaces)")]
    MissingSpace { which: &'static str },

    #[error("The `{method}()` method must return {expected} values, got {actual}")]
    Arity {
        method: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("The observation returned by the `{method}()` method {reason}")]
    ObservationType { method: &'static str, reason: String },

    #[error(
        "The observation returned by the `{method}()` method does not match the given \
         observation space {space}"
    )]
    SpaceConformance { method: &'static str, space: String },

    #[error("The reward returned by `step()` must be a number, got {found}")]
    RewardType { found: String },

    #[error("The `{flag}` signal must be a boolean, got {found}")]
    FlagType { flag: &'static str, found: String },

    #[error("The `info` returned by `{method}()` {reason}")]
    InfoType { method: &'static str, reason: String },

    #[error("Reward {returned} does not match the goal reward {recomputed}")]
    GoalRewardMismatch { returned: f64, recomputed: f64 },

    #[error("Observation violated |x| < {bound} at step={step} obs={observation}")]
    ObservationBound {
        step: u64,
        bound: f64,
        observation: String,
    },

    #[error("Render mode `{mode}` failed: {reason}")]
    Render { mode: String, reason: String },

    #[error("No environment registered under id `{0}`")]
    UnknownEnv(String),

    #[error("{id}: {source}")]
    Env {
        id: String,
        #[source]
        source: Box<CheckError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CheckError {
    /// Attach the id of the environment the failure happened in.
    pub fn in_env(self, id: impl Into<String>) -> Self {
        match self {
            CheckError::Env { .. } => self,
            other => CheckError::Env {
                id: id.into(),
                source: Box::new(other),
            },
        }
    }

    /// Strip any environment context and return the underlying failure.
    pub fn root(&self) -> &CheckError {
        match self {
            CheckError::Env { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = core::result::Result<T, CheckError>;
