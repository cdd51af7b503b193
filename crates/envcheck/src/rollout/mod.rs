//! Batch rollout driver.
//!
//! Runs complete episodes with random actions and checks that every
//! observation stays inside a magnitude bound, accumulating reward and the
//! `cost` reported through `info`.

mod config;
mod episode;
mod suite;

pub use config::{RolloutConfig, DEFAULT_OBS_BOUND};
pub use episode::{check_observation_bound, run_episode, EpisodeAccumulator, EpisodeSummary};
pub use suite::{check_suite, run_suite, SuiteConfig};
