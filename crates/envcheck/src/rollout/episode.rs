//! Single-episode driver.

use super::RolloutConfig;
use crate::env::{unpack, Environment, StepResult};
use crate::spaces::Value;
use crate::{CheckError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Totals of a finished episode
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub steps: u64,
    pub total_reward: f64,
    pub total_cost: f64,
}

/// Running reward, cost and length of the current episode.
#[derive(Clone, Debug, Default)]
pub struct EpisodeAccumulator {
    reward: f64,
    cost: f64,
    steps: u64,
}

impl EpisodeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new episode
    pub fn reset(&mut self) {
        self.reward = 0.0;
        self.cost = 0.0;
        self.steps = 0;
    }

    /// Add one step. Fails if the step reports a non-numeric `cost`.
    pub fn record(&mut self, result: &StepResult) -> Result<()> {
        let cost = result.cost()?;
        self.reward += result.reward;
        self.cost += cost;
        self.steps += 1;
        Ok(())
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn finish(&self) -> EpisodeSummary {
        EpisodeSummary {
            steps: self.steps,
            total_reward: self.reward,
            total_cost: self.cost,
        }
    }
}

/// Require `|x| < bound` for every numeric component of `obs`.
///
/// NaN fails the check.
pub fn check_observation_bound(obs: &Value, step: u64, bound: f64) -> Result<()> {
    let mut violated = false;
    obs.for_each_scalar(&mut |x| {
        if !(x.abs() < bound) {
            violated = true;
        }
    });

    if violated {
        return Err(CheckError::ObservationBound {
            step,
            bound,
            observation: obs.to_string(),
        });
    }
    Ok(())
}

/// Run one full episode with uniformly sampled actions.
///
/// Every step is decoded with the same contract as the interaction check and
/// its observation must stay inside the configured bound. The environment is
/// closed once the episode is done.
pub fn run_episode<R: Rng>(
    env: &mut dyn Environment,
    config: &RolloutConfig,
    rng: &mut R,
) -> Result<EpisodeSummary> {
    let action_space = env
        .action_space()
        .ok_or(CheckError::MissingSpace { which: "action" })?;

    let [_obs, _info] = unpack::<2>("reset", env.reset(config.seed))?;
    let mut episode = EpisodeAccumulator::new();

    loop {
        let action = action_space.sample(rng);
        let result = StepResult::from_value(env.step(&action))?;
        episode.record(&result)?;
        check_observation_bound(&result.observation, episode.steps(), config.obs_bound)?;

        if result.done() {
            break;
        }
        if config.max_steps.is_some_and(|max| episode.steps() >= max) {
            tracing::debug!(steps = episode.steps(), "Stopping episode at max_steps");
            break;
        }
    }

    let summary = episode.finish();
    tracing::info!(
        "Okay. Steps: {} Return: {} Cost: {}",
        summary.steps,
        summary.total_reward,
        summary.total_cost
    );
    env.close();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testing::ScriptedEnv;
    use crate::env::{Info, TimeLimit};
    use ndarray::{ArrayD, IxDyn};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn step_with(obs: Value, reward: f64, cost: Option<Value>, terminated: bool) -> StepResult {
        let mut info = Info::new();
        if let Some(cost) = cost {
            info.insert("cost".to_string(), cost);
        }
        StepResult {
            observation: obs,
            reward,
            terminated,
            truncated: false,
            info,
        }
    }

    #[test]
    fn test_accumulator_totals() {
        let mut acc = EpisodeAccumulator::new();
        acc.record(&step_with(Value::Int(0), 1.5, Some(Value::Float(1.0)), false))
            .unwrap();
        acc.record(&step_with(Value::Int(0), -0.5, None, false)).unwrap();
        acc.record(&step_with(Value::Int(0), 2.0, Some(Value::Int(2)), true))
            .unwrap();

        let summary = acc.finish();
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.total_reward, 3.0);
        assert_eq!(summary.total_cost, 3.0);
    }

    #[test]
    fn test_accumulator_reset_is_idempotent() {
        let mut acc = EpisodeAccumulator::new();
        acc.record(&step_with(Value::Int(0), 1.0, Some(Value::Float(1.0)), false))
            .unwrap();
        acc.reset();
        assert_eq!(acc.finish(), EpisodeSummary::default());
        acc.reset();
        assert_eq!(acc.finish(), EpisodeSummary::default());
    }

    #[test]
    fn test_non_numeric_cost_is_rejected() {
        let mut acc = EpisodeAccumulator::new();
        let err = acc
            .record(&step_with(Value::Int(0), 1.0, Some(Value::Str("high".into())), false))
            .unwrap_err();
        assert!(matches!(err, CheckError::InfoType { .. }));
        assert_eq!(acc.steps(), 0);
    }

    #[test]
    fn test_observation_bound() {
        let inside = Value::Array(ArrayD::from_elem(IxDyn(&[3]), 4.99));
        assert!(check_observation_bound(&inside, 1, 5.0).is_ok());

        let on_bound = Value::Array(ArrayD::from_elem(IxDyn(&[3]), -5.0));
        let err = check_observation_bound(&on_bound, 7, 5.0).unwrap_err();
        assert!(matches!(err, CheckError::ObservationBound { step: 7, .. }));
        assert!(err.to_string().contains("step=7"));

        let nan = Value::Float(f64::NAN);
        assert!(check_observation_bound(&nan, 1, 5.0).is_err());
    }

    #[test]
    fn test_observation_bound_recurses_into_containers() {
        let mut map = BTreeMap::new();
        map.insert("flag".to_string(), Value::Bool(true));
        map.insert("pos".to_string(), Value::Tuple(vec![Value::Int(1), Value::Int(6)]));
        let err = check_observation_bound(&Value::Dict(map), 3, 5.0).unwrap_err();
        assert!(matches!(err, CheckError::ObservationBound { .. }));
    }

    #[test]
    fn test_run_episode_until_truncated() {
        let mut env = TimeLimit::new(ScriptedEnv::well_behaved(), 10);
        let mut rng = StdRng::seed_from_u64(0);
        let summary = run_episode(&mut env, &RolloutConfig::default(), &mut rng).unwrap();

        assert_eq!(summary.steps, 10);
        assert_eq!(summary.total_reward, 10.0);
        assert_eq!(summary.total_cost, 0.0);
        assert!(env.inner().closed);
    }

    #[test]
    fn test_run_episode_max_steps() {
        let mut env = ScriptedEnv::well_behaved();
        let mut rng = StdRng::seed_from_u64(0);
        let config = RolloutConfig::default().max_steps(25);
        let summary = run_episode(&mut env, &config, &mut rng).unwrap();
        assert_eq!(summary.steps, 25);
    }

    #[test]
    fn test_run_episode_reports_bound_violation() {
        let mut env = ScriptedEnv::well_behaved();
        if let Value::Tuple(fields) = &mut env.step_return {
            fields[0] = Value::Array(ArrayD::from_elem(IxDyn(&[2]), 7.5));
        }
        let mut rng = StdRng::seed_from_u64(0);
        let err = run_episode(&mut env, &RolloutConfig::default().max_steps(5), &mut rng)
            .unwrap_err();
        assert!(matches!(err, CheckError::ObservationBound { step: 1, .. }));
    }

    #[test]
    fn test_run_episode_rejects_malformed_step() {
        let mut env = ScriptedEnv::well_behaved();
        env.step_return = Value::Tuple(vec![Value::Int(0), Value::Float(0.0)]);
        let mut rng = StdRng::seed_from_u64(0);
        let err = run_episode(&mut env, &RolloutConfig::default(), &mut rng).unwrap_err();
        assert!(matches!(err, CheckError::Arity { expected: 5, actual: 2, .. }));
    }
}
