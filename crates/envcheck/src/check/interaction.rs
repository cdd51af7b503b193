//! Live reset/step validation.
//!
//! Drives exactly one `reset()` and one `step()` and fails hard on the first
//! contract violation.

use super::CheckConfig;
use crate::env::{decode_info, unpack, Environment, Info, StepResult};
use crate::spaces::{DynSpace, Value};
use crate::{CheckError, Result};
use rand::Rng;

/// Tolerance for the goal-reward consistency check
const GOAL_REWARD_TOLERANCE: f64 = 1e-6;

/// Check that an observation matches the declared observation space.
pub fn check_obs(obs: &Value, space: &DynSpace, method: &'static str) -> Result<()> {
    if !matches!(space, DynSpace::Tuple(_)) && matches!(obs, Value::Tuple(_)) {
        return Err(CheckError::ObservationType {
            method,
            reason: "should be a single value, not a tuple".to_string(),
        });
    }

    match space {
        DynSpace::Discrete(_) if !matches!(obs, Value::Int(_)) => {
            return Err(CheckError::ObservationType {
                method,
                reason: format!("must be an int, got {}", obs.type_name()),
            });
        }
        DynSpace::Box(_) if !obs.is_dense() => {
            return Err(CheckError::ObservationType {
                method,
                reason: format!("must be a dense array, got {}", obs.type_name()),
            });
        }
        _ => {}
    }

    if !space.contains(obs) {
        return Err(CheckError::SpaceConformance {
            method,
            space: space.to_string(),
        });
    }
    Ok(())
}

/// Reset once and check the returned `(observation, info)` pair.
pub fn check_reset(
    env: &mut dyn Environment,
    observation_space: &DynSpace,
    seed: Option<u64>,
) -> Result<(Value, Info)> {
    let [obs, info] = unpack::<2>("reset", env.reset(seed))?;
    let info = decode_info("reset", info)?;
    check_obs(&obs, observation_space, "reset")?;
    Ok((obs, info))
}

/// Step once with a sampled action and check the returned five-tuple.
pub fn check_step<R: Rng>(
    env: &mut dyn Environment,
    observation_space: &DynSpace,
    action_space: &DynSpace,
    rng: &mut R,
) -> Result<StepResult> {
    let action = action_space.sample(rng);
    let fields = unpack::<5>("step", env.step(&action))?;
    check_obs(&fields[0], observation_space, "step")?;
    StepResult::from_fields(fields)
}

/// Compare the step reward of a goal environment against its own
/// `compute_reward`. Environments without the goal interface pass trivially.
pub fn check_goal_reward(env: &dyn Environment, result: &StepResult) -> Result<()> {
    let Some(goal_env) = env.goal_env() else {
        return Ok(());
    };

    let goals = result
        .observation
        .as_dict()
        .and_then(|obs| Some((obs.get("achieved_goal")?, obs.get("desired_goal")?)));
    let Some((achieved, desired)) = goals else {
        return Err(CheckError::ObservationType {
            method: "step",
            reason: "of a goal environment must contain `achieved_goal` and `desired_goal`"
                .to_string(),
        });
    };

    let recomputed = goal_env.compute_reward(achieved, desired, &result.info);
    if (result.reward - recomputed).abs() > GOAL_REWARD_TOLERANCE {
        return Err(CheckError::GoalRewardMismatch {
            returned: result.reward,
            recomputed,
        });
    }
    Ok(())
}

/// Check the values returned by `reset()` and `step()`.
pub fn check_returned_values<R: Rng>(
    env: &mut dyn Environment,
    observation_space: &DynSpace,
    action_space: &DynSpace,
    config: &CheckConfig,
    rng: &mut R,
) -> Result<StepResult> {
    check_reset(env, observation_space, config.seed)?;
    let result = check_step(env, observation_space, action_space, rng)?;

    if config.check_goal_reward {
        check_goal_reward(&*env, &result)?;
    }
    Ok(result)
}
