//! Declared-space validation.
//!
//! Everything here only reads what an environment declares. Nothing calls
//! `reset()` or `step()`, and findings are returned rather than logged.

use super::{Diagnostic, DiagnosticKind};
use crate::env::Environment;
use crate::spaces::{Box as BoxSpace, DType, DynSpace, Space};
use crate::{CheckError, Result};

/// Smallest image side the default convolutional feature extractors accept
pub const MIN_IMAGE_SIDE: usize = 36;

/// Require both spaces to be declared.
pub fn check_spaces(env: &dyn Environment) -> Result<(DynSpace, DynSpace)> {
    let observation_space = env
        .observation_space()
        .ok_or(CheckError::MissingSpace { which: "observation" })?;
    let action_space = env
        .action_space()
        .ok_or(CheckError::MissingSpace { which: "action" })?;
    Ok((observation_space, action_space))
}

/// Run every advisory check on the declared spaces.
pub fn spec_diagnostics(
    env: &dyn Environment,
    observation_space: &DynSpace,
    action_space: &DynSpace,
) -> Vec<Diagnostic> {
    let mut diagnostics = check_unsupported_obs_spaces(env, observation_space);

    if let DynSpace::Box(space) = observation_space {
        match space.shape().len() {
            1 => {}
            3 => diagnostics.extend(check_image_input(space)),
            rank => diagnostics.push(Diagnostic::advisory(
                DiagnosticKind::UnconventionalShape,
                format!(
                    "Your observation has an unconventional shape (rank {}, neither an image \
                     nor a 1D vector). We recommend flattening the observation to a 1D vector",
                    rank
                ),
            )),
        }
    }

    diagnostics.extend(check_action_space(action_space));
    diagnostics
}

/// Observation kinds generic consumers cannot handle without a custom policy.
pub fn check_unsupported_obs_spaces(
    env: &dyn Environment,
    observation_space: &DynSpace,
) -> Vec<Diagnostic> {
    match observation_space {
        DynSpace::Dict(_) if env.goal_env().is_none() => vec![Diagnostic::advisory(
            DiagnosticKind::DictObservation,
            "The observation space is a Dict but the environment does not implement the \
             goal-env interface; generic policies do not support this, you will need a \
             custom policy",
        )],
        DynSpace::Tuple(_) => vec![Diagnostic::advisory(
            DiagnosticKind::TupleObservation,
            "The observation space is a Tuple, which generic policies do not support; \
             flatten the observation and maybe use a custom policy",
        )],
        _ => Vec::new(),
    }
}

/// Checks for a rank-3 Box, which consumers will treat as an image.
pub fn check_image_input(space: &BoxSpace) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if space.shape().len() != 3 {
        return diagnostics;
    }

    if space.dtype != DType::UInt8 {
        diagnostics.push(Diagnostic::advisory(
            DiagnosticKind::ImageDtype,
            format!(
                "Your observation looks like an image but its dtype is {} rather than uint8. \
                 If it is not an image, flatten it to a 1D vector",
                space.dtype
            ),
        ));
    }

    if space.low.iter().any(|&l| l != 0.0) || space.high.iter().any(|&h| h != 255.0) {
        diagnostics.push(Diagnostic::advisory(
            DiagnosticKind::ImageBounds,
            "Your observation looks like an image but its bounds are not [0, 255]. \
             CNN policies normalize pixels automatically and may misbehave outside that range",
        ));
    }

    let shape = space.shape();
    if shape[0] < MIN_IMAGE_SIDE || shape[1] < MIN_IMAGE_SIDE {
        diagnostics.push(Diagnostic::advisory(
            DiagnosticKind::ImageResolution,
            format!(
                "The minimal resolution for an image is {0}x{0} for the default CNN policy, \
                 got {1}x{2}. You might need a custom feature extractor",
                MIN_IMAGE_SIDE, shape[0], shape[1]
            ),
        ));
    }

    diagnostics
}

/// Box actions should be symmetric and normalized to [-1, 1].
pub fn check_action_space(action_space: &DynSpace) -> Vec<Diagnostic> {
    let DynSpace::Box(space) = action_space else {
        return Vec::new();
    };

    let asymmetric = space
        .low
        .iter()
        .zip(space.high.iter())
        .any(|(l, h)| l.abs() != h.abs());
    let unnormalized = space
        .low
        .iter()
        .chain(space.high.iter())
        .any(|b| b.abs() > 1.0);

    if asymmetric || unnormalized {
        vec![Diagnostic::advisory(
            DiagnosticKind::ActionSpaceNotNormalized,
            "We recommend using a symmetric and normalized Box action space (range=[-1, 1])",
        )]
    } else {
        Vec::new()
    }
}
