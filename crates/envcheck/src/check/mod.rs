//! Environment conformance checks.
//!
//! Provides:
//! - `spaces` - advisory checks on the declared spaces
//! - `interaction` - one live reset/step cycle with hard failures
//! - `render` - optional render-mode check
//! - `check_env` - all of the above in order

mod config;
mod diagnostic;
pub mod interaction;
pub mod render;
pub mod spaces;

#[cfg(test)]
pub(crate) mod testing;

pub use config::CheckConfig;
pub use diagnostic::{CheckReport, Diagnostic, DiagnosticKind, Severity};

use crate::env::Environment;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Check that an environment follows the reset/step/space protocol.
///
/// Runs the declared-space checks (advisory findings only when
/// `config.warn`), then one reset and one step, then optionally every
/// declared render mode. The first contract violation aborts the check.
pub fn check_env(env: &mut dyn Environment, config: &CheckConfig) -> Result<CheckReport> {
    let (observation_space, action_space) = spaces::check_spaces(&*env)?;

    let mut report = CheckReport::default();
    if config.warn {
        report.diagnostics = spaces::spec_diagnostics(&*env, &observation_space, &action_space);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    interaction::check_returned_values(env, &observation_space, &action_space, config, &mut rng)?;

    if !config.skip_render_check {
        let diagnostics = render::check_render(env, config.warn, config.headless)?;
        report.diagnostics.extend(diagnostics);
    }

    Ok(report)
}
