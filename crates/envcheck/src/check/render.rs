//! Render-mode validation.

use super::{Diagnostic, DiagnosticKind};
use crate::env::Environment;
use crate::Result;

/// Mode that needs a display to render into
pub const HUMAN_MODE: &str = "human";

/// Render every declared mode once, then close the environment.
///
/// Declaring no render modes is only an advisory finding.
pub fn check_render(
    env: &mut dyn Environment,
    warn: bool,
    headless: bool,
) -> Result<Vec<Diagnostic>> {
    let Some(mut render_modes) = env.metadata().render_modes else {
        let mut diagnostics = Vec::new();
        if warn {
            diagnostics.push(Diagnostic::advisory(
                DiagnosticKind::NoRenderModes,
                "No render modes were declared in the environment (metadata.render_modes is \
                 not defined), you may have trouble when calling `render()`",
            ));
        }
        return Ok(diagnostics);
    };

    if headless {
        render_modes.retain(|mode| mode != HUMAN_MODE);
    }

    for mode in &render_modes {
        env.render(mode)?;
    }
    env.close();
    Ok(Vec::new())
}
