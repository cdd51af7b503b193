//! Console logging backend.

use super::MetricLogger;
use crate::check::{Diagnostic, Severity};
use crate::rollout::EpisodeSummary;

/// Logger that reports through tracing.
pub struct ConsoleLogger;

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self
    }
}

impl MetricLogger for ConsoleLogger {
    fn log_episode(&self, env_id: &str, summary: &EpisodeSummary) {
        tracing::info!(
            env = env_id,
            "Episode: steps={} return={:.4} cost={:.4}",
            summary.steps,
            summary.total_reward,
            summary.total_cost
        );
    }

    fn log_diagnostic(&self, env_id: &str, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Advisory => {
                tracing::warn!(env = env_id, kind = ?diagnostic.kind, "{}", diagnostic.message)
            }
            Severity::Fatal => tracing::error!(env = env_id, "{}", diagnostic.message),
        }
    }
}
