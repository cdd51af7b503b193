//! Metric logger traits and composites.

use crate::check::Diagnostic;
use crate::rollout::EpisodeSummary;

/// Trait for reporting batch results to various backends.
pub trait MetricLogger: Send + Sync {
    /// Log the summary of a finished episode.
    fn log_episode(&self, env_id: &str, summary: &EpisodeSummary);

    /// Log a finding about an environment (advisory or fatal).
    fn log_diagnostic(&self, env_id: &str, diagnostic: &Diagnostic);

    /// Close the logger and flush any pending writes.
    fn close(&self) {}
}

/// A logger that does nothing (default).
pub struct NoOpLogger;

impl MetricLogger for NoOpLogger {
    fn log_episode(&self, _env_id: &str, _summary: &EpisodeSummary) {}
    fn log_diagnostic(&self, _env_id: &str, _diagnostic: &Diagnostic) {}
}

/// A composite logger that dispatches to multiple backends.
#[derive(Default)]
pub struct CompositeLogger {
    loggers: Vec<Box<dyn MetricLogger>>,
}

impl CompositeLogger {
    pub fn new(loggers: Vec<Box<dyn MetricLogger>>) -> Self {
        Self { loggers }
    }

    pub fn add(&mut self, logger: Box<dyn MetricLogger>) {
        self.loggers.push(logger);
    }
}

impl MetricLogger for CompositeLogger {
    fn log_episode(&self, env_id: &str, summary: &EpisodeSummary) {
        for logger in &self.loggers {
            logger.log_episode(env_id, summary);
        }
    }

    fn log_diagnostic(&self, env_id: &str, diagnostic: &Diagnostic) {
        for logger in &self.loggers {
            logger.log_diagnostic(env_id, diagnostic);
        }
    }

    fn close(&self) {
        for logger in &self.loggers {
            logger.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::DiagnosticKind;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl MetricLogger for Recorder {
        fn log_episode(&self, env_id: &str, summary: &EpisodeSummary) {
            self.events
                .lock()
                .unwrap()
                .push(format!("episode {} {}", env_id, summary.steps));
        }

        fn log_diagnostic(&self, env_id: &str, diagnostic: &Diagnostic) {
            self.events
                .lock()
                .unwrap()
                .push(format!("diagnostic {} {:?}", env_id, diagnostic.kind));
        }

        fn close(&self) {
            self.events.lock().unwrap().push("close".to_string());
        }
    }

    #[test]
    fn test_composite_dispatches_to_all() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut composite = CompositeLogger::default();
        composite.add(Box::new(Recorder {
            events: events.clone(),
        }));
        composite.add(Box::new(Recorder {
            events: events.clone(),
        }));
        composite.add(Box::new(NoOpLogger));

        let summary = EpisodeSummary {
            steps: 7,
            total_reward: 1.0,
            total_cost: 0.0,
        };
        composite.log_episode("SafetyBallRun-v0", &summary);
        composite.log_diagnostic(
            "SafetyBallRun-v0",
            &Diagnostic::advisory(DiagnosticKind::NoRenderModes, "no modes"),
        );
        composite.close();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], "episode SafetyBallRun-v0 7");
        assert_eq!(events[2], "diagnostic SafetyBallRun-v0 NoRenderModes");
        assert_eq!(events[5], "close");
    }
}
