//! Batch checks over a registry.

use super::{run_episode, EpisodeSummary, RolloutConfig};
use crate::check::{check_env, CheckConfig, CheckReport, Diagnostic};
use crate::log::MetricLogger;
use crate::registry::Registry;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Which environments a batch run covers.
///
/// The enumerated ids are `Safety{agent}{task}-{version}` for every agent and
/// task; registered ids containing `marker` are covered too.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub agents: Vec<String>,
    pub tasks: Vec<String>,
    /// Substring selecting additional registered ids
    pub marker: String,
    pub version: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            agents: ["Ball", "Car", "Ant", "Drone"].map(String::from).to_vec(),
            tasks: ["Reach", "Circle", "Run", "Gather"].map(String::from).to_vec(),
            marker: "Safety".to_string(),
            version: "v0".to_string(),
        }
    }
}

impl SuiteConfig {
    pub fn agents(mut self, agents: &[&str]) -> Self {
        self.agents = agents.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn tasks(mut self, tasks: &[&str]) -> Self {
        self.tasks = tasks.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Ids of the agent x task product, agent-major
    pub fn enumerated_ids(&self) -> Vec<String> {
        self.agents
            .iter()
            .flat_map(|agent| {
                self.tasks
                    .iter()
                    .map(move |task| format!("Safety{}{}-{}", agent, task, self.version))
            })
            .collect()
    }

    /// Enumerated ids followed by any other registered id containing the marker
    pub fn rollout_ids(&self, registry: &Registry) -> Vec<String> {
        let mut ids = self.enumerated_ids();
        let extra: Vec<String> = registry
            .matching(&self.marker)
            .filter(|id| !ids.iter().any(|known| known == *id))
            .map(String::from)
            .collect();
        ids.extend(extra);
        ids
    }

    /// Registered ids containing the marker
    pub fn check_ids(&self, registry: &Registry) -> Vec<String> {
        registry.matching(&self.marker).map(String::from).collect()
    }
}

fn suite_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run one full episode for every rollout id.
///
/// Stops at the first failing environment; the error names its id.
pub fn run_suite(
    registry: &Registry,
    suite: &SuiteConfig,
    config: &RolloutConfig,
    logger: &dyn MetricLogger,
) -> Result<Vec<(String, EpisodeSummary)>> {
    let mut rng = suite_rng(config.seed);
    let mut summaries = Vec::new();

    for id in suite.rollout_ids(registry) {
        tracing::info!("Check {}...", id);
        let outcome = registry
            .make(&id)
            .and_then(|mut env| run_episode(&mut *env, config, &mut rng));

        match outcome {
            Ok(summary) => {
                logger.log_episode(&id, &summary);
                summaries.push((id, summary));
            }
            Err(e) => {
                let e = e.in_env(&id);
                logger.log_diagnostic(&id, &Diagnostic::fatal(&e));
                return Err(e);
            }
        }
    }

    Ok(summaries)
}

/// Run `check_env` on every registered id containing the marker.
pub fn check_suite(
    registry: &Registry,
    suite: &SuiteConfig,
    config: &CheckConfig,
    logger: &dyn MetricLogger,
) -> Result<Vec<(String, CheckReport)>> {
    let mut reports = Vec::new();

    for id in suite.check_ids(registry) {
        let outcome = registry.make(&id).and_then(|mut env| {
            let report = check_env(&mut *env, config)?;
            // The render check closes the env itself
            if config.skip_render_check {
                env.close();
            }
            Ok(report)
        });

        match outcome {
            Ok(report) => {
                for diagnostic in &report.diagnostics {
                    logger.log_diagnostic(&id, diagnostic);
                }
                tracing::debug!(env = %id, warnings = report.warnings().count(), "Checked");
                reports.push((id, report));
            }
            Err(e) => {
                let e = e.in_env(&id);
                logger.log_diagnostic(&id, &Diagnostic::fatal(&e));
                return Err(e);
            }
        }
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::testing::ScriptedEnv;
    use crate::check::Severity;
    use crate::env::TimeLimit;
    use crate::log::NoOpLogger;
    use crate::spaces::Value;
    use crate::CheckError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect {
        episodes: Mutex<Vec<String>>,
        diagnostics: Mutex<Vec<(String, Severity)>>,
    }

    impl MetricLogger for Collect {
        fn log_episode(&self, env_id: &str, _summary: &EpisodeSummary) {
            self.episodes.lock().unwrap().push(env_id.to_string());
        }

        fn log_diagnostic(&self, env_id: &str, diagnostic: &Diagnostic) {
            self.diagnostics
                .lock()
                .unwrap()
                .push((env_id.to_string(), diagnostic.severity));
        }
    }

    fn short_episode() -> TimeLimit<ScriptedEnv> {
        TimeLimit::new(ScriptedEnv::well_behaved(), 3)
    }

    fn small_suite() -> SuiteConfig {
        SuiteConfig::default().agents(&["Ball", "Car"]).tasks(&["Run"])
    }

    #[test]
    fn test_enumerated_ids() {
        let ids = SuiteConfig::default().enumerated_ids();
        assert_eq!(ids.len(), 16);
        assert_eq!(ids[0], "SafetyBallReach-v0");
        assert_eq!(ids[1], "SafetyBallCircle-v0");
        assert_eq!(ids[15], "SafetyDroneGather-v0");
    }

    #[test]
    fn test_rollout_ids_append_marker_matches_once() {
        let mut registry = Registry::new();
        registry.register("SafetyBallRun-v0", short_episode);
        registry.register("SafetyCarRun-v0", short_episode);
        registry.register("SafetyExtra-v1", short_episode);
        registry.register("CartPole-v1", short_episode);

        let ids = small_suite().rollout_ids(&registry);
        assert_eq!(ids, vec!["SafetyBallRun-v0", "SafetyCarRun-v0", "SafetyExtra-v1"]);
    }

    #[test]
    fn test_run_suite_logs_every_episode() {
        let mut registry = Registry::new();
        registry.register("SafetyBallRun-v0", short_episode);
        registry.register("SafetyCarRun-v0", short_episode);

        let logger = Collect::default();
        let config = RolloutConfig::default().seed(3);
        let summaries = run_suite(&registry, &small_suite(), &config, &logger).unwrap();

        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|(_, s)| s.steps == 3));
        assert_eq!(
            *logger.episodes.lock().unwrap(),
            vec!["SafetyBallRun-v0", "SafetyCarRun-v0"]
        );
    }

    #[test]
    fn test_run_suite_aborts_on_unregistered_id() {
        let mut registry = Registry::new();
        registry.register("SafetyBallRun-v0", short_episode);

        let logger = Collect::default();
        let err = run_suite(&registry, &small_suite(), &RolloutConfig::default(), &logger)
            .unwrap_err();

        assert!(matches!(err, CheckError::Env { ref id, .. } if id == "SafetyCarRun-v0"));
        assert!(matches!(err.root(), CheckError::UnknownEnv(_)));
        assert_eq!(
            *logger.diagnostics.lock().unwrap(),
            vec![("SafetyCarRun-v0".to_string(), Severity::Fatal)]
        );
    }

    #[test]
    fn test_check_suite_covers_marker_ids() {
        let mut registry = Registry::new();
        registry.register("SafetyBallRun-v0", ScriptedEnv::well_behaved);
        registry.register("CartPole-v1", || {
            let mut env = ScriptedEnv::well_behaved();
            env.step_return = Value::Int(0);
            env
        });

        let config = CheckConfig::default().seed(0);
        let reports = check_suite(&registry, &SuiteConfig::default(), &config, &NoOpLogger)
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "SafetyBallRun-v0");
    }

    #[test]
    fn test_check_suite_names_failing_env() {
        let mut registry = Registry::new();
        registry.register("SafetyBroken-v0", || {
            let mut env = ScriptedEnv::well_behaved();
            env.step_return = Value::Int(0);
            env
        });

        let suite = SuiteConfig::default();
        let err = check_suite(&registry, &suite, &CheckConfig::default(), &NoOpLogger).unwrap_err();
        assert!(err.to_string().starts_with("SafetyBroken-v0: "));
        assert!(matches!(err.root(), CheckError::Arity { method: "step", .. }));
    }
}
