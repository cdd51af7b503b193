//! Progress bar reporting for batch runs.

use envcheck::check::Diagnostic;
use envcheck::log::MetricLogger;
use envcheck::rollout::EpisodeSummary;
use indicatif::{ProgressBar, ProgressStyle};

/// Advances a progress bar once per finished episode.
pub struct ProgressLogger {
    bar: ProgressBar,
}

impl ProgressLogger {
    pub fn new(len: u64) -> anyhow::Result<Self> {
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }
}

impl MetricLogger for ProgressLogger {
    fn log_episode(&self, env_id: &str, _summary: &EpisodeSummary) {
        self.bar.set_message(env_id.to_string());
        self.bar.inc(1);
    }

    fn log_diagnostic(&self, _env_id: &str, _diagnostic: &Diagnostic) {}

    fn close(&self) {
        self.bar.finish_and_clear();
    }
}
