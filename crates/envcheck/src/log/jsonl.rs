//! JSON-lines report backend.

use super::MetricLogger;
use crate::check::Diagnostic;
use crate::rollout::EpisodeSummary;
use crate::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Record<'a> {
    Episode {
        env: &'a str,
        #[serde(flatten)]
        summary: &'a EpisodeSummary,
    },
    Diagnostic {
        env: &'a str,
        #[serde(flatten)]
        diagnostic: &'a Diagnostic,
    },
}

/// Logger that writes one JSON object per line.
pub struct JsonLinesLogger {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesLogger {
    /// Create (or truncate) the report file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    // A panic elsewhere must not silently truncate the report
    fn writer(&self) -> MutexGuard<'_, BufWriter<File>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, record: &Record<'_>) {
        let mut writer = self.writer();
        let mut write_line = || -> Result<()> {
            serde_json::to_writer(&mut *writer, record)?;
            writer.write_all(b"\n")?;
            Ok(())
        };
        if let Err(e) = write_line() {
            tracing::warn!(error = %e, "Failed to write report line");
        }
    }
}

impl MetricLogger for JsonLinesLogger {
    fn log_episode(&self, env_id: &str, summary: &EpisodeSummary) {
        self.write(&Record::Episode {
            env: env_id,
            summary,
        });
    }

    fn log_diagnostic(&self, env_id: &str, diagnostic: &Diagnostic) {
        self.write(&Record::Diagnostic {
            env: env_id,
            diagnostic,
        });
    }

    fn close(&self) {
        if let Err(e) = self.writer().flush() {
            tracing::warn!(error = %e, "Failed to flush report");
        }
    }
}
