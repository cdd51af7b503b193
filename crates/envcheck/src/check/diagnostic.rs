//! Diagnostic records produced by the validators.

use crate::CheckError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Legal, but likely to cause trouble downstream
    Advisory,
    /// Contract violation; the check was aborted
    Fatal,
}

/// What a diagnostic is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    DictObservation,
    TupleObservation,
    ImageDtype,
    ImageBounds,
    ImageResolution,
    UnconventionalShape,
    ActionSpaceNotNormalized,
    NoRenderModes,
    Failure,
}

/// A single finding about an environment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn advisory(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Advisory,
            message: message.into(),
        }
    }

    /// Record a fatal error, e.g. for a batch report
    pub fn fatal(error: &CheckError) -> Self {
        Self {
            kind: DiagnosticKind::Failure,
            severity: Severity::Fatal,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// Outcome of a successful `check_env` run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// Advisory findings
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Advisory)
    }

    /// Number of findings of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Whether nothing was reported
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
