//! Diff-aware complexity analysis: classification, scoring display, deltas,
//! the per-file pipeline and the Markdown report.

pub mod classify;
pub mod delta;
pub mod pipeline;
pub mod report;
pub mod score;

use serde::Serialize;

use crate::oracle::ComplexityMetrics;
pub use classify::SourceKind;

/// Outcome of analyzing one changed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Analysis {
    /// Not analyzed: unsupported source type or no head revision.
    Skipped,
    /// Oracle metrics at head, and at base when the file existed there.
    Analyzed {
        metrics: ComplexityMetrics,
        previous_metrics: Option<ComplexityMetrics>,
    },
}

/// Per-file result of one event run. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAnalysisResult {
    pub filename: String,
    pub kind: SourceKind,
    pub analysis: Analysis,
}

impl FileAnalysisResult {
    pub fn skipped(filename: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            filename: filename.into(),
            kind,
            analysis: Analysis::Skipped,
        }
    }

    pub fn analyzed(
        filename: impl Into<String>,
        kind: SourceKind,
        metrics: ComplexityMetrics,
        previous_metrics: Option<ComplexityMetrics>,
    ) -> Self {
        Self {
            filename: filename.into(),
            kind,
            analysis: Analysis::Analyzed {
                metrics,
                previous_metrics,
            },
        }
    }

    pub fn metrics(&self) -> Option<&ComplexityMetrics> {
        match &self.analysis {
            Analysis::Analyzed { metrics, .. } => Some(metrics),
            Analysis::Skipped => None,
        }
    }

    pub fn previous_metrics(&self) -> Option<&ComplexityMetrics> {
        match &self.analysis {
            Analysis::Analyzed {
                previous_metrics, ..
            } => previous_metrics.as_ref(),
            Analysis::Skipped => None,
        }
    }
}
