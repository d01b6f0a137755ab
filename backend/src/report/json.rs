//! JSON summary report

use crate::config::GossipMode;
use crate::models::summary::{CrossRunSummary, RunSummary};
use crate::pipeline::Analysis;
use crate::report::ReportError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A run left out of the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub name: String,
    pub reason: String,
}

/// Per-run statistics with the digest of the files they came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub source_digest: String,
    #[serde(flatten)]
    pub summary: RunSummary,
}

/// Serializable view of an [`Analysis`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub mode: GossipMode,
    pub runs: Vec<RunRecord>,
    /// Absent when the runs could not be pooled
    pub cross_run: Option<CrossRunSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_run_error: Option<String>,
    pub skipped: Vec<SkippedRecord>,
}

impl BatchReport {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            mode: analysis.mode,
            runs: analysis
                .runs
                .iter()
                .zip(&analysis.summaries)
                .map(|(run, summary)| RunRecord {
                    source_digest: run.source_digest.clone(),
                    summary: summary.clone(),
                })
                .collect(),
            cross_run: analysis.cross_run.as_ref().ok().cloned(),
            cross_run_error: analysis.cross_run.as_ref().err().map(|e| e.to_string()),
            skipped: analysis
                .skipped
                .iter()
                .map(|s| SkippedRecord {
                    name: s.name.clone(),
                    reason: s.error.to_string(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write `report` as pretty-printed JSON to `path`
pub fn write_summary_json(report: &BatchReport, path: &Path) -> Result<(), ReportError> {
    let json = report.to_json()?;
    std::fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
