//! Reporting
//!
//! Turns an [`Analysis`] into files:
//! - `RetailerData/` and `SupplierData/`: the pooled `Overall_*` charts, and
//!   under `runs/<run>/` inventory histograms at the first, middle and last
//!   timestep plus quality/price and trust charts with error bars
//! - `summary.json`: every summary series, the pooled series and the
//!   skipped runs
//!
//! Charts are SVG files drawn with `plotters`.

pub mod chart;
pub mod histogram;
pub mod json;

pub use chart::{render_overall_charts, render_run_charts};
pub use histogram::{histogram_counts, render_inventory_histograms, snapshot_indices, Bin};
pub use json::{write_summary_json, BatchReport, RunRecord, SkippedRecord};

use crate::config::AnalysisConfig;
use crate::models::entity::EntityClass;
use crate::pipeline::Analysis;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the JSON report written next to the chart directories
pub const SUMMARY_FILE: &str = "summary.json";

/// Subdirectory of a class directory holding one directory per run
pub const RUNS_DIR: &str = "runs";

/// Errors raised while writing output
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create `path` and its parents; an existing directory is not an error
pub fn ensure_dir(path: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Output directory of one entity class, created on demand
pub fn class_dir(output_dir: &Path, class: EntityClass) -> Result<PathBuf, ReportError> {
    let dir = output_dir.join(class.output_dir_name());
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Output directory of one run inside a class directory, created on demand
///
/// Runs live under `runs/` so no run name can clash with the pooled charts.
pub fn run_dir(class_dir: &Path, run: &str) -> Result<PathBuf, ReportError> {
    let dir = class_dir.join(RUNS_DIR).join(run);
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Render every chart of an analysis and write its JSON report
///
/// The pooled `Overall_*` charts are left out when the runs could not be
/// pooled. Returns the paths of all files written.
pub fn render_batch(
    analysis: &Analysis,
    config: &AnalysisConfig,
) -> Result<Vec<PathBuf>, ReportError> {
    let output_dir = config.output_dir();
    let mut written = Vec::new();

    for class in EntityClass::ALL {
        let dir = class_dir(output_dir, class)?;

        for (run, summary) in analysis.runs.iter().zip(&analysis.summaries) {
            let out = run_dir(&dir, &run.name)?;
            written.extend(render_inventory_histograms(
                run,
                class,
                &out,
                config.histogram_bins,
            )?);
            written.extend(render_run_charts(summary, class, &out)?);
        }
        if let Ok(cross_run) = &analysis.cross_run {
            written.extend(render_overall_charts(cross_run, class, &dir)?);
        }
    }

    written.push(write_batch_summary(analysis, output_dir)?);

    info!(files = written.len(), output = %output_dir.display(), "report written");
    Ok(written)
}

/// Write only `summary.json` into `output_dir`, creating it if needed
pub fn write_batch_summary(
    analysis: &Analysis,
    output_dir: &Path,
) -> Result<PathBuf, ReportError> {
    ensure_dir(output_dir)?;
    let json_path = output_dir.join(SUMMARY_FILE);
    write_summary_json(&BatchReport::from_analysis(analysis), &json_path)?;
    Ok(json_path)
}

/// Format a timestep for file names and captions: integral values without
/// a fractional part
pub(crate) fn format_timestep(t: f64) -> String {
    if t.fract() == 0.0 && t.abs() < 1e15 {
        format!("{}", t as i64)
    } else {
        format!("{t}")
    }
}
