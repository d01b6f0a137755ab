//! Analysis pipeline
//!
//! Runs discover → load → aggregate for one [`AnalysisConfig`]. Rendering is
//! left to [`crate::report`] so callers can stop after the statistics.

use crate::aggregate::{summarize_run, summarize_runs, AggregateError};
use crate::config::{AnalysisConfig, GossipMode};
use crate::loader::{load_batch, LoadError, SkippedRun};
use crate::models::run::Run;
use crate::models::summary::{CrossRunSummary, RunSummary};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop the whole analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No valid runs found ({skipped} skipped)")]
    NoValidRuns { skipped: usize },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Everything computed by one analysis pass
#[derive(Debug)]
pub struct Analysis {
    pub mode: GossipMode,
    /// Loaded runs, sorted by name
    pub runs: Vec<Run>,
    /// One summary per entry of `runs`, same order
    pub summaries: Vec<RunSummary>,
    /// Pooled series, or why the runs could not be pooled
    pub cross_run: Result<CrossRunSummary, AggregateError>,
    pub skipped: Vec<SkippedRun>,
}

impl Analysis {
    pub fn run_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.runs.iter().map(|r| r.name.as_str())
    }
}

/// Load every run below `config.root` and compute all statistics
///
/// Runs that fail to load are skipped (see [`crate::loader::load_batch`]).
///
/// # Errors
///
/// - `Load` when the root directory cannot be read
/// - `NoValidRuns` when every discovered run was skipped, or none exist
/// - `Aggregate` when a run's quality and price grids disagree in shape
///
/// Runs that do not share one timestep axis still produce an `Analysis`;
/// only its `cross_run` is an error.
pub fn analyze(config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    let batch = load_batch(config)?;

    if batch.is_empty() {
        return Err(AnalysisError::NoValidRuns {
            skipped: batch.skipped.len(),
        });
    }

    let summaries = batch
        .runs
        .iter()
        .map(summarize_run)
        .collect::<Result<Vec<_>, _>>()?;
    let cross_run = summarize_runs(&summaries);
    if let Err(error) = &cross_run {
        warn!(%error, "runs not pooled, per-run results are still reported");
    }

    for summary in &summaries {
        for class in [&summary.retailers, &summary.suppliers] {
            if class.undefined_ratios > 0 {
                warn!(
                    run = %summary.name,
                    class = %class.class,
                    undefined = class.undefined_ratios,
                    "zero prices left quality/price ratios undefined"
                );
            }
        }
    }

    info!(
        runs = batch.runs.len(),
        skipped = batch.skipped.len(),
        mode = %config.mode,
        "analysis complete"
    );

    Ok(Analysis {
        mode: config.mode,
        runs: batch.runs,
        summaries,
        cross_run,
        skipped: batch.skipped,
    })
}
