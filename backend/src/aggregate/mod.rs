//! Cross-Entity Aggregator
//!
//! Reduces a run's metric grids over the entity axis, one
//! (mean, standard deviation) pair per timestep, and pools the per-run
//! series of several runs into cross-run series.
//!
//! # Critical Invariants
//!
//! 1. Standard deviations are population deviations (ddof = 0)
//! 2. Undefined ratios (zero price) never enter a mean or deviation
//! 3. Pooled deviation is `sqrt(sum(run_stdev^2)) / runs`, not a combined
//!    variance
//! 4. Runs are only pooled when their timestep axes are identical

pub mod pool;
pub mod run;
pub mod stats;

pub use pool::{pool, summarize_runs};
pub use run::{derive_ratio, summarize_class, summarize_grid, summarize_ratio, summarize_run};
pub use stats::{mean_stdev, mean_stdev_defined};

use crate::models::grid::Shape;
use thiserror::Error;

/// Errors raised while aggregating
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("Quality grid is {quality}, price grid is {price}")]
    ShapeMismatch { quality: Shape, price: Shape },

    #[error("Misaligned timesteps across runs: {run} does not match {reference}")]
    MisalignedTimesteps { run: String, reference: String },

    #[error("No runs to aggregate")]
    NoRuns,
}
