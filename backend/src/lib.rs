//! Trust Model Analysis Core - Rust Engine
//!
//! Post-processes the output of agent-based trust model simulations
//! (retailers, suppliers, trust and gossip scores) into summary statistics
//! and charts.
//!
//! # Architecture
//!
//! - **config**: Explicit analysis configuration (root, gossip mode)
//! - **models**: Domain types (EntityClass, Metric, Grid, Run, summaries)
//! - **loader**: Run discovery and CSV parsing
//! - **aggregate**: Per-run and cross-run statistics
//! - **pipeline**: discover → load → aggregate
//! - **report**: SVG charts and JSON report
//!
//! # Critical Invariants
//!
//! 1. All grids of a run share its timestep axis
//! 2. Undefined quality/price ratios never enter a statistic
//! 3. One run failing to load never aborts the batch

// Module declarations
pub mod aggregate;
pub mod config;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;

// Re-exports for convenience
pub use aggregate::{summarize_run, summarize_runs, AggregateError};
pub use config::{AnalysisConfig, ConfigError, GossipMode, TimestepPolicy};
pub use loader::{discover_runs, load_batch, load_run, BatchLoad, LoadError, RunDir, SkippedRun};
pub use models::{
    entity::{EntityClass, Metric},
    run::{EntityTables, Run},
    summary::{CrossRunSummary, RunSummary, SummaryPoint, SummarySeries},
};
pub use pipeline::{analyze, Analysis, AnalysisError};
pub use report::{render_batch, ReportError};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn trust_model_analysis_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::analysis::PyAnalysis>()?;
    Ok(())
}
