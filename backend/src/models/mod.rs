//! Domain models for the trust model analysis
//!
//! - **entity**: entity classes, tracked metrics and their file names
//! - **grid**: timestep × entity tables
//! - **run**: one loaded simulation run
//! - **summary**: per-timestep and cross-run statistics

pub mod entity;
pub mod grid;
pub mod run;
pub mod summary;

// Re-exports
pub use entity::{files, EntityClass, Metric, MARKER_FILE};
pub use grid::{Grid, GridShapeError, MetricGrid, RatioGrid, Shape};
pub use run::{EntityTables, Run};
pub use summary::{
    ClassPooled, ClassSummary, CrossRunSummary, PooledPoint, PooledSeries, RunSummary,
    SummaryPoint, SummarySeries,
};
