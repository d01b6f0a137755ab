//! Per-run reduction over the entity axis

use crate::aggregate::stats::{mean_stdev, mean_stdev_defined};
use crate::aggregate::AggregateError;
use crate::models::entity::EntityClass;
use crate::models::grid::{Grid, MetricGrid, RatioGrid};
use crate::models::run::{EntityTables, Run};
use crate::models::summary::{ClassSummary, RunSummary, SummarySeries};

/// Elementwise quality / price
///
/// A zero price, or any quotient that is not finite, gives `None`.
///
/// # Example
/// ```
/// use trust_model_analysis_core_rs::aggregate::derive_ratio;
/// use trust_model_analysis_core_rs::models::Grid;
///
/// let quality = Grid::from_rows(vec![vec![4.0, 8.0, 1.0]]).unwrap();
/// let price = Grid::from_rows(vec![vec![2.0, 4.0, 0.0]]).unwrap();
/// let ratio = derive_ratio(&quality, &price).unwrap();
/// assert_eq!(ratio.row(0), &[Some(2.0), Some(2.0), None]);
/// ```
pub fn derive_ratio(quality: &MetricGrid, price: &MetricGrid) -> Result<RatioGrid, AggregateError> {
    if quality.shape() != price.shape() {
        return Err(AggregateError::ShapeMismatch {
            quality: quality.shape(),
            price: price.shape(),
        });
    }

    Ok(Grid::from_fn(quality.shape(), |t, e| {
        let (q, p) = (quality.row(t)[e], price.row(t)[e]);
        if p == 0.0 {
            return None;
        }
        let ratio = q / p;
        ratio.is_finite().then_some(ratio)
    }))
}

/// Mean and deviation over entities at every timestep
pub fn summarize_grid(grid: &MetricGrid) -> SummarySeries {
    SummarySeries::new(grid.rows().map(mean_stdev).collect())
}

/// Like [`summarize_grid`], excluding undefined ratios
pub fn summarize_ratio(grid: &RatioGrid) -> SummarySeries {
    SummarySeries::new(grid.rows().map(mean_stdev_defined).collect())
}

/// Summaries of every metric of one entity class, plus its quality/price ratio
pub fn summarize_class(
    class: EntityClass,
    tables: &EntityTables,
) -> Result<ClassSummary, AggregateError> {
    let ratio = derive_ratio(&tables.quality, &tables.price)?;

    Ok(ClassSummary {
        class,
        entity_count: tables.entity_count(),
        inventory: summarize_grid(&tables.inventory),
        price: summarize_grid(&tables.price),
        quality: summarize_grid(&tables.quality),
        trust: summarize_grid(&tables.trust),
        ratio: summarize_ratio(&ratio),
        gossip_trust: tables.gossip_trust.as_ref().map(summarize_grid),
        undefined_ratios: ratio.undefined_count(),
    })
}

/// Summaries of both entity classes of a run
pub fn summarize_run(run: &Run) -> Result<RunSummary, AggregateError> {
    Ok(RunSummary {
        name: run.name.clone(),
        timesteps: run.timesteps.clone(),
        retailers: summarize_class(EntityClass::Retailer, &run.retailers)?,
        suppliers: summarize_class(EntityClass::Supplier, &run.suppliers)?,
    })
}
