//! Cross-run pooling

use crate::aggregate::AggregateError;
use crate::models::entity::EntityClass;
use crate::models::summary::{
    ClassPooled, CrossRunSummary, PooledPoint, PooledSeries, RunSummary, SummarySeries,
};

/// Pool per-run series timestep by timestep
///
/// At each timestep, over the `n` runs with a defined point there:
/// - `mean` is the mean of the run means
/// - `pooled_stdev` is `sqrt(sum(run_stdev^2)) / n`
///
/// A timestep with no defined point in any run is `None`. The output is as
/// long as the longest input.
///
/// # Example
/// ```
/// use trust_model_analysis_core_rs::aggregate::pool;
/// use trust_model_analysis_core_rs::models::{SummaryPoint, SummarySeries};
///
/// let point = |mean, stdev| Some(SummaryPoint { mean, stdev, samples: 3, undefined: 0 });
/// let a = SummarySeries::new(vec![point(1.0, 0.1)]);
/// let b = SummarySeries::new(vec![point(3.0, 0.1)]);
///
/// let pooled = pool(&[&a, &b]);
/// let p = pooled.get(0).unwrap();
/// assert_eq!(p.mean, 2.0);
/// assert!((p.pooled_stdev - 0.02f64.sqrt() / 2.0).abs() < 1e-12);
/// ```
pub fn pool(series: &[&SummarySeries]) -> PooledSeries {
    let len = series.iter().map(|s| s.len()).max().unwrap_or(0);

    let points = (0..len)
        .map(|t| {
            let (runs, mean_sum, var_sum) = series
                .iter()
                .filter_map(|s| s.get(t))
                .fold((0usize, 0.0f64, 0.0f64), |(n, m, v), p| {
                    (n + 1, m + p.mean, v + p.stdev * p.stdev)
                });
            (runs > 0).then(|| PooledPoint {
                mean: mean_sum / runs as f64,
                pooled_stdev: var_sum.sqrt() / runs as f64,
                runs,
            })
        })
        .collect();

    PooledSeries { points }
}

/// Pool the ratio and trust series of every run, for both entity classes
///
/// # Errors
///
/// - `NoRuns` when `summaries` is empty
/// - `MisalignedTimesteps` when a run's timestep axis differs from the
///   first run's
pub fn summarize_runs(summaries: &[RunSummary]) -> Result<CrossRunSummary, AggregateError> {
    let reference = summaries.first().ok_or(AggregateError::NoRuns)?;

    if let Some(misaligned) = summaries
        .iter()
        .find(|s| s.timesteps != reference.timesteps)
    {
        return Err(AggregateError::MisalignedTimesteps {
            run: misaligned.name.clone(),
            reference: reference.name.clone(),
        });
    }

    let pool_class = |class: EntityClass| {
        let ratio: Vec<&SummarySeries> = summaries.iter().map(|s| &s.class(class).ratio).collect();
        let trust: Vec<&SummarySeries> = summaries.iter().map(|s| &s.class(class).trust).collect();
        ClassPooled {
            class,
            ratio: pool(&ratio),
            trust: pool(&trust),
        }
    };

    Ok(CrossRunSummary {
        timesteps: reference.timesteps.clone(),
        run_count: summaries.len(),
        retailers: pool_class(EntityClass::Retailer),
        suppliers: pool_class(EntityClass::Supplier),
    })
}
