//! Mean and population standard deviation

use crate::models::summary::SummaryPoint;

/// Mean and population standard deviation of `values`
///
/// Returns `None` for an empty slice.
///
/// # Example
/// ```
/// use trust_model_analysis_core_rs::aggregate::mean_stdev;
///
/// let point = mean_stdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert_eq!(point.mean, 5.0);
/// assert_eq!(point.stdev, 2.0);
/// ```
pub fn mean_stdev(values: &[f64]) -> Option<SummaryPoint> {
    summarize(values.iter().copied(), 0)
}

/// Like [`mean_stdev`], skipping undefined entries
///
/// Returns `None` when no entry is defined. Skipped entries are counted in
/// [`SummaryPoint::undefined`].
pub fn mean_stdev_defined(values: &[Option<f64>]) -> Option<SummaryPoint> {
    let undefined = values.iter().filter(|v| v.is_none()).count();
    summarize(values.iter().flatten().copied(), undefined)
}

fn summarize(values: impl Iterator<Item = f64> + Clone, undefined: usize) -> Option<SummaryPoint> {
    let (count, sum) = values
        .clone()
        .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v));
    if count == 0 {
        return None;
    }

    let mean = sum / count as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    Some(SummaryPoint {
        mean,
        stdev: variance.sqrt(),
        samples: count,
        undefined,
    })
}
