//! Inventory histograms

use crate::models::entity::EntityClass;
use crate::models::run::Run;
use crate::report::{format_timestep, ReportError};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// One histogram bin, `[start, end)` (the last bin also includes `end`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins spanning the range of `values`
///
/// All-equal values get a single bin of width 1 centred on the value. An
/// empty slice or `bins == 0` gives no bins.
///
/// # Example
/// ```
/// use trust_model_analysis_core_rs::report::histogram_counts;
///
/// let bins = histogram_counts(&[0.0, 1.0, 1.0, 4.0], 4);
/// let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
/// assert_eq!(counts, vec![1, 2, 0, 1]);
/// ```
pub fn histogram_counts(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Timestep indices to snapshot: first, middle and last
///
/// The middle index is `(len + 1) / 2`, clamped to the last index.
/// Duplicates are removed, so short runs give fewer snapshots.
pub fn snapshot_indices(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let last = len - 1;
    let mut indices = vec![0, ((len + 1) / 2).min(last), last];
    indices.dedup();
    indices
}

/// Histograms of entity inventories at the snapshot timesteps of `run`
///
/// Files are named `Inventory<timestep>.svg`; `dir` is the run's own
/// directory.
pub fn render_inventory_histograms(
    run: &Run,
    class: EntityClass,
    dir: &Path,
    bins: usize,
) -> Result<Vec<PathBuf>, ReportError> {
    let inventory = &run.tables(class).inventory;
    let mut written = Vec::new();

    for idx in snapshot_indices(run.timestep_count()) {
        let counts = histogram_counts(inventory.row(idx), bins);
        if counts.is_empty() {
            continue;
        }

        let t = format_timestep(run.timesteps[idx]);
        let path = dir.join(format!("Inventory{t}.svg"));
        let caption = format!("{} inventory at t={}", run.name, t);
        let y_desc = format!("Number of {}", class.plural());

        draw_histogram(&path, &caption, &y_desc, &counts).map_err(|e| ReportError::Render {
            path: path.clone(),
            message: e.to_string(),
        })?;
        written.push(path);
    }

    Ok(written)
}

fn draw_histogram(
    out_path: &Path,
    caption: &str,
    y_desc: &str,
    bins: &[Bin],
) -> Result<(), Box<dyn std::error::Error>> {
    let x_min = bins.first().map_or(0.0, |b| b.start);
    let x_max = bins.last().map_or(1.0, |b| b.end);
    let y_max = bins
        .iter()
        .map(|b| b.count as f64)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let root = SVGBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0f64..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Inventory")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLUE.mix(0.6).filled())
    }))?;

    root.present()?;
    Ok(())
}
