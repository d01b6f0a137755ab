//! Time-series charts with error bars

use crate::models::entity::EntityClass;
use crate::models::summary::{CrossRunSummary, PooledSeries, RunSummary, SummarySeries};
use crate::report::ReportError;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// (timestep, mean, error) triples
type ErrorBarPoints = Vec<(f64, f64, f64)>;

fn summary_points(timesteps: &[f64], series: &SummarySeries) -> ErrorBarPoints {
    timesteps
        .iter()
        .zip(&series.points)
        .filter_map(|(&t, p)| p.map(|p| (t, p.mean, p.stdev)))
        .collect()
}

fn pooled_points(timesteps: &[f64], series: &PooledSeries) -> ErrorBarPoints {
    timesteps
        .iter()
        .zip(&series.points)
        .filter_map(|(&t, p)| p.map(|p| (t, p.mean, p.pooled_stdev)))
        .collect()
}

/// Quality/price and trust charts of one run (plus gossip trust when the run
/// has it)
///
/// Files, in the run's own directory `dir`: `Quality_Price.svg`,
/// `Trust.svg`, `GossipTrust.svg`.
pub fn render_run_charts(
    summary: &RunSummary,
    class: EntityClass,
    dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    let class_summary = summary.class(class);
    let name = &summary.name;

    let mut charts = vec![
        (
            dir.join("Quality_Price.svg"),
            format!("{name} {} quality/price over time", class.plural()),
            "Quality/Price",
            summary_points(&summary.timesteps, &class_summary.ratio),
        ),
        (
            dir.join("Trust.svg"),
            format!("{name} trust in {} over time", class.plural()),
            "Trust",
            summary_points(&summary.timesteps, &class_summary.trust),
        ),
    ];
    if let Some(gossip) = &class_summary.gossip_trust {
        charts.push((
            dir.join("GossipTrust.svg"),
            format!("{name} gossip trust over time"),
            "Gossip trust",
            summary_points(&summary.timesteps, gossip),
        ));
    }

    render_all(charts)
}

/// Pooled quality/price and trust charts over all runs
///
/// Files: `Overall_Quality_Price.svg`, `Overall_Trust.svg`.
pub fn render_overall_charts(
    cross: &CrossRunSummary,
    class: EntityClass,
    dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    let pooled = cross.class(class);
    let runs = cross.run_count;

    render_all(vec![
        (
            dir.join("Overall_Quality_Price.svg"),
            format!("Mean {} quality/price over time ({runs} runs)", class.plural()),
            "Quality/Price",
            pooled_points(&cross.timesteps, &pooled.ratio),
        ),
        (
            dir.join("Overall_Trust.svg"),
            format!("Mean trust in {} over time ({runs} runs)", class.plural()),
            "Trust",
            pooled_points(&cross.timesteps, &pooled.trust),
        ),
    ])
}

fn render_all(
    charts: Vec<(PathBuf, String, &str, ErrorBarPoints)>,
) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::new();
    for (path, caption, y_desc, points) in charts {
        if points.is_empty() {
            continue;
        }
        draw_error_bars(&path, &caption, y_desc, &points).map_err(|e| ReportError::Render {
            path: path.clone(),
            message: e.to_string(),
        })?;
        written.push(path);
    }
    Ok(written)
}

/// Pad a degenerate or tight range so points do not sit on the frame
fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    } else {
        (min - 1.0, max + 1.0)
    }
}

fn draw_error_bars(
    out_path: &Path,
    caption: &str,
    y_desc: &str,
    points: &[(f64, f64, f64)],
) -> Result<(), Box<dyn std::error::Error>> {
    let (x_min, x_max) = padded_range(
        points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min),
        points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max),
    );
    let (y_min, y_max) = padded_range(
        points.iter().map(|p| p.1 - p.2).fold(f64::INFINITY, f64::min),
        points.iter().map(|p| p.1 + p.2).fold(f64::NEG_INFINITY, f64::max),
    );
    let cap = (x_max - x_min) * 0.004;

    let root = SVGBackend::new(out_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Step number")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, m, e)| PathElement::new(vec![(x, m - e), (x, m + e)], BLACK)),
    )?;
    chart.draw_series(points.iter().flat_map(|&(x, m, e)| {
        [m - e, m + e]
            .into_iter()
            .map(move |y| PathElement::new(vec![(x - cap, y), (x + cap, y)], BLACK))
    }))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, m, _)| Circle::new((x, m), 3, BLACK.filled())),
    )?;

    root.present()?;
    Ok(())
}
