//! Tests for per-run and cross-run aggregation
//!
//! Uses small hand-computed examples; the randomized checks live in
//! `test_statistics_properties.rs`.

mod common;

use common::RunBuilder;
use trust_model_analysis_core_rs::aggregate::{derive_ratio, summarize_grid};
use trust_model_analysis_core_rs::models::{files, Grid};
use trust_model_analysis_core_rs::{
    analyze, load_batch, summarize_run, summarize_runs, AggregateError, AnalysisConfig,
    AnalysisError, GossipMode,
};

const EPS: f64 = 1e-12;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Quality / price ratio
// ============================================================================

#[test]
fn test_two_entity_ratio_example() {
    // price = [2, 4], quality = [4, 8] -> ratio = [2, 2], mean 2, stdev 0
    let price = Grid::from_rows(vec![vec![2.0, 4.0]]).unwrap();
    let quality = Grid::from_rows(vec![vec![4.0, 8.0]]).unwrap();

    let ratio = derive_ratio(&quality, &price).unwrap();
    assert_eq!(ratio.shape(), price.shape());
    assert_eq!(ratio.row(0), &[Some(2.0), Some(2.0)]);

    let tmp = tempfile::tempdir().unwrap();
    RunBuilder::new(&[0.0], 2, 1)
        .table(files::RETAILER_PRICES, vec![vec![2.0, 4.0]])
        .table(files::RETAILER_QUALITIES, vec![vec![4.0, 8.0]])
        .write(tmp.path(), "run");
    let batch = load_batch(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    let summary = summarize_run(&batch.runs[0]).unwrap();

    let point = summary.retailers.ratio.get(0).unwrap();
    assert_eq!(point.mean, 2.0);
    assert_eq!(point.stdev, 0.0);
    assert_eq!(point.samples, 2);
}

#[test]
fn test_zero_price_ratio_is_undefined_and_excluded() {
    let tmp = tempfile::tempdir().unwrap();
    RunBuilder::new(&[0.0, 1.0], 3, 1)
        .table(
            files::RETAILER_PRICES,
            vec![vec![2.0, 0.0, 4.0], vec![0.0, 0.0, 0.0]],
        )
        .table(
            files::RETAILER_QUALITIES,
            vec![vec![4.0, 9.0, 16.0], vec![1.0, 1.0, 1.0]],
        )
        .write(tmp.path(), "run");

    let batch = load_batch(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    let summary = summarize_run(&batch.runs[0]).unwrap();
    let ratio = &summary.retailers.ratio;

    // Timestep 0: ratios [2, undefined, 4]
    let point = ratio.get(0).unwrap();
    assert_eq!(point.mean, 3.0);
    assert_eq!(point.stdev, 1.0);
    assert_eq!(point.samples, 2);
    assert_eq!(point.undefined, 1);
    assert!(point.mean.is_finite());

    // Timestep 1: every price zero
    assert!(ratio.get(1).is_none());
    assert_eq!(summary.retailers.undefined_ratios, 4);
    assert_eq!(summary.suppliers.undefined_ratios, 0);
}

// ============================================================================
// Per-timestep summaries
// ============================================================================

#[test]
fn test_summaries_cover_every_metric() {
    let tmp = tempfile::tempdir().unwrap();
    RunBuilder::new(&[0.0, 1.0, 2.0], 4, 2)
        .with_gossip(4)
        .table(
            files::TRUST_IN_RETAILERS,
            vec![
                vec![0.0, 0.0, 1.0, 1.0],
                vec![0.5, 0.5, 0.5, 0.5],
                vec![1.0, 2.0, 3.0, 4.0],
            ],
        )
        .write(tmp.path(), "run");

    let batch = load_batch(&AnalysisConfig::new(tmp.path(), GossipMode::Friendly)).unwrap();
    let summary = summarize_run(&batch.runs[0]).unwrap();
    let retailers = &summary.retailers;

    assert_eq!(summary.timesteps, vec![0.0, 1.0, 2.0]);
    assert_eq!(retailers.entity_count, 4);
    for series in [
        &retailers.inventory,
        &retailers.price,
        &retailers.quality,
        &retailers.trust,
        &retailers.ratio,
    ] {
        assert_eq!(series.len(), 3);
    }

    // Population stdev (ddof = 0)
    assert_eq!(retailers.trust.get(0).unwrap().mean, 0.5);
    assert_eq!(retailers.trust.get(0).unwrap().stdev, 0.5);
    assert_eq!(retailers.trust.get(1).unwrap().stdev, 0.0);
    assert_eq!(retailers.trust.get(2).unwrap().mean, 2.5);
    assert_close(retailers.trust.get(2).unwrap().stdev, 1.25f64.sqrt());

    // Inventory fixture is 10, 20, 30, 40
    assert_eq!(retailers.inventory.get(0).unwrap().mean, 25.0);

    let gossip = retailers.gossip_trust.as_ref().unwrap();
    assert_eq!(gossip.get(2).unwrap().mean, 0.25);
    assert!(summary.suppliers.gossip_trust.is_none());
}

#[test]
fn test_summarize_grid_matches_row_statistics() {
    let grid = Grid::from_rows(vec![vec![1.0, 2.0, 3.0, 4.0], vec![-1.0, 1.0, -1.0, 1.0]]).unwrap();
    let series = summarize_grid(&grid);

    assert_eq!(series.get(0).unwrap().mean, 2.5);
    assert_close(series.get(0).unwrap().stdev, 1.25f64.sqrt());
    assert_eq!(series.get(1).unwrap().mean, 0.0);
    assert_eq!(series.get(1).unwrap().stdev, 1.0);
}

// ============================================================================
// Cross-run pooling
// ============================================================================

/// Trust rows [0.4, 0.6] have mean 0.5 and population stdev 0.1
fn trust_run(shift: f64) -> RunBuilder {
    RunBuilder::new(&[0.0, 1.0], 2, 2).table(
        files::TRUST_IN_RETAILERS,
        vec![vec![0.4 + shift, 0.6 + shift]; 2],
    )
}

#[test]
fn test_pooled_stdev_example() {
    let tmp = tempfile::tempdir().unwrap();
    trust_run(0.0).write(tmp.path(), "run_a");
    trust_run(0.2).write(tmp.path(), "run_b");

    let analysis = analyze(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    let cross_run = analysis.cross_run.as_ref().unwrap();
    let trust = &cross_run.retailers.trust;

    let point = trust.get(0).unwrap();
    assert_eq!(point.runs, 2);
    assert_close(point.mean, 0.6);
    // sqrt(0.1^2 + 0.1^2) / 2
    assert!((point.pooled_stdev - 0.0707).abs() < 1e-4);
    assert_close(point.pooled_stdev, 0.02f64.sqrt() / 2.0);
    assert_eq!(cross_run.run_count, 2);
}

#[test]
fn test_pooled_stdev_is_not_combined_variance() {
    // Run means 0 and 10 with zero spread: a combined variance would be 25,
    // the pooled formula gives 0
    let tmp = tempfile::tempdir().unwrap();
    RunBuilder::new(&[0.0], 2, 2)
        .table(files::TRUST_IN_SUPPLIERS, vec![vec![0.0, 0.0]])
        .write(tmp.path(), "low");
    RunBuilder::new(&[0.0], 2, 2)
        .table(files::TRUST_IN_SUPPLIERS, vec![vec![10.0, 10.0]])
        .write(tmp.path(), "high");

    let analysis = analyze(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    let cross_run = analysis.cross_run.as_ref().unwrap();
    let point = cross_run.suppliers.trust.get(0).unwrap();

    assert_eq!(point.mean, 5.0);
    assert_eq!(point.pooled_stdev, 0.0);
}

#[test]
fn test_pooled_ratio_uses_ratio_stdevs() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["a", "b", "c"] {
        RunBuilder::new(&[0.0], 2, 2)
            .table(files::RETAILER_QUALITIES, vec![vec![2.0, 6.0]])
            .write(tmp.path(), name);
    }

    let analysis = analyze(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    let cross_run = analysis.cross_run.as_ref().unwrap();
    let point = cross_run.retailers.ratio.get(0).unwrap();

    // Each run: ratios [1, 3], mean 2, stdev 1 -> pooled sqrt(3) / 3
    assert_close(point.mean, 2.0);
    assert_close(point.pooled_stdev, 3f64.sqrt() / 3.0);
    assert_eq!(point.runs, 3);
}

#[test]
fn test_runs_may_differ_in_entity_count() {
    let tmp = tempfile::tempdir().unwrap();
    RunBuilder::new(&[0.0, 1.0], 2, 3).write(tmp.path(), "small");
    RunBuilder::new(&[0.0, 1.0], 7, 1).write(tmp.path(), "large");

    let analysis = analyze(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    assert_eq!(analysis.summaries.len(), 2);
    assert_eq!(analysis.cross_run.unwrap().retailers.ratio.len(), 2);
}

#[test]
fn test_misaligned_timesteps_across_runs() {
    let tmp = tempfile::tempdir().unwrap();
    RunBuilder::new(&[0.0, 1.0, 2.0], 2, 2).write(tmp.path(), "run_a");
    RunBuilder::new(&[0.0, 5.0, 10.0], 2, 2).write(tmp.path(), "run_b");

    let batch = load_batch(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    let summaries: Vec<_> = batch
        .runs
        .iter()
        .map(|r| summarize_run(r).unwrap())
        .collect();

    assert_eq!(
        summarize_runs(&summaries),
        Err(AggregateError::MisalignedTimesteps {
            run: "run_b".to_string(),
            reference: "run_a".to_string(),
        })
    );

    // The batch itself still succeeds, only pooling fails
    let analysis = analyze(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();
    assert_eq!(analysis.summaries.len(), 2);
    assert!(matches!(
        analysis.cross_run,
        Err(AggregateError::MisalignedTimesteps { .. })
    ));
}

#[test]
fn test_short_run_keeps_per_run_summaries() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["a", "b", "c"] {
        RunBuilder::new(&[0.0, 1.0, 2.0], 2, 2).write(tmp.path(), name);
    }
    RunBuilder::new(&[0.0, 1.0], 2, 2).write(tmp.path(), "d_aborted");

    let analysis = analyze(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap();

    let names: Vec<&str> = analysis.run_names().collect();
    assert_eq!(names, vec!["a", "b", "c", "d_aborted"]);
    assert_eq!(analysis.summaries.len(), 4);
    assert!(analysis.skipped.is_empty());
    assert_eq!(
        analysis.cross_run,
        Err(AggregateError::MisalignedTimesteps {
            run: "d_aborted".to_string(),
            reference: "a".to_string(),
        })
    );
}

#[test]
fn test_no_valid_runs() {
    let tmp = tempfile::tempdir().unwrap();
    RunBuilder::new(&[0.0], 2, 2)
        .without(files::TRUST_IN_RETAILERS)
        .write(tmp.path(), "broken");

    let err = analyze(&AnalysisConfig::new(tmp.path(), GossipMode::Off)).unwrap_err();
    assert!(matches!(err, AnalysisError::NoValidRuns { skipped: 1 }));
}

// ============================================================================
// Batch isolation
// ============================================================================

#[test]
fn test_skipped_run_does_not_change_aggregate() {
    let clean = tempfile::tempdir().unwrap();
    let dirty = tempfile::tempdir().unwrap();
    for root in [clean.path(), dirty.path()] {
        trust_run(0.0).write(root, "run_a");
        trust_run(0.3).write(root, "run_b");
    }
    trust_run(0.1)
        .raw(files::SUPPLIER_PRICES, ",0,1\n0,2\n1,2,2\n")
        .write(dirty.path(), "run_c");

    let clean = analyze(&AnalysisConfig::new(clean.path(), GossipMode::Off)).unwrap();
    let dirty = analyze(&AnalysisConfig::new(dirty.path(), GossipMode::Off)).unwrap();

    assert!(clean.skipped.is_empty());
    assert_eq!(dirty.skipped.len(), 1);
    assert_eq!(dirty.skipped[0].name, "run_c");
    assert_eq!(clean.cross_run, dirty.cross_run);
    assert_eq!(clean.summaries, dirty.summaries);
}
