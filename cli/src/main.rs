//! Trust model analysis CLI
//!
//! Summarizes every simulation run below a directory and renders its
//! histograms and error-bar charts.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use trust_model_analysis_core_rs::report::write_batch_summary;
use trust_model_analysis_core_rs::{
    analyze, render_batch, AnalysisConfig, GossipMode, TimestepPolicy,
};

#[derive(Parser)]
#[command(name = "trust-plotter")]
#[command(about = "Summary statistics and charts for trust model simulation runs", long_about = None)]
struct Cli {
    /// Gossip mode the simulation ran in: f (friendly), p (public) or 0 (off).
    /// Optional with --config; when given it overrides the file's mode
    #[arg(required_unless_present = "config")]
    mode: Option<GossipMode>,

    /// Directory containing one subdirectory per run
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Directory receiving RetailerData/, SupplierData/ and summary.json
    /// (defaults to the config file's output_dir, then to the root)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; explicit flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timestep reconciliation between files of a run: strict or last-read
    #[arg(long)]
    timesteps: Option<TimestepPolicy>,

    /// Bins per inventory histogram
    #[arg(long)]
    bins: Option<usize>,

    /// Only write summary.json, no charts
    #[arg(long)]
    no_plots: bool,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

impl Cli {
    /// Merge the config file (if any) with the flags; flags win
    fn into_config(self) -> Result<(AnalysisConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(output) = self.output {
            config.output_dir = Some(output);
        }
        if let Some(policy) = self.timesteps {
            config.timestep_policy = policy;
        }
        if let Some(bins) = self.bins {
            config.histogram_bins = bins;
        }
        config.validate()?;

        Ok((config, self.no_plots))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    let (config, no_plots) = cli.into_config()?;
    let output_dir = config.output_dir().to_path_buf();
    info!(root = %config.root.display(), mode = %config.mode, "analysing runs");

    let analysis = analyze(&config)
        .with_context(|| format!("Failed to analyse runs in {}", config.root.display()))?;

    if no_plots {
        let path = write_batch_summary(&analysis, &output_dir)?;
        info!(path = %path.display(), "summary written");
    } else {
        render_batch(&analysis, &config).context("Failed to write report")?;
    }

    if !analysis.skipped.is_empty() {
        warn!("{} run(s) skipped:", analysis.skipped.len());
        for skipped in &analysis.skipped {
            warn!("  {}: {}", skipped.name, skipped.error);
        }
    }

    println!(
        "Analysed {} run(s), skipped {}. Output in {}",
        analysis.runs.len(),
        analysis.skipped.len(),
        output_dir.display()
    );

    if let Err(error) = &analysis.cross_run {
        bail!("Per-run output written, but runs could not be pooled: {error}");
    }
    Ok(())
}
