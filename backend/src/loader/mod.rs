//! Run Loader
//!
//! Discovers run directories below a root and parses each run's fixed set
//! of CSV files into a [`Run`].
//!
//! # Batch isolation
//!
//! A run that fails to load is recorded in [`BatchLoad::skipped`] and the
//! batch moves on. Only an unreadable root directory aborts the batch.
//!
//! # Example
//!
//! ```no_run
//! use trust_model_analysis_core_rs::{load_batch, AnalysisConfig, GossipMode};
//!
//! let config = AnalysisConfig::new("simulation_output", GossipMode::Friendly);
//! let batch = load_batch(&config).unwrap();
//! for skipped in &batch.skipped {
//!     eprintln!("{}: {}", skipped.name, skipped.error);
//! }
//! ```

pub mod table;

pub use table::{parse_table, read_table, MetricTable};

use crate::config::{AnalysisConfig, TimestepPolicy};
use crate::models::entity::{files, EntityClass, Metric, MARKER_FILE};
use crate::models::grid::{MetricGrid, Shape};
use crate::models::run::{EntityTables, Run};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that fail a single run (or, for `Io` on the root, the batch)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Missing data file {path} in run {run}")]
    MissingDataFile { run: String, path: PathBuf },

    #[error("Parse error in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Shape mismatch in run {run}: {class} {metric} is {found}, expected {expected}")]
    ShapeMismatch {
        run: String,
        class: EntityClass,
        metric: Metric,
        expected: Shape,
        found: Shape,
    },

    #[error("Timestep column of {path} differs from earlier files of run {run}")]
    TimestepMismatch { run: String, path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A directory recognised as a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    pub name: String,
    pub path: PathBuf,
}

/// A run left out of the batch, with the reason
#[derive(Debug)]
pub struct SkippedRun {
    pub name: String,
    pub error: LoadError,
}

/// Outcome of loading every run below a root
#[derive(Debug, Default)]
pub struct BatchLoad {
    pub runs: Vec<Run>,
    pub skipped: Vec<SkippedRun>,
}

impl BatchLoad {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// List the run directories directly below `root`, sorted by name
///
/// A subdirectory is a run when it contains [`MARKER_FILE`]; others are
/// ignored.
pub fn discover_runs(root: &Path) -> Result<Vec<RunDir>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut runs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_dir() {
            continue;
        }
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if path.join(MARKER_FILE).is_file() {
            runs.push(RunDir { name, path });
        } else {
            debug!(dir = %path.display(), "no {} found, not a run", MARKER_FILE);
        }
    }

    runs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(runs)
}

/// Load one run directory
///
/// Files are read in a fixed order (inventories, prices and qualities of
/// retailers then suppliers, the two trust files, then gossip trust), which
/// is the order `TimestepPolicy::LastRead` refers to.
pub fn load_run(dir: &RunDir, config: &AnalysisConfig) -> Result<Run, LoadError> {
    let mut reader = RunReader::new(dir, config.timestep_policy);

    let retailer_inventory = reader.read(files::RETAILER_INVENTORIES)?;
    let retailer_price = reader.read(files::RETAILER_PRICES)?;
    let retailer_quality = reader.read(files::RETAILER_QUALITIES)?;
    let supplier_inventory = reader.read(files::SUPPLIER_INVENTORIES)?;
    let supplier_price = reader.read(files::SUPPLIER_PRICES)?;
    let supplier_quality = reader.read(files::SUPPLIER_QUALITIES)?;
    let retailer_trust = reader.read(files::TRUST_IN_RETAILERS)?;
    let supplier_trust = reader.read(files::TRUST_IN_SUPPLIERS)?;
    let gossip_trust = if config.mode.has_gossip_trust() {
        Some(reader.read(files::GOSSIP_TRUST)?)
    } else {
        None
    };

    let retailers = EntityTables {
        inventory: retailer_inventory,
        price: retailer_price,
        quality: retailer_quality,
        trust: retailer_trust,
        gossip_trust,
    };
    let suppliers = EntityTables {
        inventory: supplier_inventory,
        price: supplier_price,
        quality: supplier_quality,
        trust: supplier_trust,
        gossip_trust: None,
    };

    let (timesteps, source_digest) = reader.finish();

    check_shapes(&dir.name, EntityClass::Retailer, &retailers, timesteps.len())?;
    check_shapes(&dir.name, EntityClass::Supplier, &suppliers, timesteps.len())?;

    Ok(Run {
        name: dir.name.clone(),
        timesteps,
        retailers,
        suppliers,
        source_digest,
    })
}

/// Discover and load every run below `config.root`
pub fn load_batch(config: &AnalysisConfig) -> Result<BatchLoad, LoadError> {
    let mut batch = BatchLoad::default();

    for dir in discover_runs(&config.root)? {
        match load_run(&dir, config) {
            Ok(run) => {
                info!(
                    run = %run.name,
                    timesteps = run.timestep_count(),
                    retailers = run.retailers.entity_count(),
                    suppliers = run.suppliers.entity_count(),
                    "loaded run"
                );
                batch.runs.push(run);
            }
            Err(error) => {
                warn!(run = %dir.name, %error, "skipping run");
                batch.skipped.push(SkippedRun {
                    name: dir.name,
                    error,
                });
            }
        }
    }

    Ok(batch)
}

/// Reads the files of one run, hashing their bytes and reconciling their
/// timestep columns
struct RunReader<'a> {
    dir: &'a RunDir,
    policy: TimestepPolicy,
    hasher: Sha256,
    timesteps: Option<Vec<f64>>,
}

impl<'a> RunReader<'a> {
    fn new(dir: &'a RunDir, policy: TimestepPolicy) -> Self {
        Self {
            dir,
            policy,
            hasher: Sha256::new(),
            timesteps: None,
        }
    }

    fn read(&mut self, file_name: &str) -> Result<MetricGrid, LoadError> {
        let path = self.dir.path.join(file_name);

        if !path.is_file() {
            return Err(LoadError::MissingDataFile {
                run: self.dir.name.clone(),
                path,
            });
        }

        let bytes = std::fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        self.hasher.update(&bytes);

        let MetricTable { timesteps, grid } = parse_table(&path, &bytes)?;
        self.reconcile(&path, timesteps)?;
        Ok(grid)
    }

    fn reconcile(&mut self, path: &Path, timesteps: Vec<f64>) -> Result<(), LoadError> {
        match &self.timesteps {
            Some(existing) if *existing != timesteps => match self.policy {
                TimestepPolicy::Strict => {
                    return Err(LoadError::TimestepMismatch {
                        run: self.dir.name.clone(),
                        path: path.to_path_buf(),
                    });
                }
                TimestepPolicy::LastRead => {
                    warn!(
                        run = %self.dir.name,
                        file = %path.display(),
                        "timestep column differs from earlier files, keeping the last one read"
                    );
                }
            },
            _ => {}
        }
        self.timesteps = Some(timesteps);
        Ok(())
    }

    fn finish(self) -> (Vec<f64>, String) {
        (
            self.timesteps.unwrap_or_default(),
            format!("{:x}", self.hasher.finalize()),
        )
    }
}

fn check_shapes(
    run: &str,
    class: EntityClass,
    tables: &EntityTables,
    timestep_count: usize,
) -> Result<(), LoadError> {
    let expected = Shape {
        timesteps: timestep_count,
        entities: tables.entity_count(),
    };
    for (metric, grid) in tables.grids() {
        if grid.shape() != expected {
            return Err(LoadError::ShapeMismatch {
                run: run.to_string(),
                class,
                metric,
                expected,
                found: grid.shape(),
            });
        }
    }
    Ok(())
}
