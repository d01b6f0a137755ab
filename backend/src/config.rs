//! Analysis configuration
//!
//! Everything the loader and the reporting layer need to know about a batch
//! is carried in an explicit [`AnalysisConfig`]: the root directory holding
//! the run subdirectories, the trust propagation mode the simulation ran in,
//! and how strictly timestep axes are checked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown gossip mode '{0}' (expected f/friendly, p/public or 0/off)")]
    UnknownGossipMode(String),

    #[error("Unknown timestep policy '{0}' (expected strict or last-read)")]
    UnknownTimestepPolicy(String),

    #[error("Histogram bin count must be positive")]
    ZeroBins,

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Trust propagation mode the simulation was run with
///
/// Only `Friendly` changes what the loader does: it additionally expects
/// `GossipTrust.csv` in every run and summarizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GossipMode {
    Friendly,
    Public,
    #[default]
    Off,
}

impl GossipMode {
    /// Whether runs carry a gossip trust table
    pub fn has_gossip_trust(self) -> bool {
        matches!(self, GossipMode::Friendly)
    }
}

impl FromStr for GossipMode {
    type Err = ConfigError;

    /// Accepts the single-letter flags of the simulation scripts
    /// (`f`, `p`, `0`) as well as the full names.
    ///
    /// # Example
    /// ```
    /// use trust_model_analysis_core_rs::GossipMode;
    ///
    /// assert_eq!("f".parse::<GossipMode>().unwrap(), GossipMode::Friendly);
    /// assert_eq!("Public".parse::<GossipMode>().unwrap(), GossipMode::Public);
    /// assert_eq!("0".parse::<GossipMode>().unwrap(), GossipMode::Off);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "friendly" => Ok(GossipMode::Friendly),
            "p" | "public" => Ok(GossipMode::Public),
            "0" | "off" => Ok(GossipMode::Off),
            _ => Err(ConfigError::UnknownGossipMode(s.to_string())),
        }
    }
}

impl fmt::Display for GossipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GossipMode::Friendly => write!(f, "friendly"),
            GossipMode::Public => write!(f, "public"),
            GossipMode::Off => write!(f, "off"),
        }
    }
}

/// How timestep columns of the files of one run are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimestepPolicy {
    /// Every file of a run must carry the identical timestep column
    #[default]
    Strict,
    /// Keep the column of the last file read, warn on divergence
    LastRead,
}

impl FromStr for TimestepPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TimestepPolicy::Strict),
            "last-read" | "last_read" | "lenient" => Ok(TimestepPolicy::LastRead),
            _ => Err(ConfigError::UnknownTimestepPolicy(s.to_string())),
        }
    }
}

/// Number of histogram bins when none is configured
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Configuration for one analysis pass
///
/// # Example
/// ```
/// use trust_model_analysis_core_rs::{AnalysisConfig, GossipMode};
///
/// let config = AnalysisConfig::new("runs", GossipMode::Friendly);
/// assert_eq!(config.output_dir(), config.root.as_path());
/// assert!(config.mode.has_gossip_trust());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory whose immediate subdirectories are simulation runs
    pub root: PathBuf,

    /// Directory receiving `RetailerData/`, `SupplierData/` and the JSON
    /// report; `None` writes next to the runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Trust propagation mode of the simulation
    pub mode: GossipMode,

    /// Timestep reconciliation between files of the same run
    pub timestep_policy: TimestepPolicy,

    /// Bins per inventory histogram
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output_dir: None,
            mode: GossipMode::default(),
            timestep_policy: TimestepPolicy::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl AnalysisConfig {
    /// Create a config that writes its output next to the runs
    pub fn new(root: impl Into<PathBuf>, mode: GossipMode) -> Self {
        Self {
            root: root.into(),
            mode,
            ..Self::default()
        }
    }

    /// Effective output directory: `output_dir` if set, else `root`
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(self.root.as_path())
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AnalysisConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.histogram_bins == 0 {
            return Err(ConfigError::ZeroBins);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gossip_mode_rejects_unknown_flag() {
        let err = "x".parse::<GossipMode>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGossipMode(ref s) if s == "x"));
    }

    #[test]
    fn test_only_friendly_mode_has_gossip_trust() {
        assert!(GossipMode::Friendly.has_gossip_trust());
        assert!(!GossipMode::Public.has_gossip_trust());
        assert!(!GossipMode::Off.has_gossip_trust());
    }

    #[test]
    fn test_timestep_policy_parse() {
        assert_eq!("strict".parse::<TimestepPolicy>().unwrap(), TimestepPolicy::Strict);
        assert_eq!("last-read".parse::<TimestepPolicy>().unwrap(), TimestepPolicy::LastRead);
        assert!("sometimes".parse::<TimestepPolicy>().is_err());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"root": "runs", "mode": "friendly"}"#).unwrap();
        assert_eq!(config.root, PathBuf::from("runs"));
        assert_eq!(config.mode, GossipMode::Friendly);
        assert_eq!(config.timestep_policy, TimestepPolicy::Strict);
        assert_eq!(config.histogram_bins, DEFAULT_HISTOGRAM_BINS);
        assert_eq!(config.output_dir(), Path::new("runs"));
    }

    #[test]
    fn test_explicit_output_dir_wins_over_root() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"root": "runs", "output_dir": "plots"}"#).unwrap();
        assert_eq!(config.output_dir(), Path::new("plots"));

        let mut config = AnalysisConfig::new("runs", GossipMode::Off);
        assert_eq!(config.output_dir(), Path::new("runs"));
        config.output_dir = Some(PathBuf::from("elsewhere"));
        assert_eq!(config.output_dir(), Path::new("elsewhere"));
    }

    #[test]
    fn test_zero_bins_rejected() {
        let config = AnalysisConfig {
            histogram_bins: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroBins)));
    }
}
