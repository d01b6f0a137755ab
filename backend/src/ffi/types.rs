//! Type conversion utilities for FFI boundary
//!
//! Converts Python dicts into an [`AnalysisConfig`].

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::PathBuf;

use crate::config::{AnalysisConfig, GossipMode, TimestepPolicy};

/// Extract an optional string field from a Python dict
///
/// # Errors
/// Returns an error only if the field exists and is not a string
fn extract_string(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<String>> {
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.extract::<String>()?)),
        None => Ok(None),
    }
}

/// Build an [`AnalysisConfig`] from a Python dict
///
/// Required: `root`, `mode`. Optional: `output_dir` (defaults to `root`),
/// `timestep_policy`, `histogram_bins`.
///
/// # Errors
/// Raises ValueError if a required field is missing or a value is invalid
pub fn parse_analysis_config(dict: &Bound<'_, PyDict>) -> PyResult<AnalysisConfig> {
    let root = extract_string(dict, "root")?
        .ok_or_else(|| PyValueError::new_err("Missing required field 'root'"))?;
    let mode: GossipMode = extract_string(dict, "mode")?
        .ok_or_else(|| PyValueError::new_err("Missing required field 'mode'"))?
        .parse()
        .map_err(|e| PyValueError::new_err(format!("{e}")))?;

    let mut config = AnalysisConfig::new(PathBuf::from(root), mode);

    if let Some(output_dir) = extract_string(dict, "output_dir")? {
        config.output_dir = Some(PathBuf::from(output_dir));
    }
    if let Some(policy) = extract_string(dict, "timestep_policy")? {
        config.timestep_policy = policy
            .parse::<TimestepPolicy>()
            .map_err(|e| PyValueError::new_err(format!("{e}")))?;
    }
    if let Some(bins) = dict.get_item("histogram_bins")? {
        config.histogram_bins = bins.extract::<usize>().map_err(|_| {
            PyValueError::new_err("Field 'histogram_bins' must be a non-negative integer")
        })?;
    }

    config
        .validate()
        .map_err(|e| PyValueError::new_err(format!("{e}")))?;
    Ok(config)
}
