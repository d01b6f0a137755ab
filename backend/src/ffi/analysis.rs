//! PyO3 wrapper for the analysis pipeline

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::parse_analysis_config;
use crate::config::AnalysisConfig;
use crate::pipeline::{analyze, Analysis};
use crate::report::{render_batch, BatchReport};

/// Python wrapper for a completed analysis
///
/// # Example (from Python)
///
/// ```python
/// from trust_model_analysis_core_rs import Analysis
///
/// analysis = Analysis.run({"root": "runs", "mode": "f"})
/// print(analysis.run_names())
/// report = json.loads(analysis.summary_json())
/// analysis.render()
/// ```
#[pyclass(name = "Analysis")]
pub struct PyAnalysis {
    inner: Analysis,
    config: AnalysisConfig,
}

#[pymethods]
impl PyAnalysis {
    /// Load every run below `config["root"]` and compute all statistics
    ///
    /// # Errors
    ///
    /// Raises ValueError for an invalid config, RuntimeError when no run
    /// loads or runs cannot be pooled
    #[staticmethod]
    fn run(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let config = parse_analysis_config(config)?;
        let inner = analyze(&config)
            .map_err(|e| PyRuntimeError::new_err(format!("Analysis failed: {e}")))?;
        Ok(PyAnalysis { inner, config })
    }

    /// Names of the loaded runs
    fn run_names(&self) -> Vec<String> {
        self.inner.run_names().map(str::to_string).collect()
    }

    /// (name, reason) of every skipped run
    fn skipped(&self) -> Vec<(String, String)> {
        self.inner
            .skipped
            .iter()
            .map(|s| (s.name.clone(), s.error.to_string()))
            .collect()
    }

    /// Full report as a JSON string
    fn summary_json(&self) -> PyResult<String> {
        BatchReport::from_analysis(&self.inner)
            .to_json()
            .map_err(|e| PyRuntimeError::new_err(format!("{e}")))
    }

    /// Write charts and `summary.json`; returns the written paths
    fn render(&self) -> PyResult<Vec<String>> {
        let written = render_batch(&self.inner, &self.config)
            .map_err(|e| PyRuntimeError::new_err(format!("{e}")))?;
        Ok(written
            .into_iter()
            .map(|p| p.display().to_string())
            .collect())
    }
}
