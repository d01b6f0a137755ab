//! Python bindings (feature `pyo3`)

pub mod analysis;
pub mod types;
