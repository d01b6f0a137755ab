//! Shared fixtures: writes simulation run directories to disk

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use trust_model_analysis_core_rs::models::files;

/// Render a table in the simulation's CSV layout
pub fn table_csv(timesteps: &[f64], rows: &[Vec<f64>]) -> String {
    let entities = rows.first().map_or(0, Vec::len);
    let mut out = String::new();
    for e in 0..entities {
        out.push_str(&format!(",{e}"));
    }
    out.push('\n');
    for (t, row) in timesteps.iter().zip(rows) {
        out.push_str(&t.to_string());
        for v in row {
            out.push_str(&format!(",{v}"));
        }
        out.push('\n');
    }
    out
}

fn constant_rows(timesteps: usize, entities: usize, value: f64) -> Vec<Vec<f64>> {
    vec![vec![value; entities]; timesteps]
}

/// Builder for one run directory
///
/// Defaults: inventory `10 * (e + 1)`, price 2.0, quality 4.0, trust 0.5,
/// gossip trust 0.25 (only written when enabled).
#[derive(Debug, Clone)]
pub struct RunBuilder {
    timesteps: Vec<f64>,
    files: BTreeMap<&'static str, String>,
}

impl RunBuilder {
    pub fn new(timesteps: &[f64], retailers: usize, suppliers: usize) -> Self {
        let n = timesteps.len();
        let inventory = |entities: usize| -> Vec<Vec<f64>> {
            (0..n)
                .map(|_| (0..entities).map(|e| 10.0 * (e + 1) as f64).collect())
                .collect()
        };

        let mut files = BTreeMap::new();
        let tables = [
            (files::RETAILER_INVENTORIES, inventory(retailers)),
            (files::RETAILER_PRICES, constant_rows(n, retailers, 2.0)),
            (files::RETAILER_QUALITIES, constant_rows(n, retailers, 4.0)),
            (files::TRUST_IN_RETAILERS, constant_rows(n, retailers, 0.5)),
            (files::SUPPLIER_INVENTORIES, inventory(suppliers)),
            (files::SUPPLIER_PRICES, constant_rows(n, suppliers, 2.0)),
            (files::SUPPLIER_QUALITIES, constant_rows(n, suppliers, 4.0)),
            (files::TRUST_IN_SUPPLIERS, constant_rows(n, suppliers, 0.5)),
        ];
        for (name, rows) in tables {
            files.insert(name, table_csv(timesteps, &rows));
        }

        Self {
            timesteps: timesteps.to_vec(),
            files,
        }
    }

    /// Add `GossipTrust.csv` for `retailers` entities
    pub fn with_gossip(mut self, retailers: usize) -> Self {
        let rows = constant_rows(self.timesteps.len(), retailers, 0.25);
        self.files
            .insert(files::GOSSIP_TRUST, table_csv(&self.timesteps, &rows));
        self
    }

    /// Replace one file's rows, keeping the run's timesteps
    pub fn table(mut self, name: &'static str, rows: Vec<Vec<f64>>) -> Self {
        self.files.insert(name, table_csv(&self.timesteps, &rows));
        self
    }

    /// Replace one file's contents verbatim
    pub fn raw(mut self, name: &'static str, contents: &str) -> Self {
        self.files.insert(name, contents.to_string());
        self
    }

    pub fn without(mut self, name: &'static str) -> Self {
        self.files.remove(name);
        self
    }

    /// Write the run to `root/name`, returning its directory
    pub fn write(&self, root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, contents) in &self.files {
            fs::write(dir.join(file), contents).unwrap();
        }
        dir
    }
}
