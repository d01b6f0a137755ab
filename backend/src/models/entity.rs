//! Entity classes and tracked metrics
//!
//! The simulation writes one CSV file per (entity class, metric) pair with
//! fixed names. This module is the single place those names live.

use serde::{Deserialize, Serialize};
use std::fmt;

/// File names written by the simulation
pub mod files {
    pub const RETAILER_INVENTORIES: &str = "RetailerInventories.csv";
    pub const RETAILER_PRICES: &str = "RetailerPrices.csv";
    pub const RETAILER_QUALITIES: &str = "RetailerQualities.csv";
    pub const SUPPLIER_INVENTORIES: &str = "SupplierInventories.csv";
    pub const SUPPLIER_PRICES: &str = "SupplierPrices.csv";
    pub const SUPPLIER_QUALITIES: &str = "SupplierQualities.csv";
    pub const TRUST_IN_RETAILERS: &str = "TrustInRetailers.csv";
    pub const TRUST_IN_SUPPLIERS: &str = "TrustInSuppliers.csv";
    pub const GOSSIP_TRUST: &str = "GossipTrust.csv";
}

/// File whose presence marks a directory as a simulation run
pub const MARKER_FILE: &str = files::RETAILER_INVENTORIES;

/// Population an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    Retailer,
    Supplier,
}

impl EntityClass {
    pub const ALL: [EntityClass; 2] = [EntityClass::Retailer, EntityClass::Supplier];

    /// Capitalized name used in file and directory names
    pub fn label(self) -> &'static str {
        match self {
            EntityClass::Retailer => "Retailer",
            EntityClass::Supplier => "Supplier",
        }
    }

    /// Plural lowercase noun for chart axes ("Number of retailers")
    pub fn plural(self) -> &'static str {
        match self {
            EntityClass::Retailer => "retailers",
            EntityClass::Supplier => "suppliers",
        }
    }

    /// Per-class output directory name (`RetailerData`, `SupplierData`)
    pub fn output_dir_name(self) -> &'static str {
        match self {
            EntityClass::Retailer => "RetailerData",
            EntityClass::Supplier => "SupplierData",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// Quantity tracked per entity and timestep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Inventory,
    Price,
    Quality,
    Trust,
    GossipTrust,
}

impl Metric {
    /// Metrics every run carries for both classes
    pub const REQUIRED: [Metric; 4] = [
        Metric::Inventory,
        Metric::Price,
        Metric::Quality,
        Metric::Trust,
    ];

    /// CSV file holding this metric for `class`
    ///
    /// Returns `None` for combinations the simulation never writes
    /// (gossip trust is only recorded for retailers).
    ///
    /// # Example
    /// ```
    /// use trust_model_analysis_core_rs::{EntityClass, Metric};
    ///
    /// assert_eq!(
    ///     Metric::Trust.file_name(EntityClass::Supplier),
    ///     Some("TrustInSuppliers.csv")
    /// );
    /// assert_eq!(Metric::GossipTrust.file_name(EntityClass::Supplier), None);
    /// ```
    pub fn file_name(self, class: EntityClass) -> Option<&'static str> {
        use EntityClass::*;
        use Metric::*;
        match (class, self) {
            (Retailer, Inventory) => Some(files::RETAILER_INVENTORIES),
            (Retailer, Price) => Some(files::RETAILER_PRICES),
            (Retailer, Quality) => Some(files::RETAILER_QUALITIES),
            (Retailer, Trust) => Some(files::TRUST_IN_RETAILERS),
            (Retailer, GossipTrust) => Some(files::GOSSIP_TRUST),
            (Supplier, Inventory) => Some(files::SUPPLIER_INVENTORIES),
            (Supplier, Price) => Some(files::SUPPLIER_PRICES),
            (Supplier, Quality) => Some(files::SUPPLIER_QUALITIES),
            (Supplier, Trust) => Some(files::TRUST_IN_SUPPLIERS),
            (Supplier, GossipTrust) => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Inventory => "inventory",
            Metric::Price => "price",
            Metric::Quality => "quality",
            Metric::Trust => "trust",
            Metric::GossipTrust => "gossip trust",
        };
        f.write_str(name)
    }
}
