//! Run model
//!
//! A [`Run`] is one simulation execution loaded from its output directory:
//! a shared timestep axis plus the metric grids of both entity classes.
//!
//! # Invariants
//!
//! 1. Every grid of the run has `timesteps.len()` rows
//! 2. All grids of one entity class have the same entity count
//! 3. `timesteps` is strictly increasing

use crate::models::entity::{EntityClass, Metric};
use crate::models::grid::MetricGrid;
use serde::{Deserialize, Serialize};

/// Metric grids of one entity class within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTables {
    pub inventory: MetricGrid,
    pub price: MetricGrid,
    pub quality: MetricGrid,
    pub trust: MetricGrid,
    /// Present only for retailers in friendly gossip mode
    pub gossip_trust: Option<MetricGrid>,
}

impl EntityTables {
    /// Entity count shared by all grids of this class
    pub fn entity_count(&self) -> usize {
        self.inventory.entity_count()
    }

    pub fn grid(&self, metric: Metric) -> Option<&MetricGrid> {
        match metric {
            Metric::Inventory => Some(&self.inventory),
            Metric::Price => Some(&self.price),
            Metric::Quality => Some(&self.quality),
            Metric::Trust => Some(&self.trust),
            Metric::GossipTrust => self.gossip_trust.as_ref(),
        }
    }

    /// All grids present, tagged with their metric
    pub fn grids(&self) -> impl Iterator<Item = (Metric, &MetricGrid)> + '_ {
        Metric::REQUIRED
            .into_iter()
            .chain(std::iter::once(Metric::GossipTrust))
            .filter_map(move |metric| self.grid(metric).map(|grid| (metric, grid)))
    }
}

/// One simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Source directory name
    pub name: String,

    /// Timestep values, one per grid row
    pub timesteps: Vec<f64>,

    pub retailers: EntityTables,
    pub suppliers: EntityTables,

    /// SHA-256 over the bytes of every file the run was loaded from
    pub source_digest: String,
}

impl Run {
    pub fn tables(&self, class: EntityClass) -> &EntityTables {
        match class {
            EntityClass::Retailer => &self.retailers,
            EntityClass::Supplier => &self.suppliers,
        }
    }

    pub fn timestep_count(&self) -> usize {
        self.timesteps.len()
    }
}
