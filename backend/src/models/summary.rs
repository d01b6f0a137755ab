//! Summary records
//!
//! Per-run summaries reduce every metric grid over its entity axis, one
//! [`SummaryPoint`] per timestep. The cross-run summary then reduces those
//! per-run series into one [`PooledPoint`] per timestep.

use crate::models::entity::{EntityClass, Metric};
use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of one timestep of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryPoint {
    pub mean: f64,
    /// Population standard deviation (ddof = 0)
    pub stdev: f64,
    /// Values that entered the statistics
    pub samples: usize,
    /// Undefined values excluded from the statistics
    pub undefined: usize,
}

/// One summary point per timestep
///
/// A timestep is `None` when no entity had a defined value there.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummarySeries {
    pub points: Vec<Option<SummaryPoint>>,
}

impl SummarySeries {
    pub fn new(points: Vec<Option<SummaryPoint>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, t: usize) -> Option<&SummaryPoint> {
        self.points.get(t).and_then(Option::as_ref)
    }

    pub fn means(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.map(|p| p.mean)).collect()
    }

    pub fn stdevs(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.map(|p| p.stdev)).collect()
    }
}

/// Summary series of one entity class within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub class: EntityClass,
    pub entity_count: usize,
    pub inventory: SummarySeries,
    pub price: SummarySeries,
    pub quality: SummarySeries,
    pub trust: SummarySeries,
    /// Quality/price ratio
    pub ratio: SummarySeries,
    pub gossip_trust: Option<SummarySeries>,
    /// Ratio entries left undefined by a zero price, over all timesteps
    pub undefined_ratios: usize,
}

impl ClassSummary {
    pub fn series(&self, metric: Metric) -> Option<&SummarySeries> {
        match metric {
            Metric::Inventory => Some(&self.inventory),
            Metric::Price => Some(&self.price),
            Metric::Quality => Some(&self.quality),
            Metric::Trust => Some(&self.trust),
            Metric::GossipTrust => self.gossip_trust.as_ref(),
        }
    }
}

/// Statistics of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub timesteps: Vec<f64>,
    pub retailers: ClassSummary,
    pub suppliers: ClassSummary,
}

impl RunSummary {
    pub fn class(&self, class: EntityClass) -> &ClassSummary {
        match class {
            EntityClass::Retailer => &self.retailers,
            EntityClass::Supplier => &self.suppliers,
        }
    }
}

/// Cross-run statistics of one timestep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PooledPoint {
    /// Mean of the per-run means
    pub mean: f64,
    /// `sqrt(sum(run_stdev^2)) / runs`
    pub pooled_stdev: f64,
    /// Runs with a defined point at this timestep
    pub runs: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PooledSeries {
    pub points: Vec<Option<PooledPoint>>,
}

impl PooledSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, t: usize) -> Option<&PooledPoint> {
        self.points.get(t).and_then(Option::as_ref)
    }
}

/// Pooled headline metrics of one entity class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPooled {
    pub class: EntityClass,
    pub ratio: PooledSeries,
    pub trust: PooledSeries,
}

/// Statistics across every loaded run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRunSummary {
    pub timesteps: Vec<f64>,
    pub run_count: usize,
    pub retailers: ClassPooled,
    pub suppliers: ClassPooled,
}

impl CrossRunSummary {
    pub fn class(&self, class: EntityClass) -> &ClassPooled {
        match class {
            EntityClass::Retailer => &self.retailers,
            EntityClass::Supplier => &self.suppliers,
        }
    }
}
