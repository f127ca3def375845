//! Half-perimeter wirelength, real wire usage and their deviation.
//!
//! HPWL is the half perimeter of the box around every positioned node of a
//! net. Real wire usage counts the net's channel hops. Their difference says
//! how far a route strays from the ideal.

use crate::bbox::Bounds;
use crate::engine::{Located, MetricsEngine};
use crate::error::MetricsError;
use rayon::prelude::*;
use rrview_common::NetIndex;
use rrview_diagnostics::{Diagnostic, DiagnosticCode, Location};
use rrview_graph::Net;
use rrview_layout::CoordinateMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-net comparison of estimated and actual wirelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationMetrics {
    /// Half-perimeter wirelength in floorplan units.
    pub hpwl: f64,
    /// Number of CHANX/CHANY hops.
    pub real_wires: usize,
    /// `real_wires - hpwl`.
    pub absolute_deviation: f64,
    /// `absolute_deviation / hpwl * 100`, or 0 when `hpwl` is 0.
    pub relative_deviation: f64,
}

impl DeviationMetrics {
    /// Derives the deviation figures from HPWL and wire count.
    pub fn new(hpwl: f64, real_wires: usize) -> Self {
        let absolute_deviation = real_wires as f64 - hpwl;
        let relative_deviation = if hpwl > 0.0 {
            absolute_deviation / hpwl * 100.0
        } else {
            0.0
        };
        Self {
            hpwl,
            real_wires,
            absolute_deviation,
            relative_deviation,
        }
    }
}

/// HPWL over every net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HpwlSummary {
    /// Sum over all nets.
    pub total: f64,
    /// Mean over all nets; 0 for an empty route.
    pub average: f64,
    /// Largest per-net value; 0 for an empty route.
    pub max: f64,
    /// Smallest per-net value; 0 for an empty route.
    pub min: f64,
    /// Value per net, by serial index.
    pub per_net: BTreeMap<NetIndex, f64>,
}

impl HpwlSummary {
    /// Summarizes per-net metrics. Sums run in ascending serial-index order.
    pub fn from_metrics(metrics: &BTreeMap<NetIndex, DeviationMetrics>) -> Self {
        let per_net: BTreeMap<NetIndex, f64> =
            metrics.iter().map(|(&index, m)| (index, m.hpwl)).collect();
        let total: f64 = per_net.values().sum();
        let count = per_net.len();
        let (min, max) = per_net
            .values()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 0.0));
        Self {
            total,
            average: if count == 0 { 0.0 } else { total / count as f64 },
            max,
            min,
            per_net,
        }
    }
}

/// Deviation over every net, with rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationSummary {
    /// Per-net metrics, by serial index.
    pub nets: BTreeMap<NetIndex, DeviationMetrics>,
    /// Mean absolute deviation; 0 for an empty route.
    pub average_absolute: f64,
    /// Mean relative deviation in percent; 0 for an empty route.
    pub average_relative: f64,
}

impl DeviationSummary {
    /// Summarizes per-net metrics. Sums run in ascending serial-index order.
    pub fn from_metrics(metrics: BTreeMap<NetIndex, DeviationMetrics>) -> Self {
        let count = metrics.len();
        let mean = |f: fn(&DeviationMetrics) -> f64| {
            if count == 0 {
                0.0
            } else {
                metrics.values().map(f).sum::<f64>() / count as f64
            }
        };
        let average_absolute = mean(|m| m.absolute_deviation);
        let average_relative = mean(|m| m.relative_deviation);
        Self {
            nets: metrics,
            average_absolute,
            average_relative,
        }
    }

    /// The `top_n` nets with the largest absolute deviation, descending.
    /// Ties go to the lower serial index.
    pub fn rank_by_absolute(&self, top_n: usize) -> Vec<(NetIndex, DeviationMetrics)> {
        self.rank(top_n, |m| m.absolute_deviation)
    }

    /// The `top_n` nets with the largest relative deviation, descending.
    /// Ties go to the lower serial index.
    pub fn rank_by_relative(&self, top_n: usize) -> Vec<(NetIndex, DeviationMetrics)> {
        self.rank(top_n, |m| m.relative_deviation)
    }

    fn rank(
        &self,
        top_n: usize,
        key: fn(&DeviationMetrics) -> f64,
    ) -> Vec<(NetIndex, DeviationMetrics)> {
        let mut ranked: Vec<(NetIndex, DeviationMetrics)> =
            self.nets.iter().map(|(&i, &m)| (i, m)).collect();
        ranked.sort_by(|(ia, a), (ib, b)| key(b).total_cmp(&key(a)).then(ia.cmp(ib)));
        ranked.truncate(top_n);
        ranked
    }
}

impl MetricsEngine<'_> {
    /// HPWL of one net over its positioned nodes.
    ///
    /// A net with no positioned node has HPWL 0 and is reported (`W205`).
    pub fn hpwl(&self, index: NetIndex) -> Result<f64, MetricsError> {
        let map = self.coords()?;
        let net = self.net(index)?;
        let (hpwl, diagnostics) = self.net_hpwl(map, net);
        self.report_for_net(net, diagnostics);
        Ok(hpwl)
    }

    /// Number of CHANX/CHANY hops in one net, by the graph's node kinds.
    ///
    /// A wire visited twice counts twice.
    pub fn real_wire_usage(&self, index: NetIndex) -> Result<usize, MetricsError> {
        let net = self.net(index)?;
        Ok(self.net_wires(net))
    }

    /// HPWL, wire usage and deviation for one net.
    pub fn deviation(&self, index: NetIndex) -> Result<DeviationMetrics, MetricsError> {
        let map = self.coords()?;
        let net = self.net(index)?;
        let (hpwl, diagnostics) = self.net_hpwl(map, net);
        self.report_for_net(net, diagnostics);
        Ok(DeviationMetrics::new(hpwl, self.net_wires(net)))
    }

    /// Deviation metrics for every net, keyed by serial index.
    ///
    /// Nets are measured in parallel; diagnostics are emitted afterwards in
    /// ascending serial-index order.
    pub fn net_metrics(&self) -> Result<BTreeMap<NetIndex, DeviationMetrics>, MetricsError> {
        let map = self.coords()?;
        let measured: BTreeMap<NetIndex, (DeviationMetrics, Vec<Diagnostic>)> = self
            .route
            .nets()
            .par_iter()
            .map(|net| {
                let (hpwl, diagnostics) = self.net_hpwl(map, net);
                let metrics = DeviationMetrics::new(hpwl, self.net_wires(net));
                (net.index, (metrics, diagnostics))
            })
            .collect();

        let mut metrics = BTreeMap::new();
        for (index, (m, diagnostics)) in measured {
            self.report_for_net(self.indexed_net(index)?, diagnostics);
            metrics.insert(index, m);
        }
        Ok(metrics)
    }

    /// HPWL over every net.
    pub fn hpwl_summary(&self) -> Result<HpwlSummary, MetricsError> {
        Ok(HpwlSummary::from_metrics(&self.net_metrics()?))
    }

    /// Deviation over every net.
    pub fn deviation_summary(&self) -> Result<DeviationSummary, MetricsError> {
        Ok(DeviationSummary::from_metrics(self.net_metrics()?))
    }

    fn net_hpwl(&self, map: &CoordinateMap, net: &Net) -> (f64, Vec<Diagnostic>) {
        let Located {
            positions,
            mut diagnostics,
        } = self.locate(map, net.nodes(), |_| true);
        match Bounds::enclosing(positions) {
            Some(bounds) => (bounds.half_perimeter(), diagnostics),
            None => {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::NET_WITHOUT_POSITION,
                    "net has no positioned node; HPWL is 0",
                    Location::None,
                ));
                (0.0, diagnostics)
            }
        }
    }

    fn net_wires(&self, net: &Net) -> usize {
        net.nodes()
            .filter_map(|id| self.graph.node(id))
            .filter(|node| node.kind.is_channel())
            .count()
    }
}
