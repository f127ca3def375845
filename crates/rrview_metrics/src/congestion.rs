//! Wire and segment congestion.
//!
//! A wire's load is the number of distinct nets that use it, however often
//! each net lists it. Only CHANX/CHANY nodes of the graph carry load; route
//! hops naming ids the graph lacks are skipped here (they are reported by
//! route resolution and by the positional metrics).

use crate::engine::MetricsEngine;
use crate::error::MetricsError;
use rrview_common::{NetIndex, NodeId};
use rrview_diagnostics::{Diagnostic, DiagnosticCode, Location};
use rrview_layout::SegmentCoord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// The nets using one wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLoad {
    /// Number of distinct nets.
    pub load: usize,
    /// The nets, by serial index.
    pub nets: BTreeSet<NetIndex>,
}

/// Track occupancy of one physical channel slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentUsage {
    /// Tracks in the slot with at least one net.
    pub used: usize,
    /// Tracks in the slot.
    pub total: usize,
}

impl MetricsEngine<'_> {
    /// Load of every CHANX/CHANY node in the graph, including unused ones.
    pub fn wire_congestion(&self) -> BTreeMap<NodeId, WireLoad> {
        let mut loads: BTreeMap<NodeId, WireLoad> = self
            .graph
            .wires()
            .map(|node| (node.id, WireLoad::default()))
            .collect();
        for net in self.route.nets() {
            for id in net.nodes() {
                if let Some(entry) = loads.get_mut(&id) {
                    entry.nets.insert(net.index);
                }
            }
        }
        for entry in loads.values_mut() {
            entry.load = entry.nets.len();
        }
        loads
    }

    /// Used and total tracks of every channel slot.
    ///
    /// Wires with no place on the floorplan belong to no slot and are
    /// reported (`W206`).
    ///
    /// # Errors
    ///
    /// [`MetricsError::Unconfigured`] without a layout.
    pub fn segment_usage(&self) -> Result<BTreeMap<SegmentCoord, SegmentUsage>, MetricsError> {
        let layout = self.coords()?.layout();
        let loads = self.wire_congestion();
        let mut usage: BTreeMap<SegmentCoord, SegmentUsage> = BTreeMap::new();
        for node in self.graph.wires() {
            let Some(slot) = SegmentCoord::of(node, layout) else {
                self.sink.emit(Diagnostic::warning(
                    DiagnosticCode::UNMAPPABLE_NODE,
                    format!(
                        "{} node {} lies outside every channel of the {}x{} floorplan",
                        node.kind, node.id, layout.cols, layout.rows
                    ),
                    Location::None,
                ));
                continue;
            };
            let entry = usage.entry(slot).or_default();
            entry.total += 1;
            if loads.get(&node.id).is_some_and(|l| l.load > 0) {
                entry.used += 1;
            }
        }
        Ok(usage)
    }

    /// Peak congestion of every CHANX/CHANY node: the largest number of
    /// distinct nets recorded on any one track of the node.
    ///
    /// Tracks are the ones the router wrote next to each hop, so a route
    /// that disagrees with the graph about a wire's track spreads its load
    /// over several tracks instead of inflating one.
    pub fn segment_peak_congestion(&self) -> BTreeMap<NodeId, usize> {
        let mut per_track: HashMap<(NodeId, u32), HashSet<NetIndex>> = HashMap::new();
        for net in self.route.nets() {
            for hop in &net.hops {
                if self.graph.node(hop.node).is_some_and(|n| n.kind.is_channel()) {
                    per_track
                        .entry((hop.node, hop.track))
                        .or_default()
                        .insert(net.index);
                }
            }
        }
        let mut peaks: BTreeMap<NodeId, usize> =
            self.graph.wires().map(|node| (node.id, 0)).collect();
        for ((id, _), nets) in per_track {
            if let Some(peak) = peaks.get_mut(&id) {
                *peak = (*peak).max(nets.len());
            }
        }
        peaks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::*;
    use rrview_diagnostics::DiagnosticSink;
    use rrview_graph::{Net, Node, NodeKind, RouteHop};
    use rrview_layout::{ChannelAxis, ChannelRegion, CoordinateMapper};

    fn id(raw: u32) -> NodeId {
        NodeId::from_raw(raw)
    }

    #[test]
    fn distinct_nets_per_wire() {
        let g = graph();
        let r = route(vec![
            net(0, &[(1, NodeKind::Source), (42, NodeKind::Chany), (42, NodeKind::Chany)]),
            net(1, &[(42, NodeKind::Chany), (3, NodeKind::Chanx)]),
            net(2, &[(42, NodeKind::Chany)]),
        ]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let loads = engine.wire_congestion();
        assert_eq!(loads[&id(42)].load, 3);
        let nets: Vec<u32> = loads[&id(42)].nets.iter().map(|n| n.as_raw()).collect();
        assert_eq!(nets, vec![0, 1, 2]);
        assert_eq!(loads[&id(3)].load, 1);
        assert_eq!(loads[&id(4)].load, 0);
        assert!(!loads.contains_key(&id(1)));
        assert_eq!(loads.len(), g.wires().count());
    }

    #[test]
    fn congestion_uses_graph_kind() {
        let g = graph();
        // router calls node 5 a wire; the graph says IPIN
        let r = route(vec![net(0, &[(5, NodeKind::Chanx), (999, NodeKind::Chanx)])]);
        let m = CoordinateMapper::new();
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);
        let loads = engine.wire_congestion();
        assert!(!loads.contains_key(&id(5)));
        assert!(!loads.contains_key(&id(999)));
    }

    #[test]
    fn parallel_tracks_form_one_segment() {
        let g = graph();
        let r = route(vec![net(0, &[(42, NodeKind::Chany)]), net(1, &[(44, NodeKind::Chany)])]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let usage = engine.segment_usage().unwrap();
        let slot = SegmentCoord {
            axis: ChannelAxis::Vertical,
            x: 1,
            y: 2,
            region: ChannelRegion::Interior,
        };
        assert_eq!(usage[&slot], SegmentUsage { used: 2, total: 3 });

        let boundary = SegmentCoord {
            axis: ChannelAxis::Horizontal,
            x: 4,
            y: 0,
            region: ChannelRegion::IoBoundary,
        };
        assert_eq!(usage[&boundary], SegmentUsage { used: 0, total: 1 });
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn unplaceable_wire_reported() {
        let mut g = graph();
        g.insert_node(Node::at(60, NodeKind::Chanx, 9, 9, 0));
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let usage = engine.segment_usage().unwrap();
        let total: usize = usage.values().map(|u| u.total).sum();
        assert_eq!(total, g.wires().count() - 1);
        assert_eq!(sink.count_code(DiagnosticCode::UNMAPPABLE_NODE), 1);
    }

    #[test]
    fn segment_usage_needs_layout() {
        let g = graph();
        let r = route(vec![]);
        let m = CoordinateMapper::new();
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);
        assert!(matches!(engine.segment_usage(), Err(MetricsError::Unconfigured)));
    }

    #[test]
    fn peak_congestion_per_recorded_track() {
        let g = graph();
        let on_track = |net: u32, track: u32| {
            Net::new(net, format!("n{net}")).with_hop(RouteHop::new(42, NodeKind::Chany, 1, 2, track))
        };
        let r = route(vec![on_track(0, 1), on_track(1, 1), on_track(2, 5)]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let peaks = engine.segment_peak_congestion();
        assert_eq!(peaks[&id(42)], 2);
        assert_eq!(engine.wire_congestion()[&id(42)].load, 3);
        assert_eq!(peaks[&id(43)], 0);
    }
}
