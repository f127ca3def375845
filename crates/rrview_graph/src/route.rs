//! Routing solutions: nets and their ordered hops through the graph.

use crate::node::NodeKind;
use crate::rrg::RoutingResourceGraph;
use rrview_common::{NetIndex, NodeId};
use rrview_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One hop of a routed net, as recorded by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteHop {
    /// The graph node the net passes through.
    pub node: NodeId,
    /// The node kind the router reported.
    pub kind: NodeKind,
    /// Grid column the router reported.
    pub x: u32,
    /// Grid row the router reported.
    pub y: u32,
    /// Pad, pin, class or track number the router reported.
    pub track: u32,
    /// 1-based line of the route file this hop came from (0 if built in code).
    pub line: u32,
}

impl RouteHop {
    /// Creates a hop that did not come from a file.
    pub fn new(node: u32, kind: NodeKind, x: u32, y: u32, track: u32) -> Self {
        Self {
            node: NodeId::from_raw(node),
            kind,
            x,
            y,
            track,
            line: 0,
        }
    }
}

/// One routed signal.
///
/// The hop order is significant: consecutive hops are routed connections, a
/// SOURCE comes first and SINKs appear at branch points. The same node may
/// appear more than once, including back to back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// Serial index of the net in the routing solution.
    pub index: NetIndex,
    /// The net's symbolic name.
    pub name: String,
    /// Whether the router listed this as a global (unrouted) net.
    pub is_global: bool,
    /// Hops in route order.
    pub hops: Vec<RouteHop>,
}

impl Net {
    /// Creates an empty, non-global net.
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index: NetIndex::from_raw(index),
            name: name.into(),
            is_global: false,
            hops: Vec::new(),
        }
    }

    /// Appends a hop and returns the net, for building nets in code.
    pub fn with_hop(mut self, hop: RouteHop) -> Self {
        self.hops.push(hop);
        self
    }

    /// Iterates over the node ids of the route, in order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.hops.iter().map(|hop| hop.node)
    }

    /// Returns the number of SINK hops (the net's branching factor).
    pub fn sink_count(&self) -> usize {
        self.hops.iter().filter(|h| h.kind == NodeKind::Sink).count()
    }
}

/// A routing solution: nets in the order the router listed them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    nets: Vec<Net>,
    /// Logic-block array size `(cols, rows)` declared by the route file.
    pub array_size: Option<(u32, u32)>,
    /// Auxiliary index: serial index to position in `nets` (rebuilt on deserialization).
    #[serde(skip)]
    by_index: HashMap<NetIndex, usize>,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a net, returning the net it replaced if the serial index was taken.
    ///
    /// A replaced net keeps its original position.
    pub fn insert_net(&mut self, net: Net) -> Option<Net> {
        match self.by_index.get(&net.index) {
            Some(&slot) => Some(std::mem::replace(&mut self.nets[slot], net)),
            None => {
                self.by_index.insert(net.index, self.nets.len());
                self.nets.push(net);
                None
            }
        }
    }

    /// Returns the net with the given serial index.
    pub fn net(&self, index: NetIndex) -> Option<&Net> {
        self.by_index.get(&index).map(|&slot| &self.nets[slot])
    }

    pub(crate) fn net_mut(&mut self, index: NetIndex) -> Option<&mut Net> {
        self.by_index.get(&index).map(|&slot| &mut self.nets[slot])
    }

    /// Returns all nets in file order.
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns the nets with exactly `sinks` SINK hops, in file order.
    pub fn nets_with_fanout(&self, sinks: usize) -> impl Iterator<Item = &Net> {
        self.nets.iter().filter(move |n| n.sink_count() == sinks)
    }

    /// A copy of this route keeping only the nets with exactly `sinks` SINK
    /// hops. The declared array size carries over.
    pub fn with_fanout(&self, sinks: usize) -> Route {
        let mut subset = Route {
            array_size: self.array_size,
            ..Route::default()
        };
        for net in self.nets_with_fanout(sinks) {
            subset.insert_net(net.clone());
        }
        subset
    }

    /// Checks every hop against the graph.
    ///
    /// Hops naming an id the graph does not contain are reported and dropped.
    /// Hops whose recorded kind disagrees with the graph are reported and
    /// kept; the graph's kind is authoritative for all later computation.
    pub fn resolve_against(mut self, graph: &RoutingResourceGraph, sink: &DiagnosticSink) -> Route {
        for net in &mut self.nets {
            let Net {
                index, name, hops, ..
            } = net;
            hops.retain(|hop| match graph.node(hop.node) {
                None => {
                    sink.emit(
                        Diagnostic::error(
                            DiagnosticCode::UNKNOWN_NODE_REFERENCE,
                            format!(
                                "net {index} ({name}) references unknown node {}",
                                hop.node
                            ),
                            hop_location(hop),
                        )
                        .with_note("the hop was dropped from the route"),
                    );
                    false
                }
                Some(node) => {
                    if node.kind != hop.kind {
                        sink.emit(Diagnostic::warning(
                            DiagnosticCode::ROUTE_KIND_MISMATCH,
                            format!(
                                "net {index} lists node {} as {}, but the graph has {}",
                                hop.node, hop.kind, node.kind
                            ),
                            hop_location(hop),
                        ));
                    }
                    true
                }
            });
        }
        self
    }

    /// Rebuilds the serial-index lookup after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.by_index.clear();
        for (slot, net) in self.nets.iter().enumerate() {
            self.by_index.insert(net.index, slot);
        }
    }
}

fn hop_location(hop: &RouteHop) -> Location {
    if hop.line == 0 {
        Location::None
    } else {
        Location::Line(hop.line)
    }
}
