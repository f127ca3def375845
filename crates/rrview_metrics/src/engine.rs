//! The metrics engine and the position lookup shared by every metric.

use crate::error::MetricsError;
use rrview_common::{InternalError, NetIndex, NodeId, Position, RrvResult};
use rrview_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use rrview_graph::{Net, NodeKind, Route, RoutingResourceGraph};
use rrview_layout::{CoordinateMap, CoordinateMapper};

/// Computes metrics over one graph, one routing solution and one layout.
///
/// The engine holds only borrows. Metric methods live in the
/// [`wirelength`](crate::wirelength), [`bbox`](crate::bbox) and
/// [`congestion`](crate::congestion) modules.
pub struct MetricsEngine<'a> {
    pub(crate) graph: &'a RoutingResourceGraph,
    pub(crate) route: &'a Route,
    pub(crate) mapper: &'a CoordinateMapper,
    pub(crate) sink: &'a DiagnosticSink,
}

/// Positions found for a set of nodes, plus what went wrong finding them.
pub(crate) struct Located {
    pub positions: Vec<Position>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> MetricsEngine<'a> {
    /// Creates an engine. The mapper may still be unconfigured; metrics then
    /// fail with [`MetricsError::Unconfigured`].
    pub fn new(
        graph: &'a RoutingResourceGraph,
        route: &'a Route,
        mapper: &'a CoordinateMapper,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            graph,
            route,
            mapper,
            sink,
        }
    }

    /// The graph this engine reads.
    pub fn graph(&self) -> &'a RoutingResourceGraph {
        self.graph
    }

    /// The routing solution this engine reads.
    pub fn route(&self) -> &'a Route {
        self.route
    }

    /// Returns the floorplan position of a node.
    ///
    /// # Errors
    ///
    /// [`MetricsError::Unconfigured`] without a layout and
    /// [`MetricsError::UnknownNode`] for ids absent from the graph.
    pub fn coordinate_of(&self, id: NodeId) -> Result<Option<Position>, MetricsError> {
        Ok(self.coords()?.coordinate_of(self.graph, id)?)
    }

    pub(crate) fn coords(&self) -> Result<&'a CoordinateMap, MetricsError> {
        Ok(self.mapper.map()?)
    }

    pub(crate) fn net(&self, index: NetIndex) -> Result<&'a Net, MetricsError> {
        self.route.net(index).ok_or(MetricsError::UnknownNet(index))
    }

    /// Re-finds a net taken from `route.nets()`; failure means the route's
    /// serial-index lookup is stale.
    pub(crate) fn indexed_net(&self, index: NetIndex) -> RrvResult<&'a Net> {
        self.route
            .net(index)
            .ok_or_else(|| InternalError::new(format!("net {index} missing from the route index")))
    }

    /// Looks up the positions of `ids` whose graph kind passes `keep`.
    ///
    /// Ids missing from the graph (`E103`) and nodes with no position
    /// (`W206`) are left out and reported. Order follows `ids`.
    pub(crate) fn locate(
        &self,
        map: &CoordinateMap,
        ids: impl IntoIterator<Item = NodeId>,
        keep: impl Fn(NodeKind) -> bool,
    ) -> Located {
        let mut located = Located {
            positions: Vec::new(),
            diagnostics: Vec::new(),
        };
        for id in ids {
            let Some(node) = self.graph.node(id) else {
                located.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::UNKNOWN_NODE_REFERENCE,
                    format!("node {id} is not in the routing-resource graph"),
                    Location::None,
                ));
                continue;
            };
            if !keep(node.kind) {
                continue;
            }
            match map.position_of(node) {
                Some(p) => located.positions.push(p),
                None => located.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::UNMAPPABLE_NODE,
                        format!("{} node {id} has no floorplan position", node.kind),
                        Location::None,
                    )
                    .with_note("the node is excluded from the metric"),
                ),
            }
        }
        located
    }

    /// Emits diagnostics gathered for `net`, tagging each with the net.
    pub(crate) fn report_for_net(&self, net: &Net, diagnostics: Vec<Diagnostic>) {
        let tag = format!("in net {} ({})", net.index, net.name);
        self.sink
            .extend(diagnostics.into_iter().map(|d| d.with_note(tag.clone())));
    }
}
