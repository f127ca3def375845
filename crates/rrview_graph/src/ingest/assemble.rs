//! Record-by-record graph assembly shared by the device-file parsers.

use crate::node::{Edge, Node};
use crate::rrg::RoutingResourceGraph;
use rrview_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location, RecordSection};

/// Builds a graph from records that were decoded one at a time.
///
/// Undecodable records become `E101`, edges with a missing endpoint `E102`
/// and repeated node ids `W201`. Record indices count every record of a
/// section, decoded or not.
pub(crate) struct GraphAssembler<'s> {
    graph: RoutingResourceGraph,
    sink: &'s DiagnosticSink,
}

impl<'s> GraphAssembler<'s> {
    pub fn new(sink: &'s DiagnosticSink) -> Self {
        Self {
            graph: RoutingResourceGraph::new(),
            sink,
        }
    }

    /// Adds node record `index`, or reports why it could not be decoded.
    pub fn node(&mut self, index: usize, record: Result<Node, String>) {
        let location = Location::Record {
            section: RecordSection::Node,
            index,
        };
        let node = match record {
            Ok(node) => node,
            Err(reason) => {
                self.sink.emit(Diagnostic::error(
                    DiagnosticCode::MALFORMED_RECORD,
                    format!("malformed node record: {reason}"),
                    location,
                ));
                return;
            }
        };
        let id = node.id;
        if let Some(previous) = self.graph.insert_node(node) {
            self.sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::DUPLICATE_NODE,
                    format!("node {id} defined more than once; the later record wins"),
                    location,
                )
                .with_note(format!("replaced a {} node", previous.kind)),
            );
        }
    }

    /// Adds edge record `index`. Call after every node has been added.
    pub fn edge(&mut self, index: usize, record: Result<Edge, String>) {
        let location = Location::Record {
            section: RecordSection::Edge,
            index,
        };
        let edge = match record {
            Ok(edge) => edge,
            Err(reason) => {
                self.sink.emit(Diagnostic::error(
                    DiagnosticCode::MALFORMED_RECORD,
                    format!("malformed edge record: {reason}"),
                    location,
                ));
                return;
            }
        };
        if let Err(err) = self.graph.add_edge(edge) {
            self.sink.emit(
                Diagnostic::error(
                    DiagnosticCode::UNKNOWN_EDGE_ENDPOINT,
                    format!("edge {} -> {}: {err}", edge.source, edge.sink),
                    location,
                )
                .with_note("the edge was skipped"),
            );
        }
    }

    pub fn finish(self) -> RoutingResourceGraph {
        self.graph
    }
}
