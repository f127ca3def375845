//! `rrview coords`: floorplan positions of graph nodes.

use std::error::Error;
use std::fmt::Write;

use rrview_common::{NodeId, Position};
use rrview_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use rrview_graph::{NodeKind, RoutingResourceGraph};
use rrview_layout::{CoordinateMap, SegmentCoord};
use serde::Serialize;

use crate::pipeline::{emit_diagnostics, exit_code, open_session, print_json, RouteInput};
use crate::{CoordsArgs, GlobalArgs, ReportFormat};

/// One mapped node.
#[derive(Debug, Serialize)]
pub struct CoordEntry {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<SegmentCoord>,
}

/// Runs the coords command.
pub fn run(args: &CoordsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let session = open_session(&args.inputs, RouteInput::Optional, global)?;
    let map = session.mapper.map()?;
    let ids: Vec<NodeId> = args.nodes.iter().copied().map(NodeId::from_raw).collect();
    let entries = collect(&session.graph, map, &ids, &session.sink);

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&entries)),
        ReportFormat::Json => print_json(&entries)?,
    }
    emit_diagnostics(&session.sink, global);
    Ok(exit_code(&session.sink))
}

/// Maps the requested nodes, or every node by id when `ids` is empty.
/// Unknown ids are reported (`E103`) and left out.
pub fn collect(
    graph: &RoutingResourceGraph,
    map: &CoordinateMap,
    ids: &[NodeId],
    sink: &DiagnosticSink,
) -> Vec<CoordEntry> {
    let mut nodes: Vec<_> = if ids.is_empty() {
        graph.nodes().collect()
    } else {
        ids.iter()
            .filter_map(|&id| {
                let node = graph.node(id);
                if node.is_none() {
                    sink.emit(Diagnostic::error(
                        DiagnosticCode::UNKNOWN_NODE_REFERENCE,
                        format!("node {id} is not in the routing-resource graph"),
                        Location::None,
                    ));
                }
                node
            })
            .collect()
    };
    if ids.is_empty() {
        nodes.sort_by_key(|node| node.id);
    }

    let entries: Vec<CoordEntry> = nodes
        .into_iter()
        .map(|node| CoordEntry {
            id: node.id,
            kind: node.kind,
            position: map.position_of(node),
            segment: SegmentCoord::of(node, map.layout()),
        })
        .collect();

    let unplaced = entries.iter().filter(|e| e.position.is_none()).count();
    if unplaced > 0 {
        sink.emit(Diagnostic::note(
            DiagnosticCode::SUMMARY,
            format!("{unplaced} of {} nodes have no floorplan position", entries.len()),
            Location::None,
        ));
    }
    entries
}

/// One line per node: id, kind, position (or `-`) and channel slot.
pub fn render_text(entries: &[CoordEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let position = entry
            .position
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let _ = write!(out, "{:>8}  {:<6} {position}", entry.id, entry.kind.as_str());
        if let Some(segment) = entry.segment {
            let _ = write!(out, "  {segment}");
        }
        out.push('\n');
    }
    out
}
