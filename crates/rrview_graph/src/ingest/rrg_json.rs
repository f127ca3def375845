//! Parser for JSON routing-resource graph descriptions.
//!
//! The document holds a node list and an edge list:
//!
//! ```json
//! { "nodes": [ {"id": 0, "type": "SOURCE", "ptc": 0,
//!               "xlow": 1, "xhigh": 1, "ylow": 1, "yhigh": 1} ],
//!   "edges": [ {"src_node": 0, "sink_node": 1} ] }
//! ```
//!
//! Location fields may also be nested in a `loc` object, as in the VPR
//! `rr_nodes/node/loc` layout, and the lists may be named `rr_nodes` and
//! `rr_edges`. Each record is decoded on its own so that one bad record is
//! reported and skipped without losing the rest of the graph.

use super::assemble::GraphAssembler;
use crate::node::{Edge, Node, NodeKind, PinSide};
use crate::rrg::RoutingResourceGraph;
use crate::IngestError;
use rrview_common::NodeId;
use rrview_diagnostics::DiagnosticSink;
use serde::Deserialize;
use serde_json::Value;

/// Raw document: records are kept undecoded until they are visited.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default, alias = "rr_nodes")]
    nodes: Vec<Value>,
    #[serde(default, alias = "rr_edges")]
    edges: Vec<Value>,
}

/// Location and track fields, either inline or inside `loc`.
#[derive(Deserialize, Default)]
struct RawLoc {
    #[serde(alias = "track")]
    ptc: Option<u32>,
    #[serde(alias = "x_low")]
    xlow: Option<u32>,
    #[serde(alias = "x_high")]
    xhigh: Option<u32>,
    #[serde(alias = "y_low")]
    ylow: Option<u32>,
    #[serde(alias = "y_high")]
    yhigh: Option<u32>,
    side: Option<String>,
}

#[derive(Deserialize)]
struct RawNode {
    id: u32,
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    loc: Option<RawLoc>,
    #[serde(flatten)]
    inline: RawLoc,
}

#[derive(Deserialize)]
struct RawEdge {
    #[serde(alias = "src", alias = "source")]
    src_node: u32,
    #[serde(alias = "sink")]
    sink_node: u32,
}

/// Parses a JSON device description into a [`RoutingResourceGraph`].
///
/// Malformed node or edge records (missing or non-numeric fields, unknown
/// kinds) are reported as `E101` and skipped. Edges naming a node id absent
/// from the node list are reported as `E102` and skipped. A repeated node id
/// replaces the earlier node (`W201`).
///
/// # Errors
///
/// Returns [`IngestError::MalformedDocument`] only if the text is not a JSON
/// object with node/edge lists at all.
pub fn parse_rrg_json(
    json: &str,
    sink: &DiagnosticSink,
) -> Result<RoutingResourceGraph, IngestError> {
    let raw: RawDocument =
        serde_json::from_str(json).map_err(|e| IngestError::MalformedDocument(e.to_string()))?;

    let mut assembler = GraphAssembler::new(sink);
    for (index, value) in raw.nodes.into_iter().enumerate() {
        assembler.node(index, decode_node(value));
    }
    for (index, value) in raw.edges.into_iter().enumerate() {
        let edge = serde_json::from_value::<RawEdge>(value)
            .map(|raw| Edge::new(raw.src_node, raw.sink_node))
            .map_err(|e| e.to_string());
        assembler.edge(index, edge);
    }
    Ok(assembler.finish())
}

/// Decodes one node record, merging `loc` fields over inline ones.
fn decode_node(value: Value) -> Result<Node, String> {
    let raw: RawNode = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let kind: NodeKind = raw.kind.parse()?;
    let loc = raw.loc.unwrap_or_default();
    let inline = raw.inline;

    let field = |name: &str, nested: Option<u32>, flat: Option<u32>| {
        nested
            .or(flat)
            .ok_or_else(|| format!("node {}: missing field `{name}`", raw.id))
    };

    let side = match loc.side.or(inline.side) {
        Some(text) => Some(text.parse::<PinSide>()?),
        None => None,
    };

    Ok(Node {
        id: NodeId::from_raw(raw.id),
        kind,
        track: field("ptc", loc.ptc, inline.ptc)?,
        x_low: field("xlow", loc.xlow, inline.xlow)?,
        x_high: field("xhigh", loc.xhigh, inline.xhigh)?,
        y_low: field("ylow", loc.ylow, inline.ylow)?,
        y_high: field("yhigh", loc.yhigh, inline.yhigh)?,
        side,
    })
}
