//! Parser for VPR `rr_graph` XML device descriptions.
//!
//! Only the two record lists are read:
//!
//! ```xml
//! <rr_graph>
//!   <rr_nodes>
//!     <node id="0" type="SOURCE" capacity="1">
//!       <loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="0"/>
//!     </node>
//!     <node id="1" type="OPIN" capacity="1">
//!       <loc xlow="1" ylow="1" xhigh="1" yhigh="1" side="TOP" ptc="2"/>
//!     </node>
//!   </rr_nodes>
//!   <rr_edges>
//!     <edge src_node="0" sink_node="1" switch_id="0"/>
//!   </rr_edges>
//! </rr_graph>
//! ```
//!
//! Channel, switch, segment and block-type sections are ignored, as are
//! `timing` and `segment` children of a node.

use super::assemble::GraphAssembler;
use crate::node::{Edge, Node, NodeKind, PinSide};
use crate::rrg::RoutingResourceGraph;
use crate::IngestError;
use roxmltree::Document;
use rrview_common::NodeId;
use rrview_diagnostics::DiagnosticSink;

type Element<'a, 'input> = roxmltree::Node<'a, 'input>;

/// Parses an `rr_graph` XML document into a [`RoutingResourceGraph`].
///
/// Records are reported and skipped exactly as in
/// [`parse_rrg_json`](super::parse_rrg_json): `E101` for a node or edge
/// element that cannot be decoded, `E102` for an edge with an unknown
/// endpoint, `W201` when a later node replaces an earlier one.
///
/// # Errors
///
/// Returns [`IngestError::MalformedDocument`] if the text is not well-formed
/// XML or its root element is not `<rr_graph>`.
pub fn parse_rrg_xml(
    xml: &str,
    sink: &DiagnosticSink,
) -> Result<RoutingResourceGraph, IngestError> {
    let doc = Document::parse(xml).map_err(|e| IngestError::MalformedDocument(e.to_string()))?;
    let root = doc.root_element();
    if !root.has_tag_name("rr_graph") {
        return Err(IngestError::MalformedDocument(format!(
            "expected an <rr_graph> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut assembler = GraphAssembler::new(sink);
    for (index, element) in records(root, "rr_nodes", "node").enumerate() {
        assembler.node(index, decode_node(element));
    }
    for (index, element) in records(root, "rr_edges", "edge").enumerate() {
        assembler.edge(index, decode_edge(element));
    }
    Ok(assembler.finish())
}

/// `<record>` children of every `<list>` child of `root`, in document order.
fn records<'a, 'input: 'a>(
    root: Element<'a, 'input>,
    list: &'static str,
    record: &'static str,
) -> impl Iterator<Item = Element<'a, 'input>> {
    root.children()
        .filter(move |e| e.has_tag_name(list))
        .flat_map(move |e| e.children().filter(move |c| c.has_tag_name(record)))
}

fn decode_node(element: Element<'_, '_>) -> Result<Node, String> {
    let id = number(element, "id")?;
    let kind: NodeKind = attribute(element, "type")?.parse()?;
    let loc = element
        .children()
        .find(|c| c.has_tag_name("loc"))
        .ok_or_else(|| format!("node {id}: missing element `loc`"))?;
    let side = loc.attribute("side").map(str::parse::<PinSide>).transpose()?;

    Ok(Node {
        id: NodeId::from_raw(id),
        kind,
        track: number(loc, "ptc")?,
        x_low: number(loc, "xlow")?,
        x_high: number(loc, "xhigh")?,
        y_low: number(loc, "ylow")?,
        y_high: number(loc, "yhigh")?,
        side,
    })
}

fn decode_edge(element: Element<'_, '_>) -> Result<Edge, String> {
    Ok(Edge::new(
        number(element, "src_node")?,
        number(element, "sink_node")?,
    ))
}

fn attribute<'a>(element: Element<'a, '_>, name: &str) -> Result<&'a str, String> {
    element.attribute(name).ok_or_else(|| {
        format!(
            "<{}> missing attribute `{name}`",
            element.tag_name().name()
        )
    })
}

fn number(element: Element<'_, '_>, name: &str) -> Result<u32, String> {
    let text = attribute(element, name)?;
    text.trim().parse().map_err(|_| {
        format!(
            "<{}> attribute `{name}` is not a node number: '{text}'",
            element.tag_name().name()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrview_diagnostics::{DiagnosticCode, Location, RecordSection};

    fn wrap(nodes: &str, edges: &str) -> String {
        format!("<rr_graph><rr_nodes>{nodes}</rr_nodes><rr_edges>{edges}</rr_edges></rr_graph>")
    }

    const SMALL: &str = r#"<?xml version="1.0"?>
<rr_graph tool_name="vpr" tool_version="8.0">
  <channels><channel chan_width_max="8"/></channels>
  <rr_nodes>
    <node id="0" type="SOURCE" capacity="1">
      <loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="0"/>
    </node>
    <node id="1" type="OPIN" capacity="1">
      <loc xlow="1" ylow="1" xhigh="1" yhigh="1" side="TOP" ptc="2"/>
      <timing R="0" C="0"/>
    </node>
    <node id="2" type="CHANX" direction="INC_DIR" capacity="1">
      <loc xlow="1" ylow="1" xhigh="2" yhigh="1" ptc="3"/>
      <segment segment_id="0"/>
    </node>
  </rr_nodes>
  <rr_edges>
    <edge src_node="0" sink_node="1" switch_id="0"/>
    <edge src_node="1" sink_node="2" switch_id="1"/>
  </rr_edges>
</rr_graph>"#;

    #[test]
    fn parse_small_graph() {
        let sink = DiagnosticSink::new();
        let graph = parse_rrg_xml(SMALL, &sink).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(sink.diagnostics().is_empty());

        let opin = graph.node(NodeId::from_raw(1)).unwrap();
        assert_eq!((opin.kind, opin.track), (NodeKind::Opin, 2));
        assert_eq!(opin.side, Some(PinSide::Top));

        let wire = graph.node(NodeId::from_raw(2)).unwrap();
        assert_eq!((wire.x_low, wire.x_high), (1, 2));
        assert_eq!(graph.wire_side(NodeId::from_raw(2)), Some(PinSide::Top));
    }

    #[test]
    fn missing_loc_skips_record() {
        let xml = wrap(
            r#"<node id="0" type="SINK" capacity="1"/>
               <node id="1" type="SINK"><loc xlow="2" ylow="1" xhigh="2" yhigh="1" ptc="0"/></node>
               <node id="2" type="SINK"><loc xlow="3" ylow="1" xhigh="3" ptc="0"/></node>"#,
            "",
        );
        let sink = DiagnosticSink::new();
        let graph = parse_rrg_xml(&xml, &sink).unwrap();
        assert_eq!(graph.node_count(), 1);

        let diags = sink.take_all();
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.code == DiagnosticCode::MALFORMED_RECORD));
        assert!(diags[0].message.contains("loc"));
        assert!(diags[1].message.contains("yhigh"));
        assert_eq!(
            diags[1].location,
            Location::Record {
                section: RecordSection::Node,
                index: 2
            }
        );
    }

    #[test]
    fn non_numeric_attribute_skips_record() {
        let xml = wrap(
            r#"<node id="seven" type="SINK"><loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="0"/></node>
               <node id="8" type="SINK"><loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="x"/></node>
               <node id="9" type="SINK"><loc xlow="-1" ylow="1" xhigh="1" yhigh="1" ptc="0"/></node>
               <node id="10" type="WIRE"><loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="0"/></node>"#,
            "",
        );
        let sink = DiagnosticSink::new();
        let graph = parse_rrg_xml(&xml, &sink).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(sink.count_code(DiagnosticCode::MALFORMED_RECORD), 4);
        assert!(sink.diagnostics()[1].message.contains("'x'"));
    }

    #[test]
    fn edge_to_unknown_node_reported() {
        let xml = wrap(
            r#"<node id="0" type="SOURCE"><loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="0"/></node>"#,
            r#"<edge src_node="0" sink_node="5"/><edge src_node="0"/>"#,
        );
        let sink = DiagnosticSink::new();
        let graph = parse_rrg_xml(&xml, &sink).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(sink.count_code(DiagnosticCode::UNKNOWN_EDGE_ENDPOINT), 1);
        assert_eq!(sink.count_code(DiagnosticCode::MALFORMED_RECORD), 1);
        assert_eq!(
            sink.diagnostics()[1].location,
            Location::Record {
                section: RecordSection::Edge,
                index: 1
            }
        );
    }

    #[test]
    fn duplicate_id_last_write_wins() {
        let xml = wrap(
            r#"<node id="3" type="CHANX"><loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="1"/></node>
               <node id="4" type="CHANY"><loc xlow="1" ylow="1" xhigh="1" yhigh="1" ptc="0"/></node>
               <node id="3" type="CHANX"><loc xlow="2" ylow="1" xhigh="2" yhigh="1" ptc="5"/></node>"#,
            "",
        );
        let sink = DiagnosticSink::new();
        let graph = parse_rrg_xml(&xml, &sink).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node(NodeId::from_raw(3)).unwrap().track, 5);
        assert_eq!(sink.count_code(DiagnosticCode::DUPLICATE_NODE), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn unreadable_documents_are_fatal() {
        let sink = DiagnosticSink::new();
        for text in ["{\"nodes\": []}", "<rr_graph><rr_nodes></rr_graph>", "<device/>"] {
            let err = parse_rrg_xml(text, &sink).unwrap_err();
            assert!(matches!(err, IngestError::MalformedDocument(_)), "{text}");
        }
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn graph_without_lists_is_empty() {
        let sink = DiagnosticSink::new();
        let graph = parse_rrg_xml("<rr_graph/>", &sink).unwrap();
        assert_eq!((graph.node_count(), graph.edge_count()), (0, 0));
    }
}
