//! Coordinate-mapping conformance over generated devices.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use rrview_common::{NodeId, Position};
use rrview_config::LayoutConfiguration;
use rrview_conformance::{grid_device, grid_ids, load_design, vpr_route};
use rrview_diagnostics::DiagnosticSink;
use rrview_graph::ingest::parse_rrg_json;
use rrview_graph::NodeKind;
use rrview_layout::{io_edge, map_node, CoordinateMap, IoEdge};

const EPS: f64 = 1e-9;

fn close(p: Position, x: f64, y: f64) -> bool {
    (p.x - x).abs() < EPS && (p.y - y).abs() < EPS
}

fn position(design: &rrview_conformance::LoadedDesign, id: u32) -> Position {
    design
        .engine()
        .coordinate_of(NodeId::from_raw(id))
        .unwrap()
        .unwrap()
}

#[test]
fn default_six_by_six_reference_points() {
    let design = load_design(&grid_device(6, 6, 8), &vpr_route(6, 6, &[]));

    // Cell 1 starts after the IO ring and its gap (0.5 + 1.25 = 1.75) and is
    // 0.5 wide, so it spans 1.75..2.25. Block-centred nodes sit at the middle,
    // 2.0; 2.25 is the cell's far edge.
    let source = position(&design, grid_ids::source(6, 1, 1));
    assert!(close(source, 2.0, 2.0), "{source}");

    let chanx = position(&design, grid_ids::chanx(6, 6, 8, 2, 1, 0));
    assert!(close(chanx, 3.75, 2.395), "{chanx}");

    let bottom = position(&design, grid_ids::chanx(6, 6, 8, 1, 0, 0));
    assert!((bottom.y - 0.645).abs() < EPS, "{bottom}");
    let top = position(&design, grid_ids::chanx(6, 6, 8, 1, 6, 0));
    assert!((top.y - 11.145).abs() < EPS, "{top}");

    let chany = position(&design, grid_ids::chany(6, 6, 8, 0, 3, 2));
    assert!((chany.x - (0.645 + 2.0 * 0.12)).abs() < EPS, "{chany}");
    assert!((chany.y - 5.5).abs() < EPS, "{chany}");
}

#[test]
fn io_ring_positions_and_priority() {
    let sink = DiagnosticSink::new();
    let graph = parse_rrg_json(&grid_device(6, 6, 1), &sink).unwrap();
    let layout = LayoutConfiguration::default();

    let mut edges = Vec::new();
    for node in graph.nodes_of_kind(NodeKind::Io) {
        let edge = io_edge(node, &layout).unwrap();
        let p = map_node(node, &layout).unwrap();
        match edge {
            IoEdge::Bottom => assert!((p.y - 0.25).abs() < EPS),
            IoEdge::Top => assert!((p.y - 12.5).abs() < EPS),
            IoEdge::Left => assert!((p.x - 0.25).abs() < EPS),
            IoEdge::Right => assert!((p.x - 12.5).abs() < EPS),
        }
        edges.push(edge);
    }
    // The block at column 6 of the top row is claimed by the top edge.
    assert_eq!(edges.iter().filter(|&&e| e == IoEdge::Top).count(), 6);
    assert_eq!(edges.iter().filter(|&&e| e == IoEdge::Right).count(), 5);
}

#[test]
fn wires_and_io_blocks_never_share_a_position() {
    let sink = DiagnosticSink::new();
    let graph = parse_rrg_json(&grid_device(5, 4, 4), &sink).unwrap();
    let map = CoordinateMap::build(&graph, LayoutConfiguration::with_grid(4, 5));

    let mut seen = HashSet::new();
    for node in graph.nodes() {
        if node.kind.is_channel() || node.kind == NodeKind::Io {
            let p = map.position_of(node).unwrap();
            assert!(
                seen.insert((p.x.to_bits(), p.y.to_bits())),
                "node {} collides at {p}",
                node.id
            );
        }
    }
    assert_eq!(seen.len(), graph.wires().count() + 2 * 5 + 2 * 3);
}

#[test]
fn mapping_is_deterministic_across_builds_and_threads() {
    let sink = DiagnosticSink::new();
    let graph = Arc::new(parse_rrg_json(&grid_device(4, 4, 3), &sink).unwrap());
    let layout = LayoutConfiguration::with_grid(4, 4);
    let reference = CoordinateMap::build(&graph, layout.clone()).positions();

    let lazy = Arc::new(CoordinateMap::new(layout));
    let handles: Vec<_> = (0..4)
        .map(|offset| {
            let graph = Arc::clone(&graph);
            let lazy = Arc::clone(&lazy);
            thread::spawn(move || {
                for node in graph.nodes().skip(offset) {
                    lazy.position_of(node);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let concurrent = lazy.positions();
    assert_eq!(reference.len(), concurrent.len());
    for (id, p) in &reference {
        assert!(p.bit_eq(&concurrent[id]), "node {id} differs");
    }
}

#[test]
fn blocks_outside_the_array_are_unmappable() {
    let design = load_design(&grid_device(6, 6, 2), &vpr_route(3, 3, &[]));
    // The route declares a 3x3 array, so column 4 blocks fall outside it.
    let inside = design
        .engine()
        .coordinate_of(NodeId::from_raw(grid_ids::source(6, 3, 3)))
        .unwrap();
    let outside = design
        .engine()
        .coordinate_of(NodeId::from_raw(grid_ids::source(6, 4, 1)))
        .unwrap();
    assert!(inside.is_some());
    assert!(outside.is_none());
}
