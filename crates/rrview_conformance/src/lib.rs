//! Conformance test helpers for rrview.
//!
//! Provides a synthetic device generator and a loader that runs device and
//! route text through ingestion, route resolution and mapper configuration,
//! the same way the CLI does, so integration tests can assert on metrics.

#![warn(missing_docs)]

use rrview_config::{load_config_from_str, ProjectConfig};
use rrview_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use rrview_graph::ingest::{parse_route, parse_rrg, RrgFormat};
use rrview_graph::{Route, RoutingResourceGraph};
use rrview_layout::CoordinateMapper;
use rrview_metrics::MetricsEngine;
use serde_json::{json, Value};

/// An ingested, mapped design.
pub struct LoadedDesign {
    /// The routing-resource graph.
    pub graph: RoutingResourceGraph,
    /// The resolved routing solution.
    pub route: Route,
    /// A mapper configured for the design's layout.
    pub mapper: CoordinateMapper,
    /// Diagnostics from ingestion and every metric run so far.
    pub sink: DiagnosticSink,
}

impl LoadedDesign {
    /// A metrics engine over this design, reporting into its sink.
    pub fn engine(&self) -> MetricsEngine<'_> {
        MetricsEngine::new(&self.graph, &self.route, &self.mapper, &self.sink)
    }

    /// Every diagnostic emitted so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.sink.diagnostics()
    }

    /// Number of diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.sink.count(severity)
    }
}

/// Parses a configuration from TOML text.
pub fn make_config(toml_text: &str) -> ProjectConfig {
    load_config_from_str(toml_text).unwrap()
}

/// Loads a design with the default configuration.
pub fn load_design(rrg_text: &str, route_text: &str) -> LoadedDesign {
    load_design_with_config(rrg_text, route_text, &ProjectConfig::default())
}

/// Loads a design; the route's declared array size fills in grid dimensions
/// the configuration leaves open. The device may be XML or JSON.
pub fn load_design_with_config(
    rrg_text: &str,
    route_text: &str,
    config: &ProjectConfig,
) -> LoadedDesign {
    let sink = DiagnosticSink::new();
    let graph = parse_rrg(rrg_text, RrgFormat::sniff(rrg_text), &sink).unwrap();
    let route = parse_route(route_text, &sink).resolve_against(&graph, &sink);
    let mut mapper = CoordinateMapper::new();
    mapper
        .configure(&graph, config.layout.resolve(route.array_size))
        .unwrap();
    LoadedDesign {
        graph,
        route,
        mapper,
        sink,
    }
}

/// Generates a complete island-style device description as JSON.
///
/// Every logic block at `(1..=cols, 1..=rows)` gets a SOURCE, an OPIN, an
/// IPIN and a SINK. Horizontal channels run at `y = 0..=rows` and vertical
/// channels at `x = 0..=cols`, each with `tracks` wires per channel slot. IO
/// blocks sit on all four edges (row 0, row `rows`, column 0, column
/// `cols`), one per edge position, with the top-right corner on the top
/// edge only. Ids are dense and assigned in
/// that order; edges connect each OPIN to the track-0 wire above its block.
pub fn grid_device(cols: u32, rows: u32, tracks: u32) -> String {
    let mut nodes: Vec<Value> = Vec::new();
    let mut edges: Vec<Value> = Vec::new();
    let mut push = |kind: &str, x: u32, y: u32, ptc: u32| -> usize {
        let id = nodes.len();
        nodes.push(json!({
            "id": id,
            "type": kind,
            "ptc": ptc,
            "xlow": x, "xhigh": x, "ylow": y, "yhigh": y,
        }));
        id
    };

    let mut opins = Vec::new();
    for x in 1..=cols {
        for y in 1..=rows {
            push("SOURCE", x, y, 0);
            opins.push((push("OPIN", x, y, 0), x, y));
            push("IPIN", x, y, 1);
            push("SINK", x, y, 0);
        }
    }
    let mut chanx_track0 = std::collections::HashMap::new();
    for y in 0..=rows {
        for x in 1..=cols {
            for t in 0..tracks {
                let id = push("CHANX", x, y, t);
                if t == 0 {
                    chanx_track0.insert((x, y), id);
                }
            }
        }
    }
    for x in 0..=cols {
        for y in 1..=rows {
            for t in 0..tracks {
                push("CHANY", x, y, t);
            }
        }
    }
    for x in 1..=cols {
        push("IO", x, 0, 0);
        push("IO", x, rows, 0);
    }
    for y in 1..rows {
        push("IO", 0, y, 0);
        push("IO", cols, y, 0);
    }

    for (opin, x, y) in opins {
        if let Some(&wire) = chanx_track0.get(&(x, y)) {
            edges.push(json!({"src_node": opin, "sink_node": wire}));
        }
    }
    json!({"nodes": nodes, "edges": edges}).to_string()
}

/// [`grid_device`] written as VPR `rr_graph` XML, with the same ids and edges.
pub fn grid_device_xml(cols: u32, rows: u32, tracks: u32) -> String {
    let device: Value = serde_json::from_str(&grid_device(cols, rows, tracks)).unwrap();
    let list = |key: &str| device[key].as_array().cloned().unwrap_or_default();

    let mut out = String::from("<?xml version=\"1.0\"?>\n<rr_graph tool_name=\"rrview\">\n");
    out.push_str("  <rr_nodes>\n");
    for n in list("nodes") {
        out.push_str(&format!(
            "    <node id=\"{}\" type=\"{}\" capacity=\"1\">\n      \
             <loc xlow=\"{}\" ylow=\"{}\" xhigh=\"{}\" yhigh=\"{}\" ptc=\"{}\"/>\n    </node>\n",
            n["id"],
            n["type"].as_str().unwrap_or_default(),
            n["xlow"],
            n["ylow"],
            n["xhigh"],
            n["yhigh"],
            n["ptc"],
        ));
    }
    out.push_str("  </rr_nodes>\n  <rr_edges>\n");
    for e in list("edges") {
        out.push_str(&format!(
            "    <edge src_node=\"{}\" sink_node=\"{}\" switch_id=\"0\"/>\n",
            e["src_node"], e["sink_node"]
        ));
    }
    out.push_str("  </rr_edges>\n</rr_graph>\n");
    out
}

/// Id of a node in a [`grid_device`] of the given size.
pub mod grid_ids {
    /// The SOURCE of block `(x, y)`.
    pub fn source(rows: u32, x: u32, y: u32) -> u32 {
        block_base(rows, x, y)
    }

    /// The OPIN of block `(x, y)`.
    pub fn opin(rows: u32, x: u32, y: u32) -> u32 {
        block_base(rows, x, y) + 1
    }

    /// The IPIN of block `(x, y)`.
    pub fn ipin(rows: u32, x: u32, y: u32) -> u32 {
        block_base(rows, x, y) + 2
    }

    /// The SINK of block `(x, y)`.
    pub fn sink(rows: u32, x: u32, y: u32) -> u32 {
        block_base(rows, x, y) + 3
    }

    /// Track `t` of the CHANX slot `(x, y)`.
    pub fn chanx(cols: u32, rows: u32, tracks: u32, x: u32, y: u32, t: u32) -> u32 {
        cols * rows * 4 + (y * cols + (x - 1)) * tracks + t
    }

    /// Track `t` of the CHANY slot `(x, y)`.
    pub fn chany(cols: u32, rows: u32, tracks: u32, x: u32, y: u32, t: u32) -> u32 {
        let chanx_total = (rows + 1) * cols * tracks;
        cols * rows * 4 + chanx_total + (x * rows + (y - 1)) * tracks + t
    }

    fn block_base(rows: u32, x: u32, y: u32) -> u32 {
        ((x - 1) * rows + (y - 1)) * 4
    }
}

/// One hop for [`vpr_route`]: node id, kind name, `x`, `y` and track.
pub type HopSpec<'a> = (u32, &'a str, u32, u32, u32);

/// Writes a routing solution in the router's `.route` text format.
///
/// Nets are numbered in the order given.
pub fn vpr_route(cols: u32, rows: u32, nets: &[(&str, &[HopSpec<'_>])]) -> String {
    let mut out = format!("Array size: {cols} x {rows} logic blocks.\n\nRouting:\n");
    for (index, (name, hops)) in nets.iter().enumerate() {
        out.push_str(&format!("\nNet {index} ({name})\n\n"));
        for &(id, kind, x, y, track) in hops.iter() {
            let label = match kind {
                "SOURCE" | "SINK" => "Class",
                "CHANX" | "CHANY" => "Track",
                "IO" => "Pad",
                _ => "Pin",
            };
            out.push_str(&format!(
                "Node:\t{id}\t{kind} ({x},{y},0)  {label}: {track}  Switch: 0\n"
            ));
        }
    }
    out
}
