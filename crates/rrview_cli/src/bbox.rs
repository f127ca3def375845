//! `rrview bbox`: bounding box of one net, or of the net with the largest box.

use std::error::Error;
use std::fmt::Write;

use rrview_common::NetIndex;
use rrview_metrics::{BoundingBoxResult, MetricsEngine, MetricsError};
use serde::Serialize;

use crate::pipeline::{emit_diagnostics, exit_code, open_session, print_json, RouteInput};
use crate::{BboxArgs, GlobalArgs, ReportFormat};

/// What `rrview bbox` prints.
#[derive(Debug, Serialize)]
pub struct BboxReport {
    pub net: Option<NetIndex>,
    pub name: Option<String>,
    pub terminals_only: bool,
    pub padding: f64,
    #[serde(flatten)]
    pub result: BoundingBoxResult,
}

/// Runs the bbox command.
pub fn run(args: &BboxArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let mut session = open_session(&args.inputs, RouteInput::Required, global)?;
    session.restrict_fanout(args.fanout);
    let padding = args.padding.unwrap_or(session.config.report.bbox_padding);

    let engine = MetricsEngine::new(&session.graph, &session.route, &session.mapper, &session.sink);
    let report = measure(&engine, args.net.map(NetIndex::from_raw), args.terminals, padding);
    emit_diagnostics(&session.sink, global);
    let report = report?;

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&report)),
        ReportFormat::Json => print_json(&report)?,
    }
    Ok(exit_code(&session.sink))
}

/// Measures `net`, or picks the net whose full route has the largest box.
///
/// With `terminals_only` the chosen net is measured over its SOURCE and SINK
/// nodes. An empty route yields an empty box and no net.
pub fn measure(
    engine: &MetricsEngine<'_>,
    net: Option<NetIndex>,
    terminals_only: bool,
    padding: f64,
) -> Result<BboxReport, MetricsError> {
    let chosen = match net {
        Some(index) => Some((index, engine.net_bounding_box(index, padding, terminals_only)?)),
        None if terminals_only => engine.largest_net_terminal_box(padding)?,
        None => engine.largest_bounding_box_net(padding)?,
    };

    let (net, result) = match chosen {
        Some((index, result)) => (Some(index), result),
        None => (None, BoundingBoxResult::EMPTY),
    };
    Ok(BboxReport {
        net,
        name: net
            .and_then(|index| engine.route().net(index))
            .map(|n| n.name.clone()),
        terminals_only,
        padding,
        result,
    })
}

/// Renders the report as a few labeled lines.
pub fn render_text(report: &BboxReport) -> String {
    let mut out = String::new();
    match (report.net, &report.name) {
        (Some(index), Some(name)) => {
            let _ = writeln!(out, "net: {index} ({name})");
        }
        _ => {
            let _ = writeln!(out, "net: -");
        }
    }
    let scope = if report.terminals_only { "terminals" } else { "route" };
    let _ = writeln!(out, "scope: {scope}, padding {:.3}", report.padding);
    match report.result.bounds {
        Some(b) => {
            let _ = writeln!(
                out,
                "bounds: x {:.3}..{:.3}, y {:.3}..{:.3}",
                b.min_x, b.max_x, b.min_y, b.max_y
            );
        }
        None => {
            let _ = writeln!(out, "bounds: -");
        }
    }
    let r = &report.result;
    let _ = writeln!(
        out,
        "cells: {} x {} = {}",
        r.width_cells, r.height_cells, r.area_cells
    );
    out
}
