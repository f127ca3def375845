//! `rrview congestion`: wire load, per-track peaks, and channel-slot usage.

use std::error::Error;
use std::fmt::Write;

use rrview_common::{NetIndex, NodeId};
use rrview_layout::SegmentCoord;
use rrview_metrics::{MetricsEngine, MetricsError, SegmentUsage};
use serde::Serialize;

use crate::pipeline::{emit_diagnostics, exit_code, open_session, print_json, RouteInput};
use crate::{CongestionArgs, GlobalArgs, ReportFormat};

/// Load of one wire.
#[derive(Debug, Serialize)]
pub struct WireRow {
    pub id: NodeId,
    pub load: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nets: Vec<NetIndex>,
}

/// Occupancy of one channel slot.
#[derive(Debug, Serialize)]
pub struct SegmentRow {
    pub segment: SegmentCoord,
    #[serde(flatten)]
    pub usage: SegmentUsage,
}

/// What `rrview congestion` prints, by mode.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", content = "rows", rename_all = "snake_case")]
pub enum CongestionReport {
    Wires(Vec<WireRow>),
    Peaks(Vec<WireRow>),
    Segments(Vec<SegmentRow>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Wires,
    Peaks,
    Segments,
}

impl Mode {
    fn of(args: &CongestionArgs) -> Self {
        if args.segments {
            Mode::Segments
        } else if args.peak {
            Mode::Peaks
        } else {
            Mode::Wires
        }
    }
}

/// Runs the congestion command.
pub fn run(args: &CongestionArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let session = open_session(&args.inputs, RouteInput::Required, global)?;
    let engine = MetricsEngine::new(&session.graph, &session.route, &session.mapper, &session.sink);
    let report = build(&engine, Mode::of(args), args.all);
    emit_diagnostics(&session.sink, global);
    let report = report?;

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&report)),
        ReportFormat::Json => print_json(&report)?,
    }
    Ok(exit_code(&session.sink))
}

/// Computes the report. Unused wires and empty slots are dropped unless
/// `all` is set. Wire rows run from most to least loaded, then by id.
pub fn build(engine: &MetricsEngine<'_>, mode: Mode, all: bool) -> Result<CongestionReport, MetricsError> {
    Ok(match mode {
        Mode::Wires => {
            let rows = engine
                .wire_congestion()
                .into_iter()
                .map(|(id, wire)| WireRow {
                    id,
                    load: wire.load,
                    nets: wire.nets.into_iter().collect(),
                })
                .collect();
            CongestionReport::Wires(ranked(rows, all))
        }
        Mode::Peaks => {
            let rows = engine
                .segment_peak_congestion()
                .into_iter()
                .map(|(id, load)| WireRow {
                    id,
                    load,
                    nets: Vec::new(),
                })
                .collect();
            CongestionReport::Peaks(ranked(rows, all))
        }
        Mode::Segments => CongestionReport::Segments(
            engine
                .segment_usage()?
                .into_iter()
                .filter(|(_, usage)| all || usage.used > 0)
                .map(|(segment, usage)| SegmentRow { segment, usage })
                .collect(),
        ),
    })
}

fn ranked(mut rows: Vec<WireRow>, all: bool) -> Vec<WireRow> {
    rows.retain(|row| all || row.load > 0);
    rows.sort_by(|a, b| b.load.cmp(&a.load).then(a.id.cmp(&b.id)));
    rows
}

/// Renders the report as a table.
pub fn render_text(report: &CongestionReport) -> String {
    let mut out = String::new();
    match report {
        CongestionReport::Wires(rows) | CongestionReport::Peaks(rows) => {
            let label = if matches!(report, CongestionReport::Peaks(_)) {
                "peak"
            } else {
                "load"
            };
            let _ = writeln!(out, "{:>8}  {:>5}  nets", "wire", label);
            for row in rows {
                let nets: Vec<String> = row.nets.iter().map(ToString::to_string).collect();
                let _ = writeln!(out, "{:>8}  {:>5}  {}", row.id, row.load, nets.join(","));
            }
        }
        CongestionReport::Segments(rows) => {
            let _ = writeln!(out, "{:<28} {:>5} {:>5}", "segment", "used", "total");
            for row in rows {
                let _ = writeln!(
                    out,
                    "{:<28} {:>5} {:>5}",
                    row.segment.to_string(),
                    row.usage.used,
                    row.usage.total
                );
            }
        }
    }
    out
}
