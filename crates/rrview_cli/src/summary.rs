//! `rrview summary`: HPWL and deviation over every net.

use std::error::Error;
use std::fmt::Write;

use rrview_common::NetIndex;
use rrview_graph::Route;
use rrview_metrics::{DeviationMetrics, DeviationSummary, HpwlSummary, MetricsEngine};
use serde::Serialize;

use crate::pipeline::{emit_diagnostics, exit_code, open_session, print_json, RouteInput};
use crate::{GlobalArgs, ReportFormat, SummaryArgs};

/// One row of a deviation ranking.
#[derive(Debug, Serialize)]
pub struct RankedNet {
    pub index: NetIndex,
    pub name: String,
    #[serde(flatten)]
    pub metrics: DeviationMetrics,
}

/// Everything `rrview summary` prints.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub nets: usize,
    pub hpwl: HpwlSummary,
    pub average_absolute_deviation: f64,
    pub average_relative_deviation: f64,
    pub by_absolute_deviation: Vec<RankedNet>,
    pub by_relative_deviation: Vec<RankedNet>,
}

impl SummaryReport {
    pub fn build(route: &Route, hpwl: HpwlSummary, deviation: &DeviationSummary, top_n: usize) -> Self {
        let ranked = |rows: Vec<(NetIndex, DeviationMetrics)>| -> Vec<RankedNet> {
            rows.into_iter()
                .map(|(index, metrics)| RankedNet {
                    index,
                    name: route.net(index).map(|n| n.name.clone()).unwrap_or_default(),
                    metrics,
                })
                .collect()
        };
        Self {
            nets: deviation.nets.len(),
            hpwl,
            average_absolute_deviation: deviation.average_absolute,
            average_relative_deviation: deviation.average_relative,
            by_absolute_deviation: ranked(deviation.rank_by_absolute(top_n)),
            by_relative_deviation: ranked(deviation.rank_by_relative(top_n)),
        }
    }
}

/// Runs the summary command.
pub fn run(args: &SummaryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let mut session = open_session(&args.inputs, RouteInput::Required, global)?;
    session.restrict_fanout(args.fanout);
    let top_n = args.top.unwrap_or(session.config.report.top_n);

    let engine = MetricsEngine::new(&session.graph, &session.route, &session.mapper, &session.sink);
    let metrics = engine.net_metrics();
    emit_diagnostics(&session.sink, global);
    let metrics = metrics?;

    let hpwl = HpwlSummary::from_metrics(&metrics);
    let deviation = DeviationSummary::from_metrics(metrics);
    let report = SummaryReport::build(&session.route, hpwl, &deviation, top_n);

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&report)),
        ReportFormat::Json => print_json(&report)?,
    }
    Ok(exit_code(&session.sink))
}

/// Renders the report as plain-text tables.
pub fn render_text(report: &SummaryReport) -> String {
    let mut out = String::new();
    let hpwl = &report.hpwl;
    let _ = writeln!(out, "nets: {}", report.nets);
    let _ = writeln!(
        out,
        "hpwl: total {:.3}, average {:.3}, min {:.3}, max {:.3}",
        hpwl.total, hpwl.average, hpwl.min, hpwl.max
    );
    let _ = writeln!(
        out,
        "deviation: average absolute {:.3}, average relative {:.2}%",
        report.average_absolute_deviation, report.average_relative_deviation
    );

    for (title, rows) in [
        ("absolute deviation", &report.by_absolute_deviation),
        ("relative deviation", &report.by_relative_deviation),
    ] {
        if rows.is_empty() {
            continue;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "top {} nets by {title}:", rows.len());
        let _ = writeln!(
            out,
            "  {:>6}  {:<24} {:>10} {:>6} {:>10} {:>9}",
            "net", "name", "hpwl", "wires", "abs", "rel %"
        );
        for row in rows {
            let m = &row.metrics;
            let _ = writeln!(
                out,
                "  {:>6}  {:<24} {:>10.3} {:>6} {:>10.3} {:>9.2}",
                row.index, row.name, m.hpwl, m.real_wires, m.absolute_deviation, m.relative_deviation
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrview_graph::Net;
    use std::collections::BTreeMap;

    fn fixture() -> (Route, BTreeMap<NetIndex, DeviationMetrics>) {
        let mut route = Route::new();
        route.insert_net(Net::new(0, "clk"));
        route.insert_net(Net::new(1, "data"));
        route.insert_net(Net::new(2, "rst"));
        let metrics = BTreeMap::from([
            (NetIndex::from_raw(0), DeviationMetrics::new(2.0, 3)),
            (NetIndex::from_raw(1), DeviationMetrics::new(7.0, 14)),
            (NetIndex::from_raw(2), DeviationMetrics::new(0.0, 0)),
        ]);
        (route, metrics)
    }

    fn report(top_n: usize) -> SummaryReport {
        let (route, metrics) = fixture();
        let hpwl = HpwlSummary::from_metrics(&metrics);
        let deviation = DeviationSummary::from_metrics(metrics);
        SummaryReport::build(&route, hpwl, &deviation, top_n)
    }

    #[test]
    fn rankings_carry_names_and_respect_top_n() {
        let report = report(2);
        assert_eq!(report.nets, 3);
        let names: Vec<&str> = report
            .by_absolute_deviation
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["data", "clk"]);
        assert_eq!(report.by_relative_deviation.len(), 2);
        assert_eq!(report.by_relative_deviation[0].name, "data");
    }

    #[test]
    fn text_report_lists_totals_and_rows() {
        let text = render_text(&report(10));
        assert!(text.starts_with("nets: 3\n"));
        assert!(text.contains("hpwl: total 9.000, average 3.000, min 0.000, max 7.000"));
        assert!(text.contains("top 3 nets by absolute deviation:"));
        let data_row = text.lines().find(|l| l.contains("data")).unwrap();
        assert!(data_row.contains("7.000"));
        assert!(data_row.contains("100.00"));
    }

    #[test]
    fn empty_route_has_no_tables() {
        let route = Route::new();
        let metrics = BTreeMap::new();
        let hpwl = HpwlSummary::from_metrics(&metrics);
        let deviation = DeviationSummary::from_metrics(metrics);
        let text = render_text(&SummaryReport::build(&route, hpwl, &deviation, 5));
        assert!(text.contains("nets: 0"));
        assert!(!text.contains("top"));
    }

    #[test]
    fn json_flattens_metrics() {
        let value = serde_json::to_value(report(1)).unwrap();
        let first = &value["by_absolute_deviation"][0];
        assert_eq!(first["index"], 1);
        assert_eq!(first["name"], "data");
        assert_eq!(first["real_wires"], 14);
    }
}
