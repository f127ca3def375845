//! Parser for line-oriented routing solutions (VPR `.route` style).
//!
//! Recognised lines, after trimming:
//!
//! ```text
//! Array size: 6 x 6 logic blocks
//! Net 0 (c0)
//! Node:  12  OPIN (1,1,0)  Pin: 3  Switch: 0
//! Node:  45  CHANX (1,0,0) to (2,0,0)  Track: 3  Switch: 1
//! Net 1 (clk): global net connecting:
//! ```
//!
//! Every other line (blank lines, routing-file banners, global-net block
//! lists) is ignored. Bad lines are reported and skipped; parsing never
//! stops early.

use crate::node::NodeKind;
use crate::route::{Net, Route, RouteHop};
use rrview_common::{NetIndex, NodeId};
use rrview_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};

const TRACK_LABELS: [&str; 4] = ["Pad:", "Pin:", "Class:", "Track:"];

/// Parses routing-solution text into a [`Route`].
///
/// Nets appear in the order their headers appear. A node line before any
/// valid header is reported (`W202`) and ignored, as is every node line that
/// follows a malformed header. Malformed headers and node lines are reported
/// as `W203`. A repeated serial index replaces the earlier net (`W207`).
///
/// Node ids are not checked here; see [`Route::resolve_against`].
pub fn parse_route(text: &str, sink: &DiagnosticSink) -> Route {
    let mut route = Route::new();
    let mut current: Option<NetIndex> = None;

    for (offset, raw_line) in text.lines().enumerate() {
        let line_no = u32::try_from(offset + 1).unwrap_or(u32::MAX);
        let location = Location::Line(line_no);
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("Array size:") {
            match parse_array_size(rest) {
                Some(size) => route.array_size = Some(size),
                None => sink.emit(malformed(location, "array size", line)),
            }
            continue;
        }

        if is_keyword(line, "Net") {
            current = None;
            let Some(net) = parse_net_header(line) else {
                sink.emit(
                    malformed(location, "net header", line)
                        .with_help("expected `Net <index> (<name>)`"),
                );
                continue;
            };
            let index = net.index;
            if let Some(previous) = route.insert_net(net) {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::DUPLICATE_NET,
                    format!(
                        "net {index} redefined; `{}` replaces `{}`",
                        route.net(index).map_or("", |n| n.name.as_str()),
                        previous.name
                    ),
                    location,
                ));
            }
            current = Some(index);
            continue;
        }

        if is_keyword(line, "Node:") {
            let Some(index) = current else {
                sink.emit(Diagnostic::warning(
                    DiagnosticCode::ORPHAN_ROUTE_NODE,
                    "node line outside of a net; ignored",
                    location,
                ));
                continue;
            };
            match parse_node_line(line) {
                Ok(mut hop) => {
                    hop.line = line_no;
                    if let Some(net) = route.net_mut(index) {
                        net.hops.push(hop);
                    }
                }
                Err(reason) => {
                    sink.emit(malformed(location, "node line", line).with_note(reason));
                }
            }
        }
    }

    route
}

fn malformed(location: Location, what: &str, line: &str) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticCode::MALFORMED_ROUTE_LINE,
        format!("malformed {what}: `{line}`"),
        location,
    )
}

/// `line` starts with `word` followed by a non-identifier character.
fn is_keyword(line: &str, word: &str) -> bool {
    line.strip_prefix(word).is_some_and(|rest| {
        word.ends_with(':') || rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
    })
}

fn parse_array_size(rest: &str) -> Option<(u32, u32)> {
    let mut parts = rest.split_whitespace();
    let width = parts.next()?.parse().ok()?;
    if parts.next()? != "x" {
        return None;
    }
    let height = parts.next()?.parse().ok()?;
    Some((width, height))
}

fn parse_net_header(line: &str) -> Option<Net> {
    let rest = line.strip_prefix("Net")?.trim_start();
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let index: u32 = rest[..digits].parse().ok()?;
    let rest = rest[digits..].trim_start().strip_prefix('(')?;

    let (name, is_global) = match rest.find("): global net") {
        Some(end) => (&rest[..end], true),
        None => {
            let end = rest.rfind(')')?;
            let tail = rest[end + 1..].trim();
            if !(tail.is_empty() || tail == ":") {
                return None;
            }
            (&rest[..end], false)
        }
    };
    if name.is_empty() {
        return None;
    }

    let mut net = Net::new(index, name);
    net.is_global = is_global;
    Some(net)
}

fn parse_node_line(line: &str) -> Result<RouteHop, String> {
    let rest = line.strip_prefix("Node:").unwrap_or(line).trim_start();

    let id_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let id: u32 = rest[..id_end]
        .parse()
        .map_err(|_| "missing node id".to_string())?;
    let rest = rest[id_end..].trim_start();

    let kind_end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    let kind: NodeKind = rest[..kind_end].parse()?;
    let rest = rest[kind_end..].trim_start();

    let (x, y, rest) = parse_tuple(rest).ok_or_else(|| "missing (x,y) location".to_string())?;

    let rest = rest.trim_start();
    let rest = match rest.strip_prefix("to") {
        Some(after) => {
            let (_, _, after) = parse_tuple(after.trim_start())
                .ok_or_else(|| "malformed `to (x,y)` location".to_string())?;
            after
        }
        None => rest,
    };

    let track = parse_track(rest).ok_or_else(|| "missing track number".to_string())?;

    Ok(RouteHop {
        node: NodeId::from_raw(id),
        kind,
        x,
        y,
        track,
        line: 0,
    })
}

/// Parses `(x,y)` or `(x,y,z)` at the start of `s`, returning the rest.
fn parse_tuple(s: &str) -> Option<(u32, u32, &str)> {
    let inner = s.strip_prefix('(')?;
    let close = inner.find(')')?;
    let fields: Vec<&str> = inner[..close].split(',').map(str::trim).collect();
    if !(2..=3).contains(&fields.len()) {
        return None;
    }
    let x = fields[0].parse().ok()?;
    let y = fields[1].parse().ok()?;
    if let Some(z) = fields.get(2) {
        z.parse::<u32>().ok()?;
    }
    Some((x, y, &inner[close + 1..]))
}

/// The number after the first track label, or the first bare integer.
fn parse_track(s: &str) -> Option<u32> {
    let labelled = TRACK_LABELS
        .iter()
        .filter_map(|label| s.find(label).map(|at| at + label.len()))
        .min();
    match labelled {
        Some(start) => leading_number(s[start..].trim_start()),
        None => s.split_whitespace().find_map(|tok| tok.parse().ok()),
    }
}

fn leading_number(s: &str) -> Option<u32> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}
