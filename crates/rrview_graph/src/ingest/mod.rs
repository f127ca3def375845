//! Builders for the graph model from external descriptions.
//!
//! - [`rrg_xml`] reads a VPR `rr_graph` XML device description.
//! - [`rrg_json`] reads the same nodes and edges from a JSON document.
//! - [`route_text`] reads a line-oriented routing solution.
//!
//! None of them opens files; callers hand in text they have already read.

mod assemble;
pub mod route_text;
pub mod rrg_json;
pub mod rrg_xml;

pub use route_text::parse_route;
pub use rrg_json::parse_rrg_json;
pub use rrg_xml::parse_rrg_xml;

use crate::rrg::RoutingResourceGraph;
use crate::IngestError;
use rrview_diagnostics::DiagnosticSink;
use std::path::Path;

/// Device description formats accepted by [`parse_rrg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrgFormat {
    /// VPR `rr_graph` XML.
    Xml,
    /// JSON node and edge lists.
    Json,
}

impl RrgFormat {
    /// The format named by a `.xml` or `.json` extension, in any case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("xml") {
            Some(RrgFormat::Xml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(RrgFormat::Json)
        } else {
            None
        }
    }

    /// Guesses from content: markup is XML, anything else JSON.
    pub fn sniff(text: &str) -> Self {
        if text.trim_start_matches('\u{feff}').trim_start().starts_with('<') {
            RrgFormat::Xml
        } else {
            RrgFormat::Json
        }
    }
}

/// Parses a device description in the given format.
pub fn parse_rrg(
    text: &str,
    format: RrgFormat,
    sink: &DiagnosticSink,
) -> Result<RoutingResourceGraph, IngestError> {
    match format {
        RrgFormat::Xml => parse_rrg_xml(text, sink),
        RrgFormat::Json => parse_rrg_json(text, sink),
    }
}
