//! Routing-resource graph model and ingestion.
//!
//! The [`RoutingResourceGraph`] holds the device's nodes (pins, wires and
//! virtual endpoints) and the directed edges between them. A [`Route`] holds
//! the routing solution: one [`Net`] per signal, each an ordered list of hops
//! through the graph.
//!
//! Both are built by the ingesters in [`ingest`]. Ingestion is best-effort:
//! bad records are reported to a [`DiagnosticSink`](rrview_diagnostics::DiagnosticSink)
//! and skipped, and only a document that cannot be read at all is an error.
//!
//! # Usage
//!
//! ```ignore
//! use rrview_graph::ingest::{parse_route, parse_rrg, RrgFormat};
//!
//! let sink = DiagnosticSink::new();
//! let graph = parse_rrg(&rrg_text, RrgFormat::sniff(&rrg_text), &sink)?;
//! let route = parse_route(&route_text, &sink).resolve_against(&graph, &sink);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod ingest;
pub mod node;
pub mod route;
pub mod rrg;

pub use error::{GraphError, IngestError};
pub use node::{Edge, Node, NodeKind, PinSide};
pub use route::{Net, Route, RouteHop};
pub use rrg::RoutingResourceGraph;
