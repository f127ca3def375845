//! Wirelength, bounding-box and congestion metrics over a routed design.
//!
//! A [`MetricsEngine`] borrows the routing-resource graph, the routing
//! solution, a configured [`CoordinateMapper`](rrview_layout::CoordinateMapper)
//! and a diagnostic sink. Every metric is recomputed on each call; nothing is
//! cached except node positions, which live in the mapper's coordinate map.
//!
//! Nodes without a floorplan position are excluded from positional metrics
//! and reported as warnings. Only an unconfigured mapper, an unknown net, or
//! a layout that would divide by zero make a metric fail.

#![warn(missing_docs)]

pub mod bbox;
pub mod congestion;
pub mod engine;
pub mod error;
pub mod wirelength;

pub use bbox::{Bounds, BoundingBoxResult};
pub use congestion::{SegmentUsage, WireLoad};
pub use engine::MetricsEngine;
pub use error::MetricsError;
pub use wirelength::{DeviationMetrics, DeviationSummary, HpwlSummary};
