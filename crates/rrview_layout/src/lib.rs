//! Coordinate mapping from routing-resource graph nodes to floorplan positions.
//!
//! The floorplan is a `rows × cols` array of logic-block cells (1-based
//! indices) ringed by one layer of IO blocks. Routing channels run through
//! the gaps between cells and through the gap between the array and the IO
//! ring. [`map_node`] places a single node; [`CoordinateMap`] memoizes
//! positions for one graph under one [`LayoutConfiguration`], and
//! [`CoordinateMapper`] tracks whether such a map exists yet.
//!
//! Mapping is a pure function of the node and the layout: the same inputs
//! always produce bit-identical positions.

#![warn(missing_docs)]

pub mod coord_map;
pub mod error;
pub mod mapper;
pub mod segment;

pub use coord_map::{CoordinateMap, CoordinateMapper};
pub use error::LayoutError;
pub use mapper::{io_edge, map_node, IoEdge};
pub use segment::{channel_region, ChannelAxis, ChannelRegion, SegmentCoord};

pub use rrview_config::LayoutConfiguration;
