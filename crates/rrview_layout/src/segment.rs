//! Channel classification and physical segment slots.
//!
//! A routing channel between two rows (or columns) of logic blocks is an
//! *interior* channel. A channel between the outermost row (or column) and
//! the IO ring is an *IO-boundary* channel. Parallel tracks at the same grid
//! location share one physical slot, identified by a [`SegmentCoord`].

use rrview_config::LayoutConfiguration;
use rrview_graph::{Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a routing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelAxis {
    /// CHANX wires, running left to right.
    Horizontal,
    /// CHANY wires, running bottom to top.
    Vertical,
}

impl ChannelAxis {
    /// Returns the axis of a channel kind, or `None` for any other kind.
    pub fn of(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Chanx => Some(Self::Horizontal),
            NodeKind::Chany => Some(Self::Vertical),
            _ => None,
        }
    }

    /// The node kind carried by channels on this axis.
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Horizontal => NodeKind::Chanx,
            Self::Vertical => NodeKind::Chany,
        }
    }
}

/// Where a channel sits in the floorplan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelRegion {
    /// Between two rows or columns of logic blocks.
    Interior,
    /// Between the logic-block array and the IO ring.
    IoBoundary,
}

impl fmt::Display for ChannelRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interior => write!(f, "interior"),
            Self::IoBoundary => write!(f, "io-boundary"),
        }
    }
}

/// Classifies a channel node, or returns `None` if it is not a channel or
/// lies outside the floorplan.
///
/// A CHANX node at `y_low == 0` or `y_low == rows` is an IO-boundary channel;
/// `1 <= y_low < rows` is interior. CHANY mirrors this on `x_low` and `cols`.
/// The along-channel index must name an existing column (CHANX) or row
/// (CHANY).
pub fn channel_region(node: &Node, layout: &LayoutConfiguration) -> Option<ChannelRegion> {
    let (across, across_count, along, along_count) = match ChannelAxis::of(node.kind)? {
        ChannelAxis::Horizontal => (node.y_low, layout.rows, node.x_low, layout.cols),
        ChannelAxis::Vertical => (node.x_low, layout.cols, node.y_low, layout.rows),
    };
    if !(1..=along_count).contains(&along) {
        return None;
    }
    if across == 0 || across == across_count {
        Some(ChannelRegion::IoBoundary)
    } else if across < across_count {
        Some(ChannelRegion::Interior)
    } else {
        None
    }
}

/// One physical channel slot: every track of a channel at one grid location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentCoord {
    /// Channel direction.
    pub axis: ChannelAxis,
    /// Grid column of the slot (`x_low`).
    pub x: u32,
    /// Grid row of the slot (`y_low`).
    pub y: u32,
    /// Interior or IO-boundary.
    pub region: ChannelRegion,
}

impl SegmentCoord {
    /// Returns the slot a channel node occupies, or `None` if the node is
    /// not a channel with a place on the floorplan.
    pub fn of(node: &Node, layout: &LayoutConfiguration) -> Option<Self> {
        let region = channel_region(node, layout)?;
        let axis = ChannelAxis::of(node.kind)?;
        Some(Self {
            axis,
            x: node.x_low,
            y: node.y_low,
            region,
        })
    }
}

impl fmt::Display for SegmentCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{}) {}", self.axis.kind(), self.x, self.y, self.region)
    }
}
