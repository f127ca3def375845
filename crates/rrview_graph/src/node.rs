//! Nodes and edges of the routing-resource graph.

use rrview_common::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a routing-resource graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    /// Virtual start of a net; may fan out through several equivalent OPINs.
    Source,
    /// Virtual end of a net; may be reached through several equivalent IPINs.
    Sink,
    /// Output pin on a block boundary.
    Opin,
    /// Input pin on a block boundary.
    Ipin,
    /// Horizontal prefabricated wire segment.
    Chanx,
    /// Vertical prefabricated wire segment.
    Chany,
    /// IO block.
    Io,
}

impl NodeKind {
    /// All kinds, in declaration order.
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Source,
        NodeKind::Sink,
        NodeKind::Opin,
        NodeKind::Ipin,
        NodeKind::Chanx,
        NodeKind::Chany,
        NodeKind::Io,
    ];

    /// Returns `true` for routing wires (CHANX/CHANY).
    pub fn is_channel(self) -> bool {
        matches!(self, NodeKind::Chanx | NodeKind::Chany)
    }

    /// Returns `true` for the logical endpoints of a net (SOURCE/SINK).
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeKind::Source | NodeKind::Sink)
    }

    /// Returns `true` for block-boundary pins (IPIN/OPIN).
    pub fn is_pin(self) -> bool {
        matches!(self, NodeKind::Ipin | NodeKind::Opin)
    }

    /// The canonical upper-case name used in device and route files.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Source => "SOURCE",
            NodeKind::Sink => "SINK",
            NodeKind::Opin => "OPIN",
            NodeKind::Ipin => "IPIN",
            NodeKind::Chanx => "CHANX",
            NodeKind::Chany => "CHANY",
            NodeKind::Io => "IO",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown node kind '{s}'"))
    }
}

/// The side of a logic block a pin sits on.
///
/// Corner pins carry a compound side such as `TOP_RIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinSide {
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl PinSide {
    /// All sides, plain sides first.
    pub const ALL: [PinSide; 8] = [
        PinSide::Top,
        PinSide::Bottom,
        PinSide::Left,
        PinSide::Right,
        PinSide::TopLeft,
        PinSide::TopRight,
        PinSide::BottomLeft,
        PinSide::BottomRight,
    ];

    /// Returns `true` for the four plain sides, `false` for corners.
    pub fn is_single(self) -> bool {
        matches!(
            self,
            PinSide::Top | PinSide::Bottom | PinSide::Left | PinSide::Right
        )
    }

    /// The canonical upper-case name used in device files.
    pub fn as_str(self) -> &'static str {
        match self {
            PinSide::Top => "TOP",
            PinSide::Bottom => "BOTTOM",
            PinSide::Left => "LEFT",
            PinSide::Right => "RIGHT",
            PinSide::TopLeft => "TOP_LEFT",
            PinSide::TopRight => "TOP_RIGHT",
            PinSide::BottomLeft => "BOTTOM_LEFT",
            PinSide::BottomRight => "BOTTOM_RIGHT",
        }
    }
}

impl fmt::Display for PinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PinSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PinSide::ALL
            .into_iter()
            .find(|side| side.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown pin side '{s}'"))
    }
}

/// A point or span in the routing-resource graph.
///
/// Bounds are grid-cell indices. Point-like kinds have `x_low == x_high` and
/// `y_low == y_high`; wires may span several cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id within the graph.
    pub id: NodeId,
    /// What the node represents.
    pub kind: NodeKind,
    /// Pin number or track index within the channel (the `ptc` field).
    pub track: u32,
    /// Lowest grid column covered.
    pub x_low: u32,
    /// Highest grid column covered.
    pub x_high: u32,
    /// Lowest grid row covered.
    pub y_low: u32,
    /// Highest grid row covered.
    pub y_high: u32,
    /// Block side, for pins that declare one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<PinSide>,
}

impl Node {
    /// Creates a point-like node at `(x, y)`.
    pub fn at(id: u32, kind: NodeKind, x: u32, y: u32, track: u32) -> Self {
        Self {
            id: NodeId::from_raw(id),
            kind,
            track,
            x_low: x,
            x_high: x,
            y_low: y,
            y_high: y,
            side: None,
        }
    }

    /// Returns `true` if the node occupies a single grid cell.
    pub fn is_point(&self) -> bool {
        self.x_low == self.x_high && self.y_low == self.y_high
    }
}

/// A directed connection between two graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Driving node.
    pub source: NodeId,
    /// Driven node.
    pub sink: NodeId,
}

impl Edge {
    /// Creates an edge from raw node ids.
    pub fn new(source: u32, sink: u32) -> Self {
        Self {
            source: NodeId::from_raw(source),
            sink: NodeId::from_raw(sink),
        }
    }

    /// Returns the endpoint opposite `node`, if `node` is an endpoint.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.sink)
        } else if self.sink == node {
            Some(self.source)
        } else {
            None
        }
    }
}
