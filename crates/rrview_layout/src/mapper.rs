//! The pure node-to-position mapping.
//!
//! Floorplan geometry, along either axis:
//!
//! ```text
//! 0        io_size          origin = io_size + io_gap
//! |-- IO --|---- io_gap ----|-- cell 1 --|-- cell_gap --|-- cell 2 --| ...
//! ```
//!
//! Cell `i` (1-based) starts at `origin + (i - 1) * (cell_size + cell_gap)`.
//! A channel band is `tracks_per_channel * track_spacing` wide and is
//! centred in the gap it occupies; track `t` sits `t * track_spacing` above
//! (CHANX) or right of (CHANY) the band's lower edge.

use crate::segment::{channel_region, ChannelAxis, ChannelRegion};
use rrview_common::Position;
use rrview_config::LayoutConfiguration;
use rrview_graph::{Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The device edge an IO block sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoEdge {
    /// Row 0.
    Bottom,
    /// Row `rows`.
    Top,
    /// Column 0.
    Left,
    /// Column `cols`.
    Right,
}

impl IoEdge {
    /// Resolution order when a node's bounds satisfy more than one edge
    /// (corner blocks): the first matching edge wins.
    pub const PRIORITY: [IoEdge; 4] = [IoEdge::Bottom, IoEdge::Top, IoEdge::Left, IoEdge::Right];

    fn matches(self, node: &Node, layout: &LayoutConfiguration) -> bool {
        let on = |low: u32, high: u32, at: u32| low == at && high == at;
        match self {
            IoEdge::Bottom => on(node.y_low, node.y_high, 0),
            IoEdge::Top => on(node.y_low, node.y_high, layout.rows),
            IoEdge::Left => on(node.x_low, node.x_high, 0),
            IoEdge::Right => on(node.x_low, node.x_high, layout.cols),
        }
    }
}

impl fmt::Display for IoEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoEdge::Bottom => "bottom",
            IoEdge::Top => "top",
            IoEdge::Left => "left",
            IoEdge::Right => "right",
        };
        f.write_str(name)
    }
}

/// Returns the device edge of an IO node, or `None` if the node is not an
/// IO node or its bounds lie on no edge.
pub fn io_edge(node: &Node, layout: &LayoutConfiguration) -> Option<IoEdge> {
    if node.kind != NodeKind::Io {
        return None;
    }
    IoEdge::PRIORITY
        .into_iter()
        .find(|edge| edge.matches(node, layout))
}

/// Maps a node to its floorplan position.
///
/// Returns `None` when the node's kind and bounds match no floorplan
/// feature: block-centred kinds outside `[1, cols] × [1, rows]`, channels
/// outside the array or its IO gaps, and IO nodes on no device edge.
pub fn map_node(node: &Node, layout: &LayoutConfiguration) -> Option<Position> {
    let plan = Floorplan(layout);
    match node.kind {
        NodeKind::Source | NodeKind::Sink | NodeKind::Opin | NodeKind::Ipin => {
            if !(1..=layout.cols).contains(&node.x_low) || !(1..=layout.rows).contains(&node.y_low) {
                return None;
            }
            Some(Position::new(
                plan.cell_center(node.x_low),
                plan.cell_center(node.y_low),
            ))
        }
        NodeKind::Chanx | NodeKind::Chany => plan.channel(node),
        NodeKind::Io => plan.io_block(node),
    }
}

/// Axis-independent floorplan arithmetic over one layout.
struct Floorplan<'a>(&'a LayoutConfiguration);

impl Floorplan<'_> {
    /// Lower edge of 1-based cell `index`.
    fn cell_start(&self, index: u32) -> f64 {
        self.0.array_origin() + (f64::from(index) - 1.0) * self.0.cell_pitch()
    }

    fn cell_center(&self, index: u32) -> f64 {
        self.cell_start(index) + self.0.cell_size / 2.0
    }

    /// Lower edge of the far IO ring along an axis with `count` cells.
    fn far_ring_start(&self, count: u32) -> f64 {
        self.cell_start(count) + self.0.cell_size + self.0.io_gap
    }

    /// Lower edge of the channel band with cross-axis index `across`.
    fn band_start(&self, across: u32, count: u32, region: ChannelRegion) -> f64 {
        let half_band = self.0.channel_width() / 2.0;
        match region {
            ChannelRegion::IoBoundary if across == 0 => {
                self.0.io_size + self.0.io_gap / 2.0 - half_band
            }
            ChannelRegion::IoBoundary => self.far_ring_start(count) - self.0.io_gap / 2.0 - half_band,
            ChannelRegion::Interior => {
                self.cell_start(across) + self.0.cell_size + self.0.cell_gap / 2.0 - half_band
            }
        }
    }

    fn channel(&self, node: &Node) -> Option<Position> {
        let region = channel_region(node, self.0)?;
        let offset = f64::from(node.track) * self.0.track_spacing;
        match ChannelAxis::of(node.kind)? {
            ChannelAxis::Horizontal => Some(Position::new(
                self.cell_center(node.x_low),
                self.band_start(node.y_low, self.0.rows, region) + offset,
            )),
            ChannelAxis::Vertical => Some(Position::new(
                self.band_start(node.x_low, self.0.cols, region) + offset,
                self.cell_center(node.y_low),
            )),
        }
    }

    fn io_block(&self, node: &Node) -> Option<Position> {
        let near = self.0.io_size / 2.0;
        let position = match io_edge(node, self.0)? {
            IoEdge::Bottom => Position::new(self.cell_center(node.x_low), near),
            IoEdge::Top => Position::new(
                self.cell_center(node.x_low),
                self.far_ring_start(self.0.rows) + near,
            ),
            IoEdge::Left => Position::new(near, self.cell_center(node.y_low)),
            IoEdge::Right => Position::new(
                self.far_ring_start(self.0.cols) + near,
                self.cell_center(node.y_low),
            ),
        };
        Some(position)
    }
}
