//! Error types for coordinate mapping.

use rrview_common::NodeId;
use rrview_config::ConfigError;

/// Errors raised by the coordinate mapper.
///
/// A node that simply has no place on the floorplan is not an error; it maps
/// to `None`.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A position was requested before any layout was configured.
    #[error("coordinate mapper is not configured with a layout")]
    Unconfigured,

    /// The requested node id does not exist in the graph.
    #[error("unknown node reference: {0}")]
    UnknownNode(NodeId),

    /// The layout was rejected during configuration.
    #[error("invalid layout: {0}")]
    InvalidLayout(#[from] ConfigError),
}
