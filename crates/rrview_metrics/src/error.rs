//! Error types for the metrics engine.

use rrview_common::{InternalError, NetIndex, NodeId};
use rrview_layout::LayoutError;

/// Errors that abort a metric computation.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The coordinate mapper has no layout yet.
    #[error("metrics requested before a layout was configured")]
    Unconfigured,

    /// A layout parameter used as a divisor is zero, negative or not finite.
    #[error("layout {quantity} is {value}; cannot convert to grid cells")]
    DivideByZero {
        /// The offending derived quantity.
        quantity: &'static str,
        /// Its value.
        value: f64,
    },

    /// Bounding-box padding is negative or not finite.
    #[error("invalid bounding-box padding {0}")]
    InvalidPadding(f64),

    /// A node id is not in the graph.
    #[error("unknown node reference: {0}")]
    UnknownNode(NodeId),

    /// No net has this serial index.
    #[error("unknown net: {0}")]
    UnknownNet(NetIndex),

    /// The mapper rejected its layout.
    #[error(transparent)]
    Layout(LayoutError),

    /// A broken invariant inside the engine.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl From<LayoutError> for MetricsError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::Unconfigured => MetricsError::Unconfigured,
            LayoutError::UnknownNode(id) => MetricsError::UnknownNode(id),
            other => MetricsError::Layout(other),
        }
    }
}
