//! Error types for graph construction and ingestion.

use rrview_common::NodeId;

/// Errors raised when a graph mutation would break referential integrity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The operation named a node id absent from the graph.
    #[error("unknown node reference: {0}")]
    UnknownNode(NodeId),
}

/// Whole-document ingestion failures.
///
/// Problems with individual records are never returned here; they are emitted
/// as diagnostics and the record is skipped.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The device description cannot be read as a whole document.
    #[error("malformed input: {0}")]
    MalformedDocument(String),
}
