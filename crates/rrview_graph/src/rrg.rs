//! The routing-resource graph container.

use crate::error::GraphError;
use crate::node::{Edge, Node, NodeKind, PinSide};
use rrview_common::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The routing-resource graph of one device.
///
/// Owns every node, keyed by [`NodeId`] and kept in ingestion order, and the
/// insertion-ordered edge list. This is the single source of truth for node
/// existence: every other component refers to nodes by id and treats a
/// missing id as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingResourceGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Auxiliary index: node id to position in `nodes` (rebuilt on deserialization).
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl RoutingResourceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, returning the node it replaced if the id was taken.
    ///
    /// A replaced node keeps its original ingestion position.
    pub fn insert_node(&mut self, node: Node) -> Option<Node> {
        match self.index.get(&node.id) {
            Some(&slot) => Some(std::mem::replace(&mut self.nodes[slot], node)),
            None => {
                self.index.insert(node.id, self.nodes.len());
                self.nodes.push(node);
                None
            }
        }
    }

    /// Appends an edge after checking both endpoints exist.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        for end in [edge.source, edge.sink] {
            if !self.contains(end) {
                return Err(GraphError::UnknownNode(end));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// Returns `true` if a node with this id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Iterates over all nodes in ingestion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates over all nodes of one kind, in ingestion order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Iterates over all CHANX/CHANY nodes, in ingestion order.
    pub fn wires(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind.is_channel())
    }

    /// Returns all edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the declared side of a pin node.
    ///
    /// `None` for unknown ids, for non-pin kinds and for pins without a side.
    pub fn pin_side(&self, id: NodeId) -> Option<PinSide> {
        let node = self.node(id)?;
        if !node.kind.is_pin() {
            return None;
        }
        node.side
    }

    /// Infers which block side a wire serves from the pins it connects to.
    ///
    /// Scans edges in insertion order and returns the side of the first
    /// IPIN/OPIN neighbour whose side is a plain (non-corner) side. Returns
    /// `None` for non-wire nodes and when every connected pin is on a corner.
    pub fn wire_side(&self, id: NodeId) -> Option<PinSide> {
        let wire = self.node(id)?;
        if !wire.kind.is_channel() {
            return None;
        }
        self.edges
            .iter()
            .filter_map(|edge| edge.other_end(id))
            .filter_map(|other| self.pin_side(other))
            .find(|side| side.is_single())
    }

    /// Returns `(max x_high + 1, max y_high + 1)` over all nodes.
    ///
    /// An estimate of the device grid size, including the IO ring, for graphs
    /// that do not come with an explicit size. `(0, 0)` for an empty graph.
    pub fn grid_extent(&self) -> (u32, u32) {
        if self.nodes.is_empty() {
            return (0, 0);
        }
        let max_x = self.nodes.iter().map(|n| n.x_high).max().unwrap_or(0);
        let max_y = self.nodes.iter().map(|n| n.y_high).max().unwrap_or(0);
        (max_x + 1, max_y + 1)
    }

    /// Rebuilds the id index after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.index.clear();
        for (slot, node) in self.nodes.iter().enumerate() {
            self.index.insert(node.id, slot);
        }
    }
}
