//! Memoized node positions for one graph under one layout.

use crate::error::LayoutError;
use crate::mapper::map_node;
use rrview_common::{NodeId, Position};
use rrview_config::LayoutConfiguration;
use rrview_graph::{Node, RoutingResourceGraph};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// A lazily filled cache from node id to floorplan position.
///
/// Entries are only ever added, never changed: a node's position is a pure
/// function of the node and the layout, so whichever thread computes it
/// first stores the same value any other thread would. Unmappable nodes are
/// cached as `None`.
#[derive(Debug)]
pub struct CoordinateMap {
    layout: LayoutConfiguration,
    entries: RwLock<HashMap<NodeId, Option<Position>>>,
}

impl CoordinateMap {
    /// Creates an empty map for `layout`.
    pub fn new(layout: LayoutConfiguration) -> Self {
        Self {
            layout,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a map and fills it with every node of `graph`.
    pub fn build(graph: &RoutingResourceGraph, layout: LayoutConfiguration) -> Self {
        let map = Self::new(layout);
        map.extend(graph);
        map
    }

    /// Maps every node of `graph` not yet cached. Repeating this is harmless.
    pub fn extend(&self, graph: &RoutingResourceGraph) {
        let mut entries = self.entries.write().expect("coordinate map lock poisoned");
        for node in graph.nodes() {
            entries
                .entry(node.id)
                .or_insert_with(|| map_node(node, &self.layout));
        }
    }

    /// The layout this map was built for.
    pub fn layout(&self) -> &LayoutConfiguration {
        &self.layout
    }

    /// Returns the cached position of `id`.
    ///
    /// The outer `Option` is `None` if the node has not been mapped yet; the
    /// inner one is `None` if it was mapped and has no position.
    pub fn cached(&self, id: NodeId) -> Option<Option<Position>> {
        self.entries
            .read()
            .expect("coordinate map lock poisoned")
            .get(&id)
            .copied()
    }

    /// Returns the position of `node`, computing and caching it on first use.
    pub fn position_of(&self, node: &Node) -> Option<Position> {
        if let Some(hit) = self.cached(node.id) {
            return hit;
        }
        let computed = map_node(node, &self.layout);
        *self
            .entries
            .write()
            .expect("coordinate map lock poisoned")
            .entry(node.id)
            .or_insert(computed)
    }

    /// Looks `id` up in `graph` and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] if the graph has no such node.
    pub fn coordinate_of(
        &self,
        graph: &RoutingResourceGraph,
        id: NodeId,
    ) -> Result<Option<Position>, LayoutError> {
        let node = graph.node(id).ok_or(LayoutError::UnknownNode(id))?;
        Ok(self.position_of(node))
    }

    /// Number of cached entries, with or without a position.
    pub fn len(&self) -> usize {
        self.entries.read().expect("coordinate map lock poisoned").len()
    }

    /// Returns `true` if nothing has been mapped yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every cached node that has a position, ordered by id.
    pub fn positions(&self) -> BTreeMap<NodeId, Position> {
        self.entries
            .read()
            .expect("coordinate map lock poisoned")
            .iter()
            .filter_map(|(&id, &pos)| pos.map(|p| (id, p)))
            .collect()
    }
}

/// Owns the coordinate map once a layout has been chosen.
///
/// Starts unconfigured; asking for positions before [`configure`] is a typed
/// error rather than an empty result.
///
/// [`configure`]: CoordinateMapper::configure
#[derive(Debug, Default)]
pub struct CoordinateMapper {
    map: Option<CoordinateMap>,
}

impl CoordinateMapper {
    /// Creates an unconfigured mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `layout` and maps every node of `graph` under it, replacing
    /// any earlier configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidLayout`] if the layout fails validation;
    /// the mapper keeps its previous state.
    pub fn configure(
        &mut self,
        graph: &RoutingResourceGraph,
        layout: LayoutConfiguration,
    ) -> Result<&CoordinateMap, LayoutError> {
        layout.validate()?;
        Ok(&*self.map.insert(CoordinateMap::build(graph, layout)))
    }

    /// Returns `true` once a layout has been configured.
    pub fn is_configured(&self) -> bool {
        self.map.is_some()
    }

    /// Returns the current coordinate map.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unconfigured`] before [`configure`](Self::configure).
    pub fn map(&self) -> Result<&CoordinateMap, LayoutError> {
        self.map.as_ref().ok_or(LayoutError::Unconfigured)
    }
}
