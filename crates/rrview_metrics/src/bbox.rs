//! Bounding boxes over mapped node positions, measured in grid cells.

use crate::engine::MetricsEngine;
use crate::error::MetricsError;
use rayon::prelude::*;
use rrview_common::{NetIndex, NodeId, Position};
use rrview_config::LayoutConfiguration;
use rrview_diagnostics::Diagnostic;
use rrview_graph::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An axis-aligned rectangle in floorplan units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Leftmost x.
    pub min_x: f64,
    /// Rightmost x.
    pub max_x: f64,
    /// Lowest y.
    pub min_y: f64,
    /// Highest y.
    pub max_y: f64,
}

impl Bounds {
    /// The smallest rectangle containing every position, or `None` if there
    /// are none.
    pub fn enclosing(positions: impl IntoIterator<Item = Position>) -> Option<Bounds> {
        positions.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    min_x: p.x,
                    max_x: p.x,
                    min_y: p.y,
                    max_y: p.y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    max_x: b.max_x.max(p.x),
                    min_y: b.min_y.min(p.y),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `width + height`.
    pub fn half_perimeter(&self) -> f64 {
        self.width() + self.height()
    }
}

/// A bounding box and its footprint in whole grid cells.
///
/// `bounds` are the unpadded extents of the positioned nodes. The cell
/// counts include padding on every side: `width_cells` is
/// `ceil((width + 2 * padding) / (cell_size + cell_gap))`, likewise for
/// height, and `area_cells` is their product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxResult {
    /// Extents, absent when no node had a position.
    pub bounds: Option<Bounds>,
    /// Padded width in grid cells.
    pub width_cells: u64,
    /// Padded height in grid cells.
    pub height_cells: u64,
    /// `width_cells * height_cells`.
    pub area_cells: u64,
}

impl BoundingBoxResult {
    /// The result for an input with no positioned nodes.
    pub const EMPTY: BoundingBoxResult = BoundingBoxResult {
        bounds: None,
        width_cells: 0,
        height_cells: 0,
        area_cells: 0,
    };

    fn measure(positions: &[Position], padding: f64, pitch: f64) -> Self {
        let Some(bounds) = Bounds::enclosing(positions.iter().copied()) else {
            return Self::EMPTY;
        };
        let cells = |extent: f64| ((extent + 2.0 * padding) / pitch).ceil() as u64;
        let width_cells = cells(bounds.width());
        let height_cells = cells(bounds.height());
        Self {
            bounds: Some(bounds),
            width_cells,
            height_cells,
            area_cells: width_cells * height_cells,
        }
    }
}

/// The grid-cell divisor, rejected if it would corrupt every box.
fn grid_pitch(layout: &LayoutConfiguration) -> Result<f64, MetricsError> {
    if !(layout.cell_size.is_finite() && layout.cell_size > 0.0) {
        return Err(MetricsError::DivideByZero {
            quantity: "cell_size",
            value: layout.cell_size,
        });
    }
    let pitch = layout.cell_pitch();
    if !(pitch.is_finite() && pitch > 0.0) {
        return Err(MetricsError::DivideByZero {
            quantity: "cell pitch",
            value: pitch,
        });
    }
    Ok(pitch)
}

fn check_padding(padding: f64) -> Result<(), MetricsError> {
    if padding.is_finite() && padding >= 0.0 {
        Ok(())
    } else {
        Err(MetricsError::InvalidPadding(padding))
    }
}

impl MetricsEngine<'_> {
    /// Bounding box over the positions of `ids`, padded by `padding` on
    /// every side.
    ///
    /// Ids not in the graph and nodes without a position are reported and
    /// left out. An empty or fully unmapped input yields
    /// [`BoundingBoxResult::EMPTY`].
    ///
    /// # Errors
    ///
    /// [`MetricsError::DivideByZero`] if the layout's cell size or pitch is
    /// not positive, [`MetricsError::InvalidPadding`] for negative padding.
    pub fn bounding_box(
        &self,
        ids: &[NodeId],
        padding: f64,
    ) -> Result<BoundingBoxResult, MetricsError> {
        self.boxed(ids, padding, |_| true)
    }

    /// Like [`bounding_box`](Self::bounding_box), restricted to SOURCE and
    /// SINK nodes.
    pub fn terminal_bounding_box(
        &self,
        ids: &[NodeId],
        padding: f64,
    ) -> Result<BoundingBoxResult, MetricsError> {
        self.boxed(ids, padding, NodeKind::is_terminal)
    }

    /// Bounding box of one net's route, or of its terminals only.
    pub fn net_bounding_box(
        &self,
        index: NetIndex,
        padding: f64,
        terminals_only: bool,
    ) -> Result<BoundingBoxResult, MetricsError> {
        let map = self.coords()?;
        let pitch = grid_pitch(map.layout())?;
        check_padding(padding)?;
        let net = self.net(index)?;
        let located = self.locate(map, net.nodes(), |kind| !terminals_only || kind.is_terminal());
        self.report_for_net(net, located.diagnostics);
        Ok(BoundingBoxResult::measure(&located.positions, padding, pitch))
    }

    /// The net whose full route has the largest `area_cells`.
    ///
    /// Ties go to the lowest serial index. Returns `None` for an empty
    /// route.
    pub fn largest_bounding_box_net(
        &self,
        padding: f64,
    ) -> Result<Option<(NetIndex, BoundingBoxResult)>, MetricsError> {
        self.largest_net_box(padding, false)
    }

    /// The net picked by [`largest_bounding_box_net`](Self::largest_bounding_box_net),
    /// measured over its SOURCE and SINK nodes only.
    ///
    /// Each net's diagnostics are reported once, from the full-route pass.
    pub fn largest_net_terminal_box(
        &self,
        padding: f64,
    ) -> Result<Option<(NetIndex, BoundingBoxResult)>, MetricsError> {
        self.largest_net_box(padding, true)
    }

    fn largest_net_box(
        &self,
        padding: f64,
        terminals_only: bool,
    ) -> Result<Option<(NetIndex, BoundingBoxResult)>, MetricsError> {
        let map = self.coords()?;
        let pitch = grid_pitch(map.layout())?;
        check_padding(padding)?;

        let measured: BTreeMap<NetIndex, (u64, BoundingBoxResult, Vec<Diagnostic>)> = self
            .route
            .nets()
            .par_iter()
            .map(|net| {
                let located = self.locate(map, net.nodes(), |_| true);
                let full = BoundingBoxResult::measure(&located.positions, padding, pitch);
                let scoped = if terminals_only {
                    // Terminals are a subset of the route; their diagnostics are in `located`.
                    let terminals = self.locate(map, net.nodes(), NodeKind::is_terminal);
                    BoundingBoxResult::measure(&terminals.positions, padding, pitch)
                } else {
                    full
                };
                (net.index, (full.area_cells, scoped, located.diagnostics))
            })
            .collect();

        let mut best: Option<(NetIndex, u64, BoundingBoxResult)> = None;
        for (index, (area, result, diagnostics)) in measured {
            self.report_for_net(self.indexed_net(index)?, diagnostics);
            if best.map_or(true, |(_, best_area, _)| area > best_area) {
                best = Some((index, area, result));
            }
        }
        Ok(best.map(|(index, _, result)| (index, result)))
    }

    fn boxed(
        &self,
        ids: &[NodeId],
        padding: f64,
        keep: impl Fn(NodeKind) -> bool,
    ) -> Result<BoundingBoxResult, MetricsError> {
        let map = self.coords()?;
        let pitch = grid_pitch(map.layout())?;
        check_padding(padding)?;
        let located = self.locate(map, ids.iter().copied(), keep);
        self.sink.extend(located.diagnostics);
        Ok(BoundingBoxResult::measure(&located.positions, padding, pitch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::*;
    use rrview_diagnostics::{DiagnosticCode, DiagnosticSink};
    use rrview_layout::{CoordinateMap, CoordinateMapper};

    fn ids(raw: &[u32]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::from_raw).collect()
    }

    #[test]
    fn empty_input_has_zero_area() {
        let g = graph();
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let result = engine.bounding_box(&[], 0.4).unwrap();
        assert_eq!(result, BoundingBoxResult::EMPTY);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn fully_unmapped_input_has_zero_area() {
        let g = graph();
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let result = engine.bounding_box(&ids(&[90]), 0.4).unwrap();
        assert_eq!(result.area_cells, 0);
        assert_eq!(sink.count_code(DiagnosticCode::UNMAPPABLE_NODE), 1);
    }

    #[test]
    fn single_node_with_padding_is_one_cell() {
        let g = graph();
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let padded = engine.bounding_box(&ids(&[1]), 0.4).unwrap();
        assert_eq!((padded.width_cells, padded.height_cells, padded.area_cells), (1, 1, 1));
        let bare = engine.bounding_box(&ids(&[1]), 0.0).unwrap();
        assert_eq!(bare.area_cells, 0);
        assert!(bare.bounds.is_some());
    }

    #[test]
    fn source_to_distant_sink() {
        let g = graph();
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        // (2.0, 2.0) to (5.5, 2.0): width 3.5 + 0.8 padding = 2.46 pitches
        let result = engine.bounding_box(&ids(&[1, 6]), 0.4).unwrap();
        let b = result.bounds.unwrap();
        assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (2.0, 5.5, 2.0, 2.0));
        assert_eq!((result.width_cells, result.height_cells), (3, 1));
        assert_eq!(result.area_cells, 3);
    }

    #[test]
    fn area_is_monotonic_in_added_nodes() {
        let g = graph();
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let order = [1, 3, 42, 90, 50, 6, 7, 44];
        let mut path = Vec::new();
        let mut previous = 0;
        for raw in order {
            path.push(NodeId::from_raw(raw));
            let area = engine.bounding_box(&path, 0.4).unwrap().area_cells;
            assert!(area >= previous, "area shrank after adding node {raw}");
            previous = area;
        }
    }

    #[test]
    fn terminal_box_ignores_channels() {
        let g = graph();
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let path = ids(&[1, 2, 3, 50, 5, 6]);
        let full = engine.bounding_box(&path, 0.0).unwrap();
        let terminals = engine.terminal_bounding_box(&path, 0.0).unwrap();
        assert!(full.area_cells >= terminals.area_cells);
        let b = terminals.bounds.unwrap();
        assert_eq!((b.min_y, b.max_y), (2.0, 2.0));
        assert!(full.bounds.unwrap().min_y < 1.0);
    }

    #[test]
    fn zero_cell_size_is_divide_by_zero() {
        let g = graph();
        let r = route(vec![]);
        let sink = DiagnosticSink::new();
        // bypass configure() validation to reach the metric's own check
        let bad = LayoutConfiguration {
            cell_size: 0.0,
            cell_gap: 0.0,
            ..LayoutConfiguration::default()
        };
        let map = CoordinateMap::build(&g, bad);
        assert!(matches!(
            grid_pitch(map.layout()),
            Err(MetricsError::DivideByZero { quantity: "cell_size", .. })
        ));

        let m = CoordinateMapper::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);
        assert!(matches!(
            engine.bounding_box(&[], 0.4),
            Err(MetricsError::Unconfigured)
        ));
    }

    #[test]
    fn negative_padding_rejected() {
        let g = graph();
        let r = route(vec![]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);
        assert!(matches!(
            engine.bounding_box(&ids(&[1]), -0.1),
            Err(MetricsError::InvalidPadding(_))
        ));
    }

    #[test]
    fn largest_net_breaks_ties_by_index() {
        let g = graph();
        let r = route(vec![
            net(4, &[(1, NodeKind::Source), (6, NodeKind::Sink)]),
            net(2, &[(1, NodeKind::Source), (6, NodeKind::Sink)]),
            net(3, &[(1, NodeKind::Source)]),
        ]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let (index, result) = engine.largest_bounding_box_net(0.4).unwrap().unwrap();
        assert_eq!(index, NetIndex::from_raw(2));
        assert_eq!(result.area_cells, 3);
    }

    #[test]
    fn largest_terminal_box_reports_each_net_once() {
        let g = graph();
        let r = route(vec![
            net(
                0,
                &[
                    (1, NodeKind::Source),
                    (50, NodeKind::Chanx),
                    (90, NodeKind::Io),
                    (6, NodeKind::Sink),
                ],
            ),
            net(1, &[(1, NodeKind::Source), (99, NodeKind::Chany), (7, NodeKind::Sink)]),
        ]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);

        let (index, result) = engine.largest_net_terminal_box(0.4).unwrap().unwrap();
        assert_eq!(index, NetIndex::from_raw(0));
        // SOURCE (2.0, 2.0) to SINK (5.5, 2.0)
        assert_eq!((result.width_cells, result.height_cells), (3, 1));
        assert_eq!(sink.count_code(DiagnosticCode::UNMAPPABLE_NODE), 1);
        assert_eq!(sink.count_code(DiagnosticCode::UNKNOWN_NODE_REFERENCE), 1);
    }

    #[test]
    fn net_box_of_unknown_net() {
        let g = graph();
        let r = route(vec![net(0, &[(1, NodeKind::Source)])]);
        let m = mapper(&g);
        let sink = DiagnosticSink::new();
        let engine = MetricsEngine::new(&g, &r, &m, &sink);
        assert!(matches!(
            engine.net_bounding_box(NetIndex::from_raw(9), 0.4, false),
            Err(MetricsError::UnknownNet(_))
        ));
        assert_eq!(
            engine
                .net_bounding_box(NetIndex::from_raw(0), 0.4, true)
                .unwrap()
                .area_cells,
            1
        );
    }

    #[test]
    fn bounds_enclosing() {
        assert!(Bounds::enclosing(Vec::new()).is_none());
        let b = Bounds::enclosing([Position::new(0.0, 0.0), Position::new(3.0, 4.0)]).unwrap();
        assert_eq!(b.half_perimeter(), 7.0);
    }
}
