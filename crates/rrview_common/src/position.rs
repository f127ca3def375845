//! Two-dimensional floorplan positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the visual floorplan, in the same physical units as the
/// layout configuration (cell size, gaps, track spacing).
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing upwards.
    pub y: f64,
}

impl Position {
    /// Creates a position from its two coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns `true` if both coordinates are bit-identical to `other`'s.
    ///
    /// Stricter than `==`: distinguishes `0.0` from `-0.0`.
    pub fn bit_eq(&self, other: &Position) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
