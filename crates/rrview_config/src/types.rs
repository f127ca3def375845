//! Configuration types: the layout value and the `rrview.toml` file schema.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const DEFAULT_CELL_SIZE: f64 = 0.5;
const DEFAULT_IO_SIZE: f64 = 0.5;
const DEFAULT_TRACK_SPACING: f64 = 0.12;
const DEFAULT_TRACKS_PER_CHANNEL: u32 = 8;
const DEFAULT_CELL_GAP: f64 = 1.25;
const DEFAULT_IO_GAP: f64 = 1.25;
const DEFAULT_ROWS: u32 = 6;
const DEFAULT_COLS: u32 = 6;

/// Immutable parameters of the visual floorplan.
///
/// The device is a `rows × cols` array of logic-block cells (1-based indices),
/// each `cell_size` wide, separated by `cell_gap`. One ring of IO blocks of
/// `io_size` surrounds the array at a distance of `io_gap`. Routing channels
/// sit in the gaps, with `tracks_per_channel` parallel tracks spaced
/// `track_spacing` apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfiguration {
    /// Edge length of one logic-block cell.
    pub cell_size: f64,
    /// Edge length of one IO block.
    pub io_size: f64,
    /// Distance between adjacent tracks of one channel.
    pub track_spacing: f64,
    /// Number of tracks per routing channel.
    pub tracks_per_channel: u32,
    /// Gap between adjacent logic-block cells.
    pub cell_gap: f64,
    /// Gap between the IO ring and the logic-block array.
    pub io_gap: f64,
    /// Number of logic-block rows.
    pub rows: u32,
    /// Number of logic-block columns.
    pub cols: u32,
}

impl LayoutConfiguration {
    /// Returns the layout for a `rows × cols` device with all other
    /// parameters at their defaults.
    pub fn with_grid(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Width of the band occupied by all tracks of one channel.
    pub fn channel_width(&self) -> f64 {
        self.tracks_per_channel as f64 * self.track_spacing
    }

    /// Distance between the origins of two adjacent logic-block cells.
    pub fn cell_pitch(&self) -> f64 {
        self.cell_size + self.cell_gap
    }

    /// Coordinate of the lower/left edge of logic-block cell 1.
    pub fn array_origin(&self) -> f64 {
        self.io_size + self.io_gap
    }

    /// Checks that every parameter describes a drawable floorplan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(invalid("layout.rows must be at least 1"));
        }
        if self.cols == 0 {
            return Err(invalid("layout.cols must be at least 1"));
        }
        let positive = [("cell_size", self.cell_size), ("io_size", self.io_size)];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("layout.{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("track_spacing", self.track_spacing),
            ("cell_gap", self.cell_gap),
            ("io_gap", self.io_gap),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "layout.{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

impl Default for LayoutConfiguration {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            io_size: DEFAULT_IO_SIZE,
            track_spacing: DEFAULT_TRACK_SPACING,
            tracks_per_channel: DEFAULT_TRACKS_PER_CHANNEL,
            cell_gap: DEFAULT_CELL_GAP,
            io_gap: DEFAULT_IO_GAP,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

/// The top-level project configuration parsed from `rrview.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Floorplan parameters.
    #[serde(default)]
    pub layout: LayoutSection,
    /// Default input files.
    #[serde(default)]
    pub inputs: InputsConfig,
    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// The `[layout]` table.
///
/// Grid dimensions are optional so that a device size declared by the route
/// file can fill them in; everything else falls back to the defaults.
#[derive(Debug, Deserialize)]
pub struct LayoutSection {
    /// Edge length of one logic-block cell.
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    /// Edge length of one IO block.
    #[serde(default = "default_io_size")]
    pub io_size: f64,
    /// Distance between adjacent tracks.
    #[serde(default = "default_track_spacing")]
    pub track_spacing: f64,
    /// Number of tracks per channel.
    #[serde(default = "default_tracks_per_channel")]
    pub tracks_per_channel: u32,
    /// Gap between adjacent logic-block cells.
    #[serde(default = "default_cell_gap")]
    pub cell_gap: f64,
    /// Gap between the IO ring and the array.
    #[serde(default = "default_io_gap")]
    pub io_gap: f64,
    /// Explicit logic-block row count.
    pub rows: Option<u32>,
    /// Explicit logic-block column count.
    pub cols: Option<u32>,
}

impl LayoutSection {
    /// Builds the layout, taking grid dimensions from this section first,
    /// then from `array_size` (`(cols, rows)` as declared by a route file),
    /// then from the defaults.
    pub fn resolve(&self, array_size: Option<(u32, u32)>) -> LayoutConfiguration {
        let (declared_cols, declared_rows) = match array_size {
            Some((cols, rows)) => (Some(cols), Some(rows)),
            None => (None, None),
        };
        LayoutConfiguration {
            cell_size: self.cell_size,
            io_size: self.io_size,
            track_spacing: self.track_spacing,
            tracks_per_channel: self.tracks_per_channel,
            cell_gap: self.cell_gap,
            io_gap: self.io_gap,
            rows: self.rows.or(declared_rows).unwrap_or(DEFAULT_ROWS),
            cols: self.cols.or(declared_cols).unwrap_or(DEFAULT_COLS),
        }
    }
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            io_size: DEFAULT_IO_SIZE,
            track_spacing: DEFAULT_TRACK_SPACING,
            tracks_per_channel: DEFAULT_TRACKS_PER_CHANNEL,
            cell_gap: DEFAULT_CELL_GAP,
            io_gap: DEFAULT_IO_GAP,
            rows: None,
            cols: None,
        }
    }
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

fn default_io_size() -> f64 {
    DEFAULT_IO_SIZE
}

fn default_track_spacing() -> f64 {
    DEFAULT_TRACK_SPACING
}

fn default_tracks_per_channel() -> u32 {
    DEFAULT_TRACKS_PER_CHANNEL
}

fn default_cell_gap() -> f64 {
    DEFAULT_CELL_GAP
}

fn default_io_gap() -> f64 {
    DEFAULT_IO_GAP
}

/// The `[inputs]` table: default input files, relative to the config file.
#[derive(Debug, Default, Deserialize)]
pub struct InputsConfig {
    /// Path to the routing-resource graph description (JSON).
    pub rrg: Option<String>,
    /// Path to the routing solution (`.route` text).
    pub route: Option<String>,
}

/// The `[report]` table.
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// How many nets to list in ranked tables.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Padding added on every side of a bounding box, in layout units.
    #[serde(default = "default_bbox_padding")]
    pub bbox_padding: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            bbox_padding: default_bbox_padding(),
        }
    }
}

fn default_top_n() -> usize {
    10
}

fn default_bbox_padding() -> f64 {
    0.4
}
