//! Layout configuration and `rrview.toml` project file handling.
//!
//! The [`LayoutConfiguration`] is the immutable value every coordinate-mapping
//! and metric call takes; this crate builds it from defaults, from an
//! `rrview.toml` file, and from the device size a route file declares.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
