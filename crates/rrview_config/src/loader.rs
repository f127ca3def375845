//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the project configuration file looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "rrview.toml";

/// Loads and validates `rrview.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates layout parameters and report settings.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    config.layout.resolve(None).validate()?;
    if !config.report.bbox_padding.is_finite() || config.report.bbox_padding < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "report.bbox_padding must be non-negative, got {}",
            config.report.bbox_padding
        )));
    }
    Ok(())
}
