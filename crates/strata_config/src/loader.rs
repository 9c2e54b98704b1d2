//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{DirectionSpec, StrataConfig};
use std::collections::BTreeSet;
use std::path::Path;

/// The configuration file name looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "strata.toml";

/// Loads and validates `<dir>/strata.toml`.
pub fn load_config(dir: &Path) -> Result<StrataConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<StrataConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<StrataConfig, ConfigError> {
    let config: StrataConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges and that direction rules are unambiguous.
fn validate_config(config: &StrataConfig) -> Result<(), ConfigError> {
    if config.diagram.depth == 0 {
        return Err(ConfigError::ValidationError(
            "diagram.depth must be at least 1".to_string(),
        ));
    }
    let sizes = [
        ("layout.min_block_width", config.layout.min_block_width),
        ("layout.min_block_height", config.layout.min_block_height),
    ];
    for (name, value) in sizes {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be a non-negative number"
            )));
        }
    }
    let spacings = [
        ("layout.layer_spacing", config.layout.layer_spacing),
        ("layout.node_spacing", config.layout.node_spacing),
    ];
    for (name, value) in spacings {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be a positive number"
            )));
        }
    }
    for (link_type, spec) in &config.directions {
        validate_direction(link_type, spec)?;
    }
    Ok(())
}

fn validate_direction(link_type: &str, spec: &DirectionSpec) -> Result<(), ConfigError> {
    let listed = spec.source.len() + spec.sink.len() + spec.bidir.len();
    if spec.all.is_some() && listed > 0 {
        return Err(ConfigError::ValidationError(format!(
            "directions.\"{link_type}\" sets `all` together with per-port lists"
        )));
    }
    if spec.all.is_none() && listed == 0 {
        return Err(ConfigError::ValidationError(format!(
            "directions.\"{link_type}\" assigns no roles"
        )));
    }
    let mut seen = BTreeSet::new();
    for port in spec.source.iter().chain(&spec.sink).chain(&spec.bidir) {
        if !seen.insert(port.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "directions.\"{link_type}\" lists port '{port}' under more than one role"
            )));
        }
    }
    Ok(())
}
