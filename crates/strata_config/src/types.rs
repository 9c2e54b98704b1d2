//! Configuration types deserialized from `strata.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The link type that gets high-fanout handling when nothing is configured.
pub const DEFAULT_FANOUT_LINK_TYPE: &str = "electronics_model.ElectricalPorts.ElectricalLink";

/// The top-level configuration parsed from `strata.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrataConfig {
    /// Diagram extraction settings.
    #[serde(default)]
    pub diagram: DiagramConfig,
    /// Node sizing and spacing handed to the layout engine.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// High-fanout net handling.
    #[serde(default)]
    pub fanout: FanoutConfig,
    /// Extra port-role rules, keyed by fully-qualified link type.
    #[serde(default)]
    pub directions: BTreeMap<String, DirectionSpec>,
}

/// Settings for building the block diagram.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramConfig {
    /// How many levels of hierarchy below the root are drawn.
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Whether `(bridge)` helper blocks are collapsed.
    #[serde(default = "default_true")]
    pub collapse_bridges: bool,
    /// Whether `(adapter)` helper blocks are collapsed.
    #[serde(default = "default_true")]
    pub collapse_adapters: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            collapse_bridges: true,
            collapse_adapters: true,
        }
    }
}

/// Sizes and spacing for laid-out nodes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Minimum width of a block node.
    #[serde(default = "default_min_block_width")]
    pub min_block_width: f64,
    /// Minimum height of a block node.
    #[serde(default)]
    pub min_block_height: f64,
    /// Horizontal distance between layers.
    #[serde(default = "default_layer_spacing")]
    pub layer_spacing: f64,
    /// Vertical distance between nodes in one layer.
    #[serde(default = "default_node_spacing")]
    pub node_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_block_width: default_min_block_width(),
            min_block_height: 0.0,
            layer_spacing: default_layer_spacing(),
            node_spacing: default_node_spacing(),
        }
    }
}

/// When a net is drawn as per-endpoint tunnels instead of direct edges.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FanoutConfig {
    /// Nets with more sinks than this are tunnelled.
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Link types eligible for tunnelling.
    #[serde(default = "default_fanout_link_types")]
    pub link_types: Vec<String>,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            link_types: default_fanout_link_types(),
        }
    }
}

/// The role every port of a link type plays, for `all = "..."` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    /// The port drives the net.
    Source,
    /// The port is driven by the net.
    Sink,
    /// The port's role depends on the context.
    Bidir,
}

/// Port-role rules for one link type.
///
/// Either list port names per role, or give one role for every port with `all`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectionSpec {
    /// Link port names that act as sources.
    #[serde(default)]
    pub source: Vec<String>,
    /// Link port names that act as sinks.
    #[serde(default)]
    pub sink: Vec<String>,
    /// Link port names that are bidirectional.
    #[serde(default)]
    pub bidir: Vec<String>,
    /// A single role for every port of the link.
    #[serde(default)]
    pub all: Option<RoleName>,
}

fn default_depth() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_min_block_width() -> f64 {
    200.0
}

fn default_layer_spacing() -> f64 {
    80.0
}

fn default_node_spacing() -> f64 {
    40.0
}

fn default_threshold() -> usize {
    3
}

fn default_fanout_link_types() -> Vec<String> {
    vec![DEFAULT_FANOUT_LINK_TYPE.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StrataConfig::default();
        assert_eq!(config.diagram.depth, 2);
        assert!(config.diagram.collapse_bridges);
        assert_eq!(config.layout.min_block_width, 200.0);
        assert_eq!(config.layout.min_block_height, 0.0);
        assert_eq!(config.fanout.threshold, 3);
        assert_eq!(config.fanout.link_types, vec![DEFAULT_FANOUT_LINK_TYPE]);
        assert!(config.directions.is_empty());
    }

    #[test]
    fn role_name_lowercase() {
        let spec: DirectionSpec = toml::from_str(r#"all = "bidir""#).unwrap();
        assert_eq!(spec.all, Some(RoleName::Bidir));
    }
}
