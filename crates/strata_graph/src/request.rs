//! The graph handed to a layout engine, and the map back to design paths.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strata_path::Path;

/// A port on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Unique identifier.
    pub id: String,
    /// Display label.
    pub label: String,
}

/// A node: a drawn block or a tunnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique identifier.
    pub id: String,
    /// The enclosing node, or `None` at the top level.
    pub parent: Option<String>,
    /// Display label.
    pub label: String,
    /// Minimum width.
    pub min_width: f64,
    /// Minimum height.
    pub min_height: f64,
    /// Ports in declaration order.
    pub ports: Vec<PortSpec>,
}

/// An edge between two ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Unique identifier.
    pub id: String,
    /// The node the edge is drawn inside, or `None` at the top level.
    pub parent: Option<String>,
    /// Port identifier at the tail.
    pub source: String,
    /// Port identifier at the head.
    pub target: String,
    /// Whether the edge has a direction.
    pub directed: bool,
}

/// A complete layout request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRequest {
    /// Every node, parents before children.
    pub nodes: Vec<NodeSpec>,
    /// Every edge.
    pub edges: Vec<EdgeSpec>,
}

impl GraphRequest {
    /// Looks up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Looks up an edge by identifier.
    pub fn edge(&self, id: &str) -> Option<&EdgeSpec> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}

/// What an emitted identifier stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A sub-block node.
    Block,
    /// A sub-block port.
    Port,
    /// An edge drawn for a net.
    Edge,
    /// A tunnel node drawn for a high-fanout net.
    Tunnel,
}

/// A design path with the kind of element drawn for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedElement {
    /// What was drawn.
    pub kind: ElementKind,
    /// The design path it was drawn for. Edges and tunnels map to their net.
    pub path: Path,
}

/// Maps every emitted identifier back to the design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementMap {
    entries: IndexMap<String, MappedElement>,
}

impl ElementMap {
    /// Records `id` as drawing `path`.
    pub fn insert(&mut self, id: impl Into<String>, kind: ElementKind, path: Path) {
        self.entries.insert(id.into(), MappedElement { kind, path });
    }

    /// The element recorded for `id`.
    pub fn get(&self, id: &str) -> Option<&MappedElement> {
        self.entries.get(id)
    }

    /// The design path recorded for `id`.
    pub fn path(&self, id: &str) -> Option<&Path> {
        self.entries.get(id).map(|element| &element.path)
    }

    /// The identifiers drawn for `path`, in emission order.
    pub fn ids_for(&self, path: &Path) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, element)| &element.path == path)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// All entries in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappedElement)> {
        self.entries.iter().map(|(id, element)| (id.as_str(), element))
    }

    /// Number of recorded identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identifier of the node drawn for a block.
pub fn block_id(path: &Path) -> String {
    format!("block:{path}")
}

/// Identifier of the port drawn for a block port.
pub fn port_id(path: &Path) -> String {
    format!("port:{path}")
}

/// Identifier of the `index`-th tunnel on one side of a net.
pub fn tunnel_id(link: &Path, side: &str, index: usize) -> String {
    format!("tunnel:{link}:{side}_{index}")
}

/// Identifier of a tunnel's single port.
pub fn tunnel_port_id(tunnel: &str) -> String {
    format!("{tunnel}:port")
}

/// Identifier of an edge between two endpoints of a net.
pub fn pair_edge_id(link: &Path, a: &Path, b: &Path) -> String {
    format!("edge:{link}_{a}_{b}")
}

/// Identifier of the edge from an endpoint to its tunnel.
pub fn tunnel_edge_id(link: &Path, endpoint: &Path) -> String {
    format!("edge:{link}_{endpoint}")
}
