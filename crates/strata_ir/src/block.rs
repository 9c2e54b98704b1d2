//! Hierarchy blocks: the containers of the design tree.

use crate::constraint::Constraint;
use crate::link::LinkLike;
use crate::members::Members;
use crate::param::ValInit;
use crate::port::PortLike;
use crate::refs::LibraryPath;
use serde::{Deserialize, Serialize};

/// An elaborated block instance with its interface and contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyBlock {
    /// The block's own class.
    #[serde(default)]
    pub self_class: Option<LibraryPath>,
    /// Superclasses, most specific first. The first one labels the block.
    #[serde(default)]
    pub superclasses: Vec<LibraryPath>,
    /// The block's ports.
    #[serde(default)]
    pub ports: Members<PortLike>,
    /// Declared parameters.
    #[serde(default)]
    pub params: Members<ValInit>,
    /// Internal links (nets).
    #[serde(default)]
    pub links: Members<LinkLike>,
    /// Sub-block instances.
    #[serde(default)]
    pub blocks: Members<BlockLike>,
    /// Named constraints, including connectivity.
    #[serde(default)]
    pub constraints: Members<Constraint>,
}

impl HierarchyBlock {
    /// Creates an empty block whose class is `class`.
    pub fn new(class: &str) -> Self {
        Self {
            superclasses: vec![LibraryPath::new(class)],
            ..Self::default()
        }
    }

    /// Adds a port and returns `self`.
    pub fn with_port(mut self, name: &str, port: PortLike) -> Self {
        self.ports.push(name, port);
        self
    }

    /// Adds a link and returns `self`.
    pub fn with_link(mut self, name: &str, link: LinkLike) -> Self {
        self.links.push(name, link);
        self
    }

    /// Adds a sub-block and returns `self`.
    pub fn with_block(mut self, name: &str, block: BlockLike) -> Self {
        self.blocks.push(name, block);
        self
    }

    /// Adds a constraint and returns `self`.
    pub fn with_constraint(mut self, name: &str, constraint: Constraint) -> Self {
        self.constraints.push(name, constraint);
        self
    }
}

/// Any node that can appear in a blocks collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockLike {
    /// An elaborated hierarchy block.
    Hierarchy(HierarchyBlock),
    /// An unresolved reference to a library block class.
    #[serde(rename = "lib")]
    LibraryRef(LibraryPath),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;

    #[test]
    fn builder_keeps_order() {
        let block = HierarchyBlock::new("lib.Top")
            .with_port("vin", PortLike::port("lib.VoltageSink"))
            .with_link("net", LinkLike::Link(Link::new("lib.Net")))
            .with_block("a", BlockLike::Hierarchy(HierarchyBlock::new("lib.A")))
            .with_block("b", BlockLike::LibraryRef(LibraryPath::new("lib.B")))
            .with_constraint("c0", Constraint::connected(&["net", "x"], &["a", "y"]));
        assert_eq!(block.blocks.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(block.constraints.len(), 1);
        assert_eq!(block.superclasses[0].short_name(), "Top");
    }

    #[test]
    fn missing_collections_default_empty() {
        let block: HierarchyBlock = serde_json::from_str("{}").unwrap();
        assert!(block.ports.is_empty());
        assert!(block.blocks.is_empty());
        assert!(block.superclasses.is_empty());
    }
}
