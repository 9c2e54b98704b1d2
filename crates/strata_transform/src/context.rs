//! Traversal location handed to transform callbacks.

use serde::Serialize;
use std::fmt;
use strata_ir::Design;
use strata_path::Path;

/// The kind of node a callback or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// A hierarchy block.
    Block,
    /// A link.
    Link,
    /// A link array.
    LinkArray,
    /// A leaf port.
    Port,
    /// A bundle.
    Bundle,
    /// A port array.
    PortArray,
    /// A block-like wrapper.
    BlockLike,
    /// A port-like wrapper.
    PortLike,
    /// A link-like wrapper.
    LinkLike,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Block => "Block",
            NodeKind::Link => "Link",
            NodeKind::LinkArray => "LinkArray",
            NodeKind::Port => "Port",
            NodeKind::Bundle => "Bundle",
            NodeKind::PortArray => "PortArray",
            NodeKind::BlockLike => "BlockLike",
            NodeKind::PortLike => "PortLike",
            NodeKind::LinkLike => "LinkLike",
        };
        f.write_str(name)
    }
}

/// Where a traversal currently is: a path plus the design the traversal
/// was started on.
///
/// `design` is the caller's unmodified input, so callbacks can look up
/// siblings or run sub-traversals without observing in-flight rewrites.
#[derive(Debug, Clone)]
pub struct TransformContext<'a> {
    /// The path of the node being visited.
    pub path: Path,
    /// The design the traversal started from.
    pub design: &'a Design,
}

impl<'a> TransformContext<'a> {
    /// Creates a context at the design root.
    pub fn root(design: &'a Design) -> Self {
        Self {
            path: Path::empty(),
            design,
        }
    }

    /// Returns a context one block deeper.
    pub fn append_block(&self, name: &str) -> Self {
        Self {
            path: self.path.append_block([name]),
            design: self.design,
        }
    }

    /// Returns a context one link deeper.
    pub fn append_link(&self, name: &str) -> Self {
        Self {
            path: self.path.append_link([name]),
            design: self.design,
        }
    }

    /// Returns a context one port deeper.
    pub fn append_port(&self, name: &str) -> Self {
        Self {
            path: self.path.append_port([name]),
            design: self.design,
        }
    }
}

impl fmt::Display for TransformContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_moves_path() {
        let design = Design::default();
        let ctx = TransformContext::root(&design).append_block("mcu").append_port("vdd");
        assert_eq!(ctx.path.to_string(), "mcu.vdd");
        assert_eq!(ctx.to_string(), "mcu.vdd");
    }

    #[test]
    fn kind_display() {
        assert_eq!(NodeKind::LinkArray.to_string(), "LinkArray");
        assert_eq!(NodeKind::PortLike.to_string(), "PortLike");
    }
}
