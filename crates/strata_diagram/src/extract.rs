//! Building diagram blocks from elaborated hierarchy blocks.

use crate::error::ExtractError;
use crate::model::{DiagramBlock, DiagramLink, LinkNet};
use log::{debug, trace};
use std::collections::HashSet;
use strata_ir::{BlockLike, Constraint, Design, HierarchyBlock, LinkLike};
use strata_path::{Element, Path};

impl DiagramBlock {
    /// Builds the diagram for the whole design, rooted at the empty path.
    pub fn from_design(design: &Design) -> Result<Self, ExtractError> {
        Self::extract(Path::empty(), &design.contents)
    }

    /// Builds the diagram block for `block`, which sits at `path`.
    ///
    /// Ports start unconnected. Each elaborated link becomes a net and each
    /// elaborated sub-block is extracted recursively; link arrays and library
    /// references are not modelled. Constraints are then applied in
    /// declaration order: `connected` attaches a sub-block port to a link
    /// port and `exported` records a pseudo-link to an own port. Any other
    /// constraint is ignored.
    pub fn extract(path: Path, block: &HierarchyBlock) -> Result<Self, ExtractError> {
        trace!("extracting {path}");
        let mut diagram = DiagramBlock::empty(path.clone(), block.superclasses.clone());

        for name in block.ports.names() {
            if diagram.ports.insert(name.to_string(), Vec::new()).is_some() {
                return Err(ExtractError::DuplicatePortName {
                    path,
                    name: name.to_string(),
                });
            }
        }

        let mut link_names = HashSet::new();
        for (name, link) in block.links.iter() {
            if !link_names.insert(name) {
                return Err(ExtractError::DuplicateLinkName {
                    path,
                    name: name.to_string(),
                });
            }
            match link {
                LinkLike::Link(link) => {
                    let net = LinkNet::new(path.append_link([name]), link)?;
                    diagram.sublinks.insert(name.to_string(), DiagramLink::Link(net));
                }
                LinkLike::Array(_) | LinkLike::LibraryRef(_) => {
                    debug!("link {name} in {path} is not modelled");
                }
            }
        }

        let mut block_names = HashSet::new();
        for (name, sub) in block.blocks.iter() {
            if !block_names.insert(name) {
                return Err(ExtractError::DuplicateBlockName {
                    path,
                    name: name.to_string(),
                });
            }
            if let BlockLike::Hierarchy(sub) = sub {
                let child = DiagramBlock::extract(path.append_block([name]), sub)?;
                diagram.subblocks.insert(name.to_string(), child);
            }
        }

        let start = Element::Block(block);
        for (name, constraint) in block.constraints.iter() {
            match constraint {
                Constraint::Connected {
                    link_port,
                    block_port,
                } => {
                    let (link_port, _) = path.follow(link_port, start)?;
                    let (block_port, _) = path.follow(block_port, start)?;
                    diagram.connect(name, link_port, block_port)?;
                }
                Constraint::Exported {
                    exterior_port,
                    internal_block_port,
                } => {
                    let (exterior, _) = path.follow(exterior_port, start)?;
                    let (interior, _) = path.follow(internal_block_port, start)?;
                    diagram.export(name, exterior, interior)?;
                }
                Constraint::Expr { .. } => {}
            }
        }
        Ok(diagram)
    }
}
