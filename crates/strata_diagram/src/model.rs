//! The Diagram Block model: per-block connectivity derived from constraints.

use crate::error::ExtractError;
use indexmap::IndexMap;
use serde::Serialize;
use strata_ir::{LibraryPath, Link};
use strata_path::Path;

/// Name prefix of bridge helper blocks.
pub const BRIDGE_PREFIX: &str = "(bridge)";
/// Name prefix of adapter helper blocks.
pub const ADAPTER_PREFIX: &str = "(adapter)";
/// Name prefix of constraint helper blocks.
pub const CONSTRAINT_PREFIX: &str = "(constr)";

/// Returns `true` for names the compiler generates for helper instances.
pub fn is_internal_name(name: &str) -> bool {
    name.starts_with(BRIDGE_PREFIX)
        || name.starts_with(ADAPTER_PREFIX)
        || name.starts_with(CONSTRAINT_PREFIX)
}

/// An elaborated link inside a diagram block, with the block ports attached
/// to each of its own ports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkNet {
    /// Path of the link instance.
    pub path: Path,
    /// The link's superclasses; the first is its type.
    pub superclasses: Vec<LibraryPath>,
    /// Link port name to the block-port paths attached to it, in order.
    pub ports: IndexMap<String, Vec<Path>>,
}

impl LinkNet {
    /// Builds an unconnected net for `link` at `path`.
    pub fn new(path: Path, link: &Link) -> Result<Self, ExtractError> {
        let mut ports = IndexMap::new();
        for name in link.ports.names() {
            if ports.insert(name.to_string(), Vec::new()).is_some() {
                return Err(ExtractError::DuplicatePortName {
                    path,
                    name: name.to_string(),
                });
            }
        }
        Ok(Self {
            path,
            superclasses: link.superclasses.clone(),
            ports,
        })
    }

    /// The link type, if the link declares one.
    pub fn link_type(&self) -> Option<&LibraryPath> {
        self.superclasses.first()
    }
}

/// A forwarding of a sub-block port to a port of the enclosing block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    /// The enclosing block's port.
    pub exterior: Path,
    /// The sub-block port it forwards.
    pub interior: Path,
}

/// A net inside a diagram block: either a real link or an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramLink {
    /// An elaborated link.
    Link(LinkNet),
    /// An exported port.
    Export(Export),
}

impl DiagramLink {
    /// Every attached block-port path, in link-port order.
    pub fn all_ports(&self) -> Vec<&Path> {
        match self {
            DiagramLink::Link(net) => net.ports.values().flatten().collect(),
            DiagramLink::Export(export) => vec![&export.exterior, &export.interior],
        }
    }

    /// The path naming this net: the link path, or an export's exterior.
    pub fn path(&self) -> &Path {
        match self {
            DiagramLink::Link(net) => &net.path,
            DiagramLink::Export(export) => &export.exterior,
        }
    }

    /// Returns `true` if `reference`, taken from a block's port list, points
    /// back at this net.
    pub fn is_referenced_by(&self, reference: &Path) -> bool {
        match self {
            DiagramLink::Link(net) => {
                !reference.links().is_empty()
                    && reference.link_component(false).as_ref() == Ok(&net.path)
            }
            DiagramLink::Export(export) => reference == &export.exterior,
        }
    }
}

/// One hierarchy block instance and the nets directly inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramBlock {
    /// Path of the block instance.
    pub path: Path,
    /// The block's superclasses; the first labels it.
    pub superclasses: Vec<LibraryPath>,
    /// Port name to the far-end paths attached to it from the enclosing
    /// block: link ports, or an enclosing port for exports.
    pub ports: IndexMap<String, Vec<Path>>,
    /// Elaborated sub-blocks.
    pub subblocks: IndexMap<String, DiagramBlock>,
    /// Links and export pseudo-links, keyed by link name or by the
    /// exterior port names joined with `.`.
    pub sublinks: IndexMap<String, DiagramLink>,
}

impl DiagramBlock {
    /// Creates a block with no ports and no contents.
    pub fn empty(path: Path, superclasses: Vec<LibraryPath>) -> Self {
        Self {
            path,
            superclasses,
            ports: IndexMap::new(),
            subblocks: IndexMap::new(),
            sublinks: IndexMap::new(),
        }
    }

    /// The label class: last segment of the first superclass.
    pub fn class_name(&self) -> &str {
        self.superclasses
            .first()
            .map(LibraryPath::short_name)
            .unwrap_or("")
    }

    /// The deepest sub-block nesting below this block; 0 for a leaf.
    pub fn max_depth(&self) -> usize {
        self.subblocks
            .values()
            .map(|sub| sub.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Resolves a port path one level down to its sub-block name and port
    /// name, if it names a port directly on a sub-block of this block.
    pub(crate) fn subblock_port<'p>(&self, port: &'p Path) -> Option<(&'p str, &'p str)> {
        let depth = self.path.blocks().len();
        if port.blocks().len() != depth + 1
            || !port.blocks().starts_with(self.path.blocks())
            || !port.links().is_empty()
            || port.ports().len() != 1
            || !port.params().is_empty()
        {
            return None;
        }
        Some((port.blocks()[depth].as_str(), port.ports()[0].as_str()))
    }

    fn malformed(&self, constraint: &str, reason: impl Into<String>) -> ExtractError {
        ExtractError::MalformedConnection {
            path: self.path.clone(),
            constraint: constraint.to_string(),
            reason: reason.into(),
        }
    }

    /// Attaches a sub-block port to a sub-link port, recording the
    /// connection on both the link and the sub-block.
    ///
    /// `link_port` must name exactly one link of this block and one of its
    /// ports; `block_port` must be a single port directly on a sub-block.
    /// Nothing is recorded if either side is malformed.
    pub fn connect(
        &mut self,
        constraint: &str,
        link_port: Path,
        block_port: Path,
    ) -> Result<(), ExtractError> {
        if link_port.links().len() != 1 || link_port.blocks() != self.path.blocks() {
            return Err(self.malformed(
                constraint,
                format!("'{link_port}' does not name exactly one link of this block"),
            ));
        }
        let Some(link_port_name) = link_port.ports().first() else {
            return Err(self.malformed(constraint, format!("'{link_port}' names no link port")));
        };
        let link_name = &link_port.links()[0];
        match self.sublinks.get(link_name) {
            Some(DiagramLink::Link(net)) if net.ports.contains_key(link_port_name) => {}
            _ => {
                return Err(self.malformed(
                    constraint,
                    format!("'{link_port}' is not a port of a modelled link"),
                ))
            }
        }
        let Some((block_name, port_name)) = self.subblock_port(&block_port) else {
            return Err(self.malformed(
                constraint,
                format!("'{block_port}' is not a single port of a sub-block"),
            ));
        };
        let has_port = self
            .subblocks
            .get(block_name)
            .is_some_and(|sub| sub.ports.contains_key(port_name));
        if !has_port {
            return Err(self.malformed(
                constraint,
                format!("'{block_port}' is not a port of a modelled sub-block"),
            ));
        }

        if let Some(DiagramLink::Link(net)) = self.sublinks.get_mut(link_name) {
            if let Some(attached) = net.ports.get_mut(link_port_name) {
                attached.push(block_port.clone());
            }
        }
        if let Some(sub) = self.subblocks.get_mut(block_name) {
            if let Some(attached) = sub.ports.get_mut(port_name) {
                attached.push(link_port);
            }
        }
        Ok(())
    }

    /// Records an export of a sub-block port through one of this block's
    /// ports, as a pseudo-link named after the exterior port.
    ///
    /// A later export of the same exterior replaces the earlier one; an
    /// exterior whose name matches a real link is a duplicate.
    pub fn export(
        &mut self,
        constraint: &str,
        exterior: Path,
        interior: Path,
    ) -> Result<(), ExtractError> {
        let own_port = exterior.blocks() == self.path.blocks()
            && exterior.links().is_empty()
            && exterior
                .ports()
                .first()
                .is_some_and(|p| self.ports.contains_key(p));
        if !own_port {
            return Err(self.malformed(
                constraint,
                format!("'{exterior}' is not a port of this block"),
            ));
        }
        let Some((block_name, port_name)) = self.subblock_port(&interior) else {
            return Err(self.malformed(
                constraint,
                format!("'{interior}' is not a single port of a sub-block"),
            ));
        };
        let has_port = self
            .subblocks
            .get(block_name)
            .is_some_and(|sub| sub.ports.contains_key(port_name));
        if !has_port {
            return Err(self.malformed(
                constraint,
                format!("'{interior}' is not a port of a modelled sub-block"),
            ));
        }
        let pseudo_link = exterior.ports().join(".");
        if let Some(DiagramLink::Link(_)) = self.sublinks.get(&pseudo_link) {
            return Err(ExtractError::DuplicateLinkName {
                path: self.path.clone(),
                name: pseudo_link,
            });
        }

        let (block_name, port_name) = (block_name.to_string(), port_name.to_string());
        if let Some(attached) = self
            .subblocks
            .get_mut(&block_name)
            .and_then(|sub| sub.ports.get_mut(&port_name))
        {
            attached.push(exterior.clone());
        }
        self.sublinks.insert(
            pseudo_link,
            DiagramLink::Export(Export { exterior, interior }),
        );
        Ok(())
    }
}
