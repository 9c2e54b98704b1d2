//! Link-like nodes: nets that join block ports.

use crate::constraint::Constraint;
use crate::members::Members;
use crate::param::ValInit;
use crate::port::PortLike;
use crate::refs::LibraryPath;
use serde::{Deserialize, Serialize};

/// An elaborated link instance.
///
/// The first superclass is the link's type, which keys port-role inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The link's own class.
    #[serde(default)]
    pub self_class: Option<LibraryPath>,
    /// Superclasses, most specific first.
    #[serde(default)]
    pub superclasses: Vec<LibraryPath>,
    /// The link's ports, one per role (e.g. `source`, `sinks`).
    #[serde(default)]
    pub ports: Members<PortLike>,
    /// Declared parameters.
    #[serde(default)]
    pub params: Members<ValInit>,
    /// Nested links.
    #[serde(default)]
    pub links: Members<LinkLike>,
    /// Internal constraints.
    #[serde(default)]
    pub constraints: Members<Constraint>,
}

impl Link {
    /// Creates an empty link whose type is `link_type`.
    pub fn new(link_type: &str) -> Self {
        Self {
            superclasses: vec![LibraryPath::new(link_type)],
            ..Self::default()
        }
    }

    /// Adds a port and returns `self`.
    pub fn with_port(mut self, name: &str, port: PortLike) -> Self {
        self.ports.push(name, port);
        self
    }

    /// Adds a nested link and returns `self`.
    pub fn with_link(mut self, name: &str, link: LinkLike) -> Self {
        self.links.push(name, link);
        self
    }

    /// Returns the link type: the first superclass, if any.
    pub fn link_type(&self) -> Option<&LibraryPath> {
        self.superclasses.first()
    }
}

/// An array of links, produced when connecting arrays of ports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkArray {
    /// The element class.
    #[serde(default)]
    pub self_class: Option<LibraryPath>,
    /// Array-level ports.
    #[serde(default)]
    pub ports: Members<PortLike>,
    /// Declared parameters.
    #[serde(default)]
    pub params: Members<ValInit>,
    /// The element links.
    #[serde(default)]
    pub links: Members<LinkLike>,
    /// Internal constraints.
    #[serde(default)]
    pub constraints: Members<Constraint>,
}

/// Any node that can appear in a links collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkLike {
    /// An elaborated link.
    Link(Link),
    /// An array of links.
    Array(LinkArray),
    /// An unresolved reference to a library link class.
    #[serde(rename = "lib")]
    LibraryRef(LibraryPath),
}
