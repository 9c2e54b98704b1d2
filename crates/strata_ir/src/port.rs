//! Port-like nodes: single ports, bundles and port arrays.

use crate::members::Members;
use crate::param::ValInit;
use crate::refs::LibraryPath;
use serde::{Deserialize, Serialize};

/// A leaf port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The port's own class.
    #[serde(default)]
    pub self_class: Option<LibraryPath>,
    /// Declared parameters.
    #[serde(default)]
    pub params: Members<ValInit>,
}

/// A port composed of named sub-ports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// The bundle's own class.
    #[serde(default)]
    pub self_class: Option<LibraryPath>,
    /// Named sub-ports.
    #[serde(default)]
    pub ports: Members<PortLike>,
    /// Declared parameters.
    #[serde(default)]
    pub params: Members<ValInit>,
}

/// An array of ports.
///
/// `ports` is `None` until the elaborator has fixed the array's elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortArray {
    /// The element class.
    #[serde(default)]
    pub self_class: Option<LibraryPath>,
    /// The elaborated elements, if any.
    #[serde(default)]
    pub ports: Option<Members<PortLike>>,
}

/// Any node that can appear in a ports collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortLike {
    /// A leaf port.
    Port(Port),
    /// A bundle of sub-ports.
    Bundle(Bundle),
    /// An array of ports.
    Array(PortArray),
    /// An unresolved reference to a library port class.
    #[serde(rename = "lib")]
    LibraryRef(LibraryPath),
}

impl PortLike {
    /// Creates a leaf port of the given class.
    pub fn port(class: &str) -> Self {
        PortLike::Port(Port {
            self_class: Some(LibraryPath::new(class)),
            params: Members::new(),
        })
    }
}
