//! Direction inference, edge emission and layout for Strata diagrams.
//!
//! A simplified [`DiagramBlock`](strata_diagram::DiagramBlock) is walked level
//! by level. Each net's endpoints are split into sources and sinks using a
//! [`DirectionTable`] and the roles already resolved one level up; the
//! [`EdgeEmitter`] then produces a [`GraphRequest`] of nodes, ports and
//! edges (or tunnels for high-fanout nets) plus an [`ElementMap`] back to
//! design paths. A [`LayoutSession`] hands the request to a
//! [`LayoutEngine`]; [`LayeredEngine`] is the built-in one. [`load`] runs
//! the whole pipeline.

#![warn(missing_docs)]

pub mod direction;
pub mod emit;
pub mod errors;
pub mod layered;
pub mod layout;
pub mod load;
pub mod request;

pub use direction::{DirectionTable, NetRoles, PortRole, ResolvedRole, RoleResolver};
pub use emit::{EdgeEmitter, EmitOptions, Emission};
pub use layered::LayeredEngine;
pub use layout::{
    EdgeGeometry, LayoutEngine, LayoutError, LayoutResponse, LayoutSession, NodeGeometry, Point,
};
pub use load::{load, BuildError, LoadedDiagram};
pub use request::{
    EdgeSpec, ElementKind, ElementMap, GraphRequest, MappedElement, NodeSpec, PortSpec,
};
