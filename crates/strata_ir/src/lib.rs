//! The elaborated design tree consumed by the Strata mid-end.
//!
//! This crate defines the closed set of node kinds ([`HierarchyBlock`], [`Link`],
//! [`LinkArray`], [`Port`], [`Bundle`], [`PortArray`] and their `*Like` wrappers),
//! the constraint statements that describe connectivity, and a JSON loader for
//! designs produced by the elaborator.

#![warn(missing_docs)]

pub mod block;
pub mod constraint;
pub mod design;
pub mod error;
pub mod link;
pub mod members;
pub mod param;
pub mod port;
pub mod refs;

pub use block::{BlockLike, HierarchyBlock};
pub use constraint::Constraint;
pub use design::{design_from_str, load_design, Design};
pub use error::IrError;
pub use link::{Link, LinkArray, LinkLike};
pub use members::Members;
pub use param::ValInit;
pub use port::{Bundle, Port, PortArray, PortLike};
pub use refs::{LibraryPath, LocalPath, LocalStep, ReservedParam};
