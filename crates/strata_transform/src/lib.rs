//! Preorder visit-and-copy traversal over Strata designs.
//!
//! A [`Transform`] overrides the `visit_*` callbacks it cares about; the
//! engine copies the design once, walks the copy (ports, then links, then
//! sub-blocks) and hands each callback a mutable node plus a
//! [`TransformContext`] saying where it is. [`DesignIndex`] is a read-only
//! transform that lists every element of a design.

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod index;
pub mod traverse;

pub use context::{NodeKind, TransformContext};
pub use error::{TransformError, VisitError, VisitResult};
pub use index::DesignIndex;
pub use traverse::Transform;
