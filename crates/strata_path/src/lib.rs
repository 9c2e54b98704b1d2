//! Hierarchical path addressing for Strata designs.
//!
//! A [`Path`] is a pure value naming an element of the design tree by its
//! block, link, port and param names. This crate provides the path algebra
//! (appending, truncation, prefix tests) and [`Path::follow`], which resolves
//! a constraint's local reference against the tree.

#![warn(missing_docs)]

pub mod error;
pub mod follow;
pub mod path;

pub use error::{FollowError, PathError};
pub use follow::{resolve_blocklike, resolve_linklike, resolve_portlike, Element, PartialFollow};
pub use path::{Path, Stage};
