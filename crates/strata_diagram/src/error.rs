//! Fatal errors raised while building or simplifying a diagram.

use strata_path::{FollowError, Path};
use thiserror::Error;

/// An input that cannot be turned into a diagram block.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A constraint whose endpoints do not have the expected shape.
    #[error("malformed connection '{constraint}' in {path}: {reason}")]
    MalformedConnection {
        /// The block holding the constraint.
        path: Path,
        /// The constraint name.
        constraint: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Two ports of one block or link share a name.
    #[error("duplicate port name '{name}' in {path}")]
    DuplicatePortName {
        /// The block or link declaring the ports.
        path: Path,
        /// The repeated name.
        name: String,
    },
    /// Two links (or a link and an export) of one block share a name.
    #[error("duplicate link name '{name}' in {path}")]
    DuplicateLinkName {
        /// The block declaring the links.
        path: Path,
        /// The repeated name.
        name: String,
    },
    /// Two sub-blocks of one block share a name.
    #[error("duplicate block name '{name}' in {path}")]
    DuplicateBlockName {
        /// The block declaring the sub-blocks.
        path: Path,
        /// The repeated name.
        name: String,
    },
    /// A constraint endpoint that does not resolve.
    #[error(transparent)]
    Follow(#[from] FollowError),
}

impl ExtractError {
    /// The design location the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ExtractError::MalformedConnection { path, .. }
            | ExtractError::DuplicatePortName { path, .. }
            | ExtractError::DuplicateLinkName { path, .. }
            | ExtractError::DuplicateBlockName { path, .. } => path,
            ExtractError::Follow(err) => err.at(),
        }
    }
}

/// A helper block that does not look like the compiler generated it.
#[derive(Debug, Error)]
pub enum SimplifyError {
    /// A bridge or adapter with the wrong ports or connections.
    #[error("malformed helper block {path}: {reason}")]
    MalformedHelper {
        /// The helper block.
        path: Path,
        /// What was wrong with it.
        reason: String,
    },
}

impl SimplifyError {
    /// The helper block the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            SimplifyError::MalformedHelper { path, .. } => path,
        }
    }
}
