//! Error types for path construction and path following.

use crate::path::{Path, Stage};

/// Errors from building a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A name was appended to a stage that is already closed.
    #[error("cannot append a {attempted} name to '{path}', which is already in the {open} stage")]
    StageViolation {
        /// The path being extended.
        path: Path,
        /// The stage open on `path`.
        open: Stage,
        /// The stage the append targeted.
        attempted: Stage,
    },

    /// A link component was required but the path names no link.
    #[error("'{path}' has no link component")]
    MissingLink {
        /// The offending path.
        path: Path,
    },
}

/// Errors from following a local reference through the design tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FollowError {
    /// A name step could not be resolved against the node reached so far.
    #[error("cannot resolve '{step}' at {at} (following {reference} from {from})")]
    UnresolvedStep {
        /// Where the walk started.
        from: Path,
        /// The reference being followed.
        reference: String,
        /// The deepest path reached.
        at: Path,
        /// The step that failed.
        step: String,
    },

    /// Steps remain after reaching a node that takes no further steps.
    #[error("unused steps '{remaining}' after {at} (following {reference} from {from})")]
    TrailingSteps {
        /// Where the walk started.
        from: Path,
        /// The reference being followed.
        reference: String,
        /// The deepest path reached.
        at: Path,
        /// The unconsumed steps, dot-joined.
        remaining: String,
    },
}

impl FollowError {
    /// Returns the deepest path reached before the failure.
    pub fn at(&self) -> &Path {
        match self {
            FollowError::UnresolvedStep { at, .. } | FollowError::TrailingSteps { at, .. } => at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_stage_violation() {
        let err = PathError::StageViolation {
            path: Path::empty().append_link(["net"]),
            open: Stage::Links,
            attempted: Stage::Blocks,
        };
        assert_eq!(
            format!("{err}"),
            "cannot append a block name to 'net', which is already in the link stage"
        );
    }

    #[test]
    fn display_missing_link() {
        let err = PathError::MissingLink {
            path: Path::empty(),
        };
        assert_eq!(format!("{err}"), "'(root)' has no link component");
    }

    #[test]
    fn display_unresolved_step() {
        let err = FollowError::UnresolvedStep {
            from: Path::empty(),
            reference: "mcu.nope".to_string(),
            at: Path::empty().append_block(["mcu"]),
            step: "nope".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "cannot resolve 'nope' at mcu (following mcu.nope from (root))"
        );
        assert_eq!(err.at(), &Path::empty().append_block(["mcu"]));
    }
}
