//! Error types for design traversal.

use crate::context::NodeKind;
use strata_path::Path;

/// The error type transform callbacks may return.
pub type VisitError = Box<dyn std::error::Error + Send + Sync>;

/// The return type of every transform callback.
pub type VisitResult = Result<(), VisitError>;

/// Errors that abort a traversal.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A library reference, or an array whose elements were never fixed,
    /// was reached after its `visit_*like` callback left it unresolved.
    #[error("unresolved {kind} at {path}")]
    UnelaboratedReference {
        /// Where the reference sits.
        path: Path,
        /// What kind of node it stands for.
        kind: NodeKind,
    },

    /// A callback failed.
    #[error("(while visiting {kind} at {path}) {source}")]
    Visit {
        /// The node being visited.
        path: Path,
        /// Which callback failed.
        kind: NodeKind,
        /// The callback's error.
        source: VisitError,
    },
}

impl TransformError {
    /// Returns the path the error occurred at.
    pub fn path(&self) -> &Path {
        match self {
            TransformError::UnelaboratedReference { path, .. }
            | TransformError::Visit { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_visit() {
        let err = TransformError::Visit {
            path: Path::empty().append_block(["mcu"]),
            kind: NodeKind::Block,
            source: "bad block".into(),
        };
        assert_eq!(format!("{err}"), "(while visiting Block at mcu) bad block");
    }

    #[test]
    fn display_unelaborated() {
        let err = TransformError::UnelaboratedReference {
            path: Path::empty().append_block(["x"]),
            kind: NodeKind::BlockLike,
        };
        assert_eq!(format!("{err}"), "unresolved BlockLike at x");
        assert_eq!(err.path().to_string(), "x");
    }
}
