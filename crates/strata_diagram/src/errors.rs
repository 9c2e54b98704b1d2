//! Diagnostic codes for building the diagram model.
//!
//! `E401` and `E402` stand in for a model that could not be built, so a
//! checker can report them alongside the warnings.

use strata_diagnostics::{Diagnostic, DiagnosticCode};
use strata_path::Path;

use crate::error::{ExtractError, SimplifyError};

/// A design whose connections or names do not form a diagram model.
pub const E401: DiagnosticCode = DiagnosticCode::error(401);

/// A helper block that is not shaped the way the compiler generates them.
pub const E402: DiagnosticCode = DiagnosticCode::error(402);

/// An adapter whose surroundings do not allow it to be collapsed.
pub const W402: DiagnosticCode = DiagnosticCode::warning(402);

/// Creates a W402 warning for the adapter at `adapter`.
pub fn warn_adapter_not_collapsible(adapter: &Path, src: &Path, dst: &Path) -> Diagnostic {
    Diagnostic::new(W402, "unable to collapse adapter", adapter.clone())
        .with_note(format!("src is attached to '{src}', dst is attached to '{dst}'"))
        .with_help("an adapter collapses only when one side is a two-ended link")
}

/// Reports an extraction failure as an E401 error at the offending element.
pub fn error_malformed_design(err: &ExtractError) -> Diagnostic {
    Diagnostic::new(E401, err.to_string(), err.path().clone())
}

/// Reports a simplification failure as an E402 error at the helper block.
pub fn error_malformed_helper(err: &SimplifyError) -> Diagnostic {
    Diagnostic::new(E402, err.to_string(), err.path().clone())
        .with_help("rerun with simplification disabled to draw the helper as a block")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_warning() {
        let adapter = Path::empty().append_block(["(adapter)a"]);
        let diag = warn_adapter_not_collapsible(
            &adapter,
            &Path::empty().append_link(["x"]).append_port(["a"]),
            &Path::empty().append_port(["out"]),
        );
        assert_eq!(diag.code, W402);
        assert_eq!(diag.location, Some(adapter));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn failures_become_errors() {
        let helper = Path::empty().append_block(["(adapter)a"]);
        let diag = error_malformed_helper(&SimplifyError::MalformedHelper {
            path: helper.clone(),
            reason: "an adapter has exactly two ports".into(),
        });
        assert_eq!(diag.code, E402);
        assert!(diag.severity.is_error());
        assert_eq!(diag.location, Some(helper));

        let block = Path::empty().append_block(["u1"]);
        let diag = error_malformed_design(&ExtractError::DuplicatePortName {
            path: block.clone(),
            name: "a".into(),
        });
        assert_eq!(diag.code, E401);
        assert_eq!(diag.location, Some(block));
    }
}
