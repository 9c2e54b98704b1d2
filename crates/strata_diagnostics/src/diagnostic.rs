//! Structured diagnostic messages with severity, codes and labels.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use strata_path::Path;

/// A structured diagnostic message located in the design hierarchy.
///
/// Each diagnostic carries a severity, a code, a message and optionally the
/// [`Path`] of the element it concerns, plus secondary labels, notes and help.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The element the diagnostic concerns, if any.
    pub location: Option<Path>,
    /// Related elements.
    pub labels: Vec<Label>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
    /// Actionable suggestions.
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a diagnostic whose severity is the one `code` carries.
    pub fn new(
        code: DiagnosticCode,
        message: impl Into<String>,
        location: impl Into<Option<Path>>,
    ) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            location: location.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Adds a label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_comes_from_code() {
        let diag = Diagnostic::new(
            DiagnosticCode::warning(401),
            "unknown link type",
            Path::empty().append_link(["n"]),
        );
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.location.map(|p| p.to_string()).as_deref(), Some("n"));

        let diag = Diagnostic::new(DiagnosticCode::error(401), "malformed design", None);
        assert!(diag.severity.is_error());
        assert!(diag.location.is_none());
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::new(DiagnosticCode::warning(403), "self loop", Path::empty())
            .with_label(Label::secondary(Path::empty().append_block(["a"]), "both ends"))
            .with_note("edges between ports of one block are not drawn")
            .with_help("check the connect statements of this net");
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn json_shape() {
        let diag = Diagnostic::new(
            DiagnosticCode::warning(405),
            "empty net",
            Path::empty().append_link(["n"]),
        );
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["severity"], "warning");
        assert_eq!(value["code"], "W405");
        let back: Diagnostic = serde_json::from_value(value).unwrap();
        assert_eq!(back.code, diag.code);
        assert_eq!(back.location, diag.location);
    }
}
