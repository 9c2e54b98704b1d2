//! How serious a diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pass either carried on past the problem or could not build a result.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The input was drawn with a fallback (bidirectional port, dropped edge).
    Warning,
    /// The design could not be turned into a diagram model.
    Error,
}

impl Severity {
    /// Whether a diagnostic of this severity fails the run.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }

    /// The letter diagnostic codes of this severity start with.
    pub fn code_prefix(self) -> char {
        match self {
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}
