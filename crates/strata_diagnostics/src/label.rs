//! Labels that point at related design elements within a diagnostic.

use serde::{Deserialize, Serialize};
use strata_path::Path;

/// The role of a diagnostic label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// The element the diagnostic is about.
    Primary,
    /// A related element giving context.
    Secondary,
}

/// A design element referenced by a diagnostic, with a short explanation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// The element this label points at.
    pub path: Path,
    /// The message shown next to the path.
    pub message: String,
    /// Whether this is a primary or secondary label.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}
