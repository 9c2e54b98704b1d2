//! The top-level design and its JSON loader.

use crate::block::HierarchyBlock;
use crate::error::IrError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An elaborated design: the root hierarchy block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// The top-level block.
    pub contents: HierarchyBlock,
}

impl Design {
    /// Wraps a top-level block into a design.
    pub fn new(contents: HierarchyBlock) -> Self {
        Self { contents }
    }
}

/// Loads a design from a JSON file.
pub fn load_design(path: &Path) -> Result<Design, IrError> {
    let content = std::fs::read_to_string(path)?;
    design_from_str(&content)
}

/// Parses a design from JSON text.
pub fn design_from_str(content: &str) -> Result<Design, IrError> {
    serde_json::from_str(content).map_err(|e| IrError::ParseError(e.to_string()))
}
