//! Constraint statements attached to blocks and links.

use crate::refs::LocalPath;
use serde::{Deserialize, Serialize};

/// A constraint declared inside a block or link.
///
/// Only connectivity constraints have structure here; everything else is an
/// opaque expression owned by the constraint solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// A sub-block port attached to a sub-link port.
    Connected {
        /// The link-side reference, e.g. `[net, sinks]`.
        link_port: LocalPath,
        /// The block-side reference, e.g. `[mcu, gpio]`.
        block_port: LocalPath,
    },
    /// A sub-block port forwarded to one of the enclosing block's ports.
    Exported {
        /// The enclosing block's port.
        exterior_port: LocalPath,
        /// The sub-block port it forwards.
        internal_block_port: LocalPath,
    },
    /// Any other constraint.
    Expr {
        /// The expression text.
        text: String,
    },
}

impl Constraint {
    /// Creates a `connected` constraint from name steps.
    pub fn connected(link_port: &[&str], block_port: &[&str]) -> Self {
        Constraint::Connected {
            link_port: LocalPath::from_names(link_port.iter().copied()),
            block_port: LocalPath::from_names(block_port.iter().copied()),
        }
    }

    /// Creates an `exported` constraint from name steps.
    pub fn exported(exterior_port: &[&str], internal_block_port: &[&str]) -> Self {
        Constraint::Exported {
            exterior_port: LocalPath::from_names(exterior_port.iter().copied()),
            internal_block_port: LocalPath::from_names(internal_block_port.iter().copied()),
        }
    }
}
