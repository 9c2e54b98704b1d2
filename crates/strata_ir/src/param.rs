//! Parameter declarations.

use serde::{Deserialize, Serialize};

/// The declared type of a parameter.
///
/// Only the type is carried; parameter values are solved by the constraint
/// engine and never appear in the design tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValInit {
    /// A boolean parameter.
    Boolean,
    /// An integer parameter.
    Integer,
    /// A floating-point parameter.
    Floating,
    /// A text parameter.
    Text,
    /// A numeric range parameter.
    Range,
    /// An array-valued parameter.
    Array,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&ValInit::Range).unwrap(), r#""range""#);
        let back: ValInit = serde_json::from_str(r#""floating""#).unwrap();
        assert_eq!(back, ValInit::Floating);
    }
}
