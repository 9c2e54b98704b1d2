//! References inside the design tree: library class names and local
//! reference paths used by constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully-qualified library class name, e.g.
/// `electronics_model.ElectricalPorts.ElectricalLink`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryPath(pub String);

impl LibraryPath {
    /// Creates a library path from its dotted name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the full dotted name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the last dotted segment (the bare class name).
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for LibraryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Built-in parameters every port or block exposes without declaring them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedParam {
    /// The link a port is connected to.
    ConnectedLink,
    /// Whether a port is connected at all.
    IsConnected,
    /// The element count of an array.
    Length,
    /// The instance name.
    Name,
    /// Allocation of a fresh array element.
    Allocate,
}

impl fmt::Display for ReservedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservedParam::ConnectedLink => write!(f, "(link)"),
            ReservedParam::IsConnected => write!(f, "(is_connected)"),
            ReservedParam::Length => write!(f, "(length)"),
            ReservedParam::Name => write!(f, "(name)"),
            ReservedParam::Allocate => write!(f, "(allocate)"),
        }
    }
}

/// One step of a [`LocalPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalStep {
    /// A named member of the current node.
    Name(String),
    /// A reserved parameter of the current node.
    Reserved {
        /// The reserved parameter.
        reserved: ReservedParam,
    },
}

impl fmt::Display for LocalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalStep::Name(name) => f.write_str(name),
            LocalStep::Reserved { reserved } => write!(f, "{reserved}"),
        }
    }
}

/// A reference relative to the node that contains it: an ordered list of
/// steps, resolved one member at a time.
///
/// Serializes as a JSON array of strings (names) and `{"reserved": ...}`
/// objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalPath {
    /// The steps, outermost first.
    pub steps: Vec<LocalStep>,
}

impl LocalPath {
    /// Creates a local path from explicit steps.
    pub fn new(steps: Vec<LocalStep>) -> Self {
        Self { steps }
    }

    /// Creates a local path made only of name steps.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: names
                .into_iter()
                .map(|n| LocalStep::Name(n.into()))
                .collect(),
        }
    }

    /// Returns a copy with a reserved-parameter step appended.
    pub fn with_reserved(mut self, reserved: ReservedParam) -> Self {
        self.steps.push(LocalStep::Reserved { reserved });
        self
    }

    /// Returns `true` if there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for LocalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name() {
        let lib = LibraryPath::new("electronics_model.ElectricalPorts.ElectricalLink");
        assert_eq!(lib.short_name(), "ElectricalLink");
        assert_eq!(LibraryPath::new("Plain").short_name(), "Plain");
    }

    #[test]
    fn local_path_json() {
        let path: LocalPath =
            serde_json::from_str(r#"["mcu", "gpio", {"reserved": "connected_link"}]"#).unwrap();
        assert_eq!(path.steps.len(), 3);
        assert_eq!(path.steps[0], LocalStep::Name("mcu".to_string()));
        assert_eq!(
            path.steps[2],
            LocalStep::Reserved {
                reserved: ReservedParam::ConnectedLink
            }
        );
        assert_eq!(path.to_string(), "mcu.gpio.(link)");
    }

    #[test]
    fn from_names_roundtrip() {
        let path = LocalPath::from_names(["a", "b"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: LocalPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
