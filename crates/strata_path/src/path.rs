//! Structural addresses into the design hierarchy.
//!
//! A [`Path`] names an element by four ordered name sequences filled in stage
//! order: blocks, then links, then ports, then params. Once a later stage
//! holds a name, earlier stages are closed.

use crate::error::PathError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use strata_ir::{LocalPath, LocalStep};

/// The stage of a [`Path`] that is currently open for appending.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    /// Only block names so far.
    #[default]
    Blocks,
    /// Link names have been appended.
    Links,
    /// Port names have been appended.
    Ports,
    /// Param names have been appended.
    Params,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Blocks => write!(f, "block"),
            Stage::Links => write!(f, "link"),
            Stage::Ports => write!(f, "port"),
            Stage::Params => write!(f, "param"),
        }
    }
}

/// An immutable address of an element in the design tree.
///
/// Equality and hashing consider only the four name sequences. The root
/// displays as `(root)`, anything else as its names joined by `.`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawPath", into = "RawPath")]
pub struct Path {
    blocks: Vec<String>,
    links: Vec<String>,
    ports: Vec<String>,
    params: Vec<String>,
    stage: Stage,
}

/// Serialized shape of a [`Path`].
#[derive(Clone, Serialize, Deserialize)]
struct RawPath {
    #[serde(default)]
    blocks: Vec<String>,
    #[serde(default)]
    links: Vec<String>,
    #[serde(default)]
    ports: Vec<String>,
    #[serde(default)]
    params: Vec<String>,
}

impl From<RawPath> for Path {
    fn from(raw: RawPath) -> Self {
        let stage = if !raw.params.is_empty() {
            Stage::Params
        } else if !raw.ports.is_empty() {
            Stage::Ports
        } else if !raw.links.is_empty() {
            Stage::Links
        } else {
            Stage::Blocks
        };
        Path {
            blocks: raw.blocks,
            links: raw.links,
            ports: raw.ports,
            params: raw.params,
            stage,
        }
    }
}

impl From<Path> for RawPath {
    fn from(path: Path) -> Self {
        RawPath {
            blocks: path.blocks,
            links: path.links,
            ports: path.ports,
            params: path.params,
        }
    }
}

impl Path {
    /// Returns the root path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Block names, outermost first.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Link names, outermost first.
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Port names, outermost first.
    pub fn ports(&self) -> &[String] {
        &self.ports
    }

    /// Param names.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Returns the stage currently open for appending.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns `true` for the design root.
    pub fn is_root(&self) -> bool {
        self.blocks.is_empty()
            && self.links.is_empty()
            && self.ports.is_empty()
            && self.params.is_empty()
    }

    /// Iterates over all names in stage order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .chain(&self.links)
            .chain(&self.ports)
            .chain(&self.params)
            .map(String::as_str)
    }

    fn try_append<I, S>(&self, stage: Stage, names: I) -> Result<Path, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.stage > stage {
            return Err(PathError::StageViolation {
                path: self.clone(),
                open: self.stage,
                attempted: stage,
            });
        }
        let mut next = self.clone();
        let target = match stage {
            Stage::Blocks => &mut next.blocks,
            Stage::Links => &mut next.links,
            Stage::Ports => &mut next.ports,
            Stage::Params => &mut next.params,
        };
        let before = target.len();
        target.extend(names.into_iter().map(Into::into));
        if target.len() > before {
            next.stage = stage;
        }
        Ok(next)
    }

    /// Appends block names, failing if a later stage is already open.
    pub fn try_append_block<I, S>(&self, names: I) -> Result<Path, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.try_append(Stage::Blocks, names)
    }

    /// Appends link names, failing if ports or params are already present.
    pub fn try_append_link<I, S>(&self, names: I) -> Result<Path, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.try_append(Stage::Links, names)
    }

    /// Appends port names, failing if params are already present.
    pub fn try_append_port<I, S>(&self, names: I) -> Result<Path, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.try_append(Stage::Ports, names)
    }

    /// Appends a param name. Params are the last stage, so this never fails.
    pub fn try_append_param(&self, name: impl Into<String>) -> Result<Path, PathError> {
        self.try_append(Stage::Params, [name])
    }

    /// Appends block names.
    ///
    /// # Panics
    ///
    /// Panics if the path already has links, ports or params.
    pub fn append_block<I, S>(&self, names: I) -> Path
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.try_append_block(names).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Appends link names.
    ///
    /// # Panics
    ///
    /// Panics if the path already has ports or params.
    pub fn append_link<I, S>(&self, names: I) -> Path
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.try_append_link(names).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Appends port names.
    ///
    /// # Panics
    ///
    /// Panics if the path already has params.
    pub fn append_port<I, S>(&self, names: I) -> Path
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.try_append_port(names).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Appends a param name.
    pub fn append_param(&self, name: impl Into<String>) -> Path {
        let mut next = self.clone();
        next.params.push(name.into());
        next.stage = Stage::Params;
        next
    }

    /// Returns the path truncated to its block names.
    pub fn block_component(&self) -> Path {
        Path {
            blocks: self.blocks.clone(),
            ..Path::default()
        }
    }

    /// Returns the path truncated to its block and link names.
    ///
    /// With `must_have_link`, a path that names no link is an error.
    pub fn link_component(&self, must_have_link: bool) -> Result<Path, PathError> {
        if must_have_link && self.links.is_empty() {
            return Err(PathError::MissingLink { path: self.clone() });
        }
        let stage = if self.links.is_empty() {
            Stage::Blocks
        } else {
            Stage::Links
        };
        Ok(Path {
            blocks: self.blocks.clone(),
            links: self.links.clone(),
            stage,
            ..Path::default()
        })
    }

    /// Returns the path truncated to its first port name, dropping nested
    /// ports and params. Paths without ports are returned unchanged.
    pub fn simple_port(&self) -> Path {
        if self.ports.is_empty() {
            return self.clone();
        }
        Path {
            blocks: self.blocks.clone(),
            links: self.links.clone(),
            ports: vec![self.ports[0].clone()],
            params: Vec::new(),
            stage: Stage::Ports,
        }
    }

    /// Returns `true` if `self` extends `prefix` without skipping or
    /// truncating a stage.
    ///
    /// Stages are compared outermost first. While a stage is equal the
    /// comparison moves to the next one; a stage that merely extends the
    /// prefix's stage only matches when every later stage of both paths is
    /// empty.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        if self.blocks == prefix.blocks {
            if self.links == prefix.links {
                if self.ports == prefix.ports {
                    self.params.starts_with(&prefix.params)
                } else if self.ports.starts_with(&prefix.ports) {
                    self.params.is_empty() && prefix.params.is_empty()
                } else {
                    false
                }
            } else if self.links.starts_with(&prefix.links) {
                self.ports.is_empty()
                    && self.params.is_empty()
                    && prefix.ports.is_empty()
                    && prefix.params.is_empty()
            } else {
                false
            }
        } else if self.blocks.starts_with(&prefix.blocks) {
            self.links.is_empty()
                && self.ports.is_empty()
                && self.params.is_empty()
                && prefix.links.is_empty()
                && prefix.ports.is_empty()
                && prefix.params.is_empty()
        } else {
            false
        }
    }

    /// Converts to a name-only [`LocalPath`] relative to the root.
    pub fn to_local_path(&self) -> LocalPath {
        LocalPath::new(
            self.names()
                .map(|n| LocalStep::Name(n.to_string()))
                .collect(),
        )
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
            && self.links == other.links
            && self.ports == other.ports
            && self.params == other.params
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.blocks.hash(state);
        self.links.hash(state);
        self.ports.hash(state);
        self.params.hash(state);
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.blocks, &self.links, &self.ports, &self.params).cmp(&(
            &other.blocks,
            &other.links,
            &other.ports,
            &other.params,
        ))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "(root)");
        }
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
