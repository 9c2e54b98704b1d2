//! Net lookup by port, and highlight propagation across the hierarchy.

use crate::model::{DiagramBlock, DiagramLink};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use strata_path::Path;

/// A net recorded in a [`ConnectivityIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetEntry {
    /// The net's path: a link path, or an export's exterior port.
    pub path: Path,
    /// Whether the net is an export pseudo-link.
    pub is_export: bool,
    /// The simple port of every attached endpoint, in order.
    pub ends: Vec<Path>,
}

impl NetEntry {
    fn new(link: &DiagramLink) -> Self {
        Self {
            path: link.path().clone(),
            is_export: matches!(link, DiagramLink::Export(_)),
            ends: link.all_ports().into_iter().map(Path::simple_port).collect(),
        }
    }
}

/// Everything reached by a [`ConnectivityIndex::propagate`] walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlight {
    /// The nets reached.
    pub links: BTreeSet<Path>,
    /// The endpoints of those nets.
    pub ports: BTreeSet<Path>,
}

/// Maps each net path and each endpoint port to the nets touching it,
/// across every level of a diagram.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityIndex {
    nets: Vec<NetEntry>,
    by_path: HashMap<Path, Vec<usize>>,
}

impl ConnectivityIndex {
    /// Indexes every net of `root` and its sub-blocks.
    pub fn build(root: &DiagramBlock) -> Self {
        let mut index = ConnectivityIndex::default();
        index.register(root);
        index
    }

    fn register(&mut self, block: &DiagramBlock) {
        for link in block.sublinks.values() {
            let id = self.nets.len();
            let entry = NetEntry::new(link);
            let mut keys = vec![entry.path.clone()];
            keys.extend(entry.ends.iter().cloned());
            for key in keys {
                let ids = self.by_path.entry(key).or_default();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            self.nets.push(entry);
        }
        for sub in block.subblocks.values() {
            self.register(sub);
        }
    }

    /// Every indexed net.
    pub fn nets(&self) -> &[NetEntry] {
        &self.nets
    }

    /// The nets whose path is `path` or that have `path` as an endpoint.
    pub fn links_at(&self, path: &Path) -> Vec<&NetEntry> {
        self.by_path
            .get(path)
            .map(|ids| ids.iter().map(|&id| &self.nets[id]).collect())
            .unwrap_or_default()
    }

    /// Collects everything electrically connected to `path`.
    ///
    /// Starting at `path`, each net touching it is taken, together with its
    /// endpoints, and the walk continues from every endpoint. A net is not
    /// entered from a block whose nets were already crossed on the way
    /// there, so the walk moves up and down the hierarchy without turning
    /// back. `path` itself is included in the result.
    pub fn propagate(&self, path: &Path) -> Highlight {
        let mut highlight = Highlight::default();
        let mut visited = HashSet::new();
        self.walk(path, &BTreeSet::new(), &mut visited, &mut highlight);
        if !path.links().is_empty() && path.ports().is_empty() {
            highlight.links.insert(path.clone());
        } else {
            highlight.ports.insert(path.clone());
        }
        highlight
    }

    fn walk(
        &self,
        path: &Path,
        seen_blocks: &BTreeSet<Path>,
        visited: &mut HashSet<(usize, BTreeSet<Path>)>,
        highlight: &mut Highlight,
    ) {
        let Some(ids) = self.by_path.get(path) else {
            return;
        };
        for &id in ids {
            let net = &self.nets[id];
            let owner = net.path.block_component();
            if seen_blocks.contains(&owner) {
                continue;
            }
            let mut seen = seen_blocks.clone();
            seen.insert(owner);
            if !visited.insert((id, seen.clone())) {
                continue;
            }
            highlight.links.insert(net.path.clone());
            for end in &net.ends {
                highlight.ports.insert(end.clone());
                self.walk(end, &seen, visited, highlight);
            }
        }
    }
}
