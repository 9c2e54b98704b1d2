//! A deterministic in-process layout engine.
//!
//! Siblings are layered left to right by breadth-first search over the
//! directed edges between them, starting from siblings with no incoming
//! edge. Nodes in one layer are stacked top to bottom. A node with children
//! is sized to fit them below its label. Ports that receive an edge sit on
//! the left side, all others on the right; edges are straight segments
//! between port anchors.

use crate::layout::{EdgeGeometry, LayoutEngine, LayoutError, LayoutResponse, NodeGeometry, Point};
use crate::request::GraphRequest;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use strata_config::LayoutConfig;

const PADDING: f64 = 12.0;
const HEADER: f64 = 24.0;
const PORT_PITCH: f64 = 20.0;
const CHAR_WIDTH: f64 = 7.0;

/// The reference layered layout engine.
#[derive(Debug, Clone)]
pub struct LayeredEngine {
    layer_spacing: f64,
    node_spacing: f64,
}

impl Default for LayeredEngine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    West,
    East,
}

struct Indexed<'r> {
    request: &'r GraphRequest,
    parents: Vec<Option<usize>>,
    children: HashMap<Option<usize>, Vec<usize>>,
    port_owner: HashMap<&'r str, (usize, Side)>,
    /// Directed edges as (source node, target node).
    links: Vec<(usize, usize)>,
}

impl LayeredEngine {
    /// Creates an engine with the given spacing between layers and between
    /// nodes in a layer.
    pub fn new(layer_spacing: f64, node_spacing: f64) -> Self {
        Self {
            layer_spacing,
            node_spacing,
        }
    }

    /// Takes the spacing from the `[layout]` settings.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.layer_spacing, config.node_spacing)
    }

    fn index<'r>(&self, request: &'r GraphRequest) -> Result<Indexed<'r>, LayoutError> {
        let mut ids = HashSet::new();
        let mut node_index = HashMap::new();
        let mut parents = Vec::with_capacity(request.nodes.len());
        let mut children: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
        for (i, node) in request.nodes.iter().enumerate() {
            if !ids.insert(node.id.as_str()) {
                return Err(LayoutError::DuplicateId(node.id.clone()));
            }
            let parent = match &node.parent {
                Some(parent) => Some(*node_index.get(parent.as_str()).ok_or_else(|| {
                    LayoutError::UnknownParent {
                        node: node.id.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };
            node_index.insert(node.id.as_str(), i);
            parents.push(parent);
            children.entry(parent).or_default().push(i);
        }

        let targets: HashSet<&str> = request
            .edges
            .iter()
            .map(|edge| edge.target.as_str())
            .collect();
        let mut port_owner = HashMap::new();
        for (i, node) in request.nodes.iter().enumerate() {
            for port in &node.ports {
                if !ids.insert(port.id.as_str()) {
                    return Err(LayoutError::DuplicateId(port.id.clone()));
                }
                let side = if targets.contains(port.id.as_str()) {
                    Side::West
                } else {
                    Side::East
                };
                port_owner.insert(port.id.as_str(), (i, side));
            }
        }

        let mut links = Vec::new();
        for edge in &request.edges {
            if !ids.insert(edge.id.as_str()) {
                return Err(LayoutError::DuplicateId(edge.id.clone()));
            }
            let owner = |port: &str| {
                port_owner
                    .get(port)
                    .map(|(node, _)| *node)
                    .ok_or_else(|| LayoutError::UnknownPort {
                        edge: edge.id.clone(),
                        port: port.to_string(),
                    })
            };
            let source = owner(&edge.source)?;
            let target = owner(&edge.target)?;
            if edge.directed {
                links.push((source, target));
            }
        }

        Ok(Indexed {
            request,
            parents,
            children,
            port_owner,
            links,
        })
    }

    /// Assigns each sibling in `group` to a layer.
    fn layers(
        &self,
        index: &Indexed<'_>,
        container: Option<usize>,
        group: &[usize],
    ) -> Vec<Vec<usize>> {
        let mut graph = DiGraph::<usize, ()>::new();
        let mut graph_index = HashMap::new();
        for &node in group {
            graph_index.insert(node, graph.add_node(node));
        }
        for &(source, target) in &index.links {
            let lifted = (
                lift(&index.parents, source, container),
                lift(&index.parents, target, container),
            );
            if let (Some(source), Some(target)) = lifted {
                if source != target {
                    graph.update_edge(graph_index[&source], graph_index[&target], ());
                }
            }
        }

        let roots: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|&idx| graph.neighbors_directed(idx, Direction::Incoming).count() == 0)
            .collect();
        let mut queue: VecDeque<(NodeIndex, usize)> =
            roots.into_iter().map(|idx| (idx, 0)).collect();
        let mut visited = HashSet::new();
        let mut layers: Vec<Vec<usize>> = Vec::new();
        let mut pending = graph.node_indices();
        loop {
            while let Some((idx, layer)) = queue.pop_front() {
                if !visited.insert(idx) {
                    continue;
                }
                while layers.len() <= layer {
                    layers.push(Vec::new());
                }
                layers[layer].push(graph[idx]);
                for next in graph.neighbors(idx) {
                    if !visited.contains(&next) {
                        queue.push_back((next, layer + 1));
                    }
                }
            }
            // Siblings only reachable through a cycle start a new search.
            match pending.find(|idx| !visited.contains(idx)) {
                Some(idx) => queue.push_back((idx, 0)),
                None => break,
            }
        }
        for layer in &mut layers {
            layer.sort_unstable();
        }
        layers
    }

    /// Places `group` relative to its container's content origin and
    /// returns the relative positions and the content size.
    fn arrange(
        &self,
        index: &Indexed<'_>,
        container: Option<usize>,
        sizes: &[(f64, f64)],
    ) -> (Vec<(usize, Point)>, f64, f64) {
        let Some(group) = index.children.get(&container) else {
            return (Vec::new(), 0.0, 0.0);
        };
        let mut placed = Vec::with_capacity(group.len());
        let mut x = 0.0;
        let mut height: f64 = 0.0;
        for (i, layer) in self.layers(index, container, group).iter().enumerate() {
            if i > 0 {
                x += self.layer_spacing;
            }
            let mut y = 0.0;
            let mut layer_width: f64 = 0.0;
            for (j, &node) in layer.iter().enumerate() {
                if j > 0 {
                    y += self.node_spacing;
                }
                placed.push((node, Point { x, y }));
                let (w, h) = sizes[node];
                y += h;
                layer_width = layer_width.max(w);
            }
            x += layer_width;
            height = height.max(y);
        }
        (placed, x, height)
    }
}

fn lift(parents: &[Option<usize>], mut node: usize, container: Option<usize>) -> Option<usize> {
    loop {
        if parents[node] == container {
            return Some(node);
        }
        node = parents[node]?;
    }
}

impl LayoutEngine for LayeredEngine {
    fn name(&self) -> &str {
        "layered"
    }

    fn layout(&mut self, request: &GraphRequest) -> Result<LayoutResponse, LayoutError> {
        let index = self.index(request)?;
        let count = request.nodes.len();

        let mut port_counts = vec![(0usize, 0usize); count];
        for (node, side) in index.port_owner.values() {
            match side {
                Side::West => port_counts[*node].0 += 1,
                Side::East => port_counts[*node].1 += 1,
            }
        }

        // Children always follow their parent, so sizing in reverse order
        // sees every child before its parent.
        let mut sizes = vec![(0.0, 0.0); count];
        let mut offsets: Vec<Vec<(usize, Point)>> = vec![Vec::new(); count];
        for i in (0..count).rev() {
            let node = &request.nodes[i];
            let (placed, content_w, content_h) = self.arrange(&index, Some(i), &sizes);
            let label_w = node.label.chars().count() as f64 * CHAR_WIDTH + 2.0 * PADDING;
            let (west, east) = port_counts[i];
            let ports_h = west.max(east) as f64 * PORT_PITCH;
            let content_h = if placed.is_empty() {
                0.0
            } else {
                content_h + PADDING
            };
            let width = node
                .min_width
                .max(label_w)
                .max(content_w + 2.0 * PADDING);
            let height = node.min_height.max(HEADER + content_h.max(ports_h));
            sizes[i] = (width, height);
            offsets[i] = placed;
        }

        let mut response = LayoutResponse::default();
        let (top, width, height) = self.arrange(&index, None, &sizes);
        response.width = width;
        response.height = height;
        let mut origins = vec![Point { x: 0.0, y: 0.0 }; count];
        let mut stack: Vec<(usize, Point)> = top;
        while let Some((node, at)) = stack.pop() {
            origins[node] = at;
            let inner = Point {
                x: at.x + PADDING,
                y: at.y + HEADER,
            };
            for (child, offset) in &offsets[node] {
                stack.push((
                    *child,
                    Point {
                        x: inner.x + offset.x,
                        y: inner.y + offset.y,
                    },
                ));
            }
        }

        for (i, node) in request.nodes.iter().enumerate() {
            let at = origins[i];
            let (width, height) = sizes[i];
            response.nodes.insert(
                node.id.clone(),
                NodeGeometry {
                    x: at.x,
                    y: at.y,
                    width,
                    height,
                },
            );
            let (mut west, mut east) = (0usize, 0usize);
            for port in &node.ports {
                let (x, slot) = match index.port_owner.get(port.id.as_str()) {
                    Some((_, Side::West)) => {
                        west += 1;
                        (at.x, west)
                    }
                    _ => {
                        east += 1;
                        (at.x + width, east)
                    }
                };
                let y = at.y + HEADER + (slot as f64 - 0.5) * PORT_PITCH;
                response.ports.insert(port.id.clone(), Point { x, y });
            }
        }

        for edge in &index.request.edges {
            let anchor = |port: &str| response.ports.get(port).copied();
            if let (Some(start), Some(end)) = (anchor(&edge.source), anchor(&edge.target)) {
                response.edges.insert(
                    edge.id.clone(),
                    EdgeGeometry {
                        points: vec![start, end],
                    },
                );
            }
        }
        debug!(
            "laid out {} nodes and {} edges in {:.0}x{:.0}",
            response.nodes.len(),
            response.edges.len(),
            response.width,
            response.height
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{EdgeSpec, NodeSpec, PortSpec};

    fn node(id: &str, parent: Option<&str>, ports: &[&str]) -> NodeSpec {
        NodeSpec {
            id: id.into(),
            parent: parent.map(str::to_string),
            label: id.into(),
            min_width: 100.0,
            min_height: 0.0,
            ports: ports
                .iter()
                .map(|p| PortSpec {
                    id: format!("{id}.{p}"),
                    label: p.to_string(),
                })
                .collect(),
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> EdgeSpec {
        EdgeSpec {
            id: id.into(),
            parent: None,
            source: source.into(),
            target: target.into(),
            directed: true,
        }
    }

    fn chain() -> GraphRequest {
        GraphRequest {
            nodes: vec![
                node("c", None, &["in"]),
                node("a", None, &["out"]),
                node("b", None, &["in", "out"]),
            ],
            edges: vec![edge("ab", "a.out", "b.in"), edge("bc", "b.out", "c.in")],
        }
    }

    #[test]
    fn layers_follow_edges() {
        let response = LayeredEngine::default().layout(&chain()).unwrap();
        let x = |id: &str| response.nodes[id].x;
        assert!(x("a") < x("b"));
        assert!(x("b") < x("c"));
        assert_eq!(response.edges["ab"].points.len(), 2);
        assert_eq!(response.ports["b.in"].x, x("b"));
        assert_eq!(response.ports["b.out"].x, x("b") + response.nodes["b"].width);
    }

    #[test]
    fn layout_is_deterministic() {
        let mut engine = LayeredEngine::default();
        assert_eq!(engine.layout(&chain()).unwrap(), engine.layout(&chain()).unwrap());
    }

    #[test]
    fn unconnected_nodes_stack() {
        let request = GraphRequest {
            nodes: vec![node("a", None, &[]), node("b", None, &[])],
            edges: Vec::new(),
        };
        let response = LayeredEngine::new(80.0, 40.0).layout(&request).unwrap();
        let (a, b) = (response.nodes["a"], response.nodes["b"]);
        assert_eq!(a.x, b.x);
        assert_eq!(b.y, a.y + a.height + 40.0);
    }

    #[test]
    fn cycle_is_placed() {
        let request = GraphRequest {
            nodes: vec![node("a", None, &["in", "out"]), node("b", None, &["in", "out"])],
            edges: vec![edge("ab", "a.out", "b.in"), edge("ba", "b.out", "a.in")],
        };
        let response = LayeredEngine::default().layout(&request).unwrap();
        assert_eq!(response.nodes.len(), 2);
        assert!(response.nodes["a"].x < response.nodes["b"].x);
    }

    #[test]
    fn parents_contain_children() {
        let request = GraphRequest {
            nodes: vec![
                node("outer", None, &["in"]),
                node("inner", Some("outer"), &["in"]),
                node("src", None, &["out"]),
            ],
            edges: vec![edge("e", "src.out", "outer.in")],
        };
        let response = LayeredEngine::default().layout(&request).unwrap();
        let (outer, inner) = (response.nodes["outer"], response.nodes["inner"]);
        assert!(inner.x >= outer.x && inner.x + inner.width <= outer.x + outer.width);
        assert!(inner.y >= outer.y + HEADER);
        assert!(inner.y + inner.height <= outer.y + outer.height);
    }

    #[test]
    fn unknown_port_errors() {
        let request = GraphRequest {
            nodes: vec![node("a", None, &["out"])],
            edges: vec![edge("e", "a.out", "ghost.in")],
        };
        let err = LayeredEngine::default().layout(&request).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownPort { ref port, .. } if port == "ghost.in"));
    }

    #[test]
    fn child_before_parent_errors() {
        let request = GraphRequest {
            nodes: vec![node("inner", Some("outer"), &[]), node("outer", None, &[])],
            edges: Vec::new(),
        };
        let err = LayeredEngine::default().layout(&request).unwrap_err();
        assert!(matches!(err, LayoutError::UnknownParent { .. }));
    }

    #[test]
    fn duplicate_ids_error() {
        let request = GraphRequest {
            nodes: vec![node("a", None, &[]), node("a", None, &[])],
            edges: Vec::new(),
        };
        let err = LayeredEngine::default().layout(&request).unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateId(ref id) if id == "a"));
    }
}
