//! Turning a simplified diagram into a layout request.

use crate::direction::{DirectionTable, NetRoles, ResolvedRole, RoleResolver};
use crate::errors::{warn_empty_net, warn_missing_port, warn_same_block_edge, warn_single_role};
use crate::request::{
    block_id, pair_edge_id, port_id, tunnel_edge_id, tunnel_id, tunnel_port_id, EdgeSpec,
    ElementKind, ElementMap, GraphRequest, NodeSpec, PortSpec,
};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use strata_config::StrataConfig;
use strata_diagnostics::DiagnosticSink;
use strata_diagram::{DiagramBlock, DiagramLink};
use strata_path::Path;

/// Sizing and fanout settings for emission.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    /// Minimum width of a block node.
    pub min_block_width: f64,
    /// Minimum height of a block node.
    pub min_block_height: f64,
    /// Nets with more sinks than this are drawn with tunnels.
    pub fanout_threshold: usize,
    /// Link types eligible for tunnels.
    pub fanout_link_types: Vec<String>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::from_config(&StrataConfig::default())
    }
}

impl EmitOptions {
    /// Takes the `[layout]` and `[fanout]` settings from `config`.
    pub fn from_config(config: &StrataConfig) -> Self {
        Self {
            min_block_width: config.layout.min_block_width,
            min_block_height: config.layout.min_block_height,
            fanout_threshold: config.fanout.threshold,
            fanout_link_types: config.fanout.link_types.clone(),
        }
    }
}

/// The emitted request together with its element map.
#[derive(Debug, Clone, Default)]
pub struct Emission {
    /// The graph for the layout engine.
    pub request: GraphRequest,
    /// Every emitted identifier mapped back to the design.
    pub elements: ElementMap,
}

/// Walks a diagram block tree and emits nodes, ports and edges.
pub struct EdgeEmitter<'a> {
    options: &'a EmitOptions,
    resolver: RoleResolver<'a>,
    sink: &'a DiagnosticSink,
    missing_reported: HashSet<(Path, Path)>,
    emission: Emission,
}

impl<'a> EdgeEmitter<'a> {
    /// Creates an emitter that resolves roles with `table` and reports into
    /// `sink`.
    pub fn new(
        table: &'a DirectionTable,
        options: &'a EmitOptions,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            options,
            resolver: RoleResolver::new(table, sink),
            sink,
            missing_reported: HashSet::new(),
            emission: Emission::default(),
        }
    }

    /// Emits the sub-blocks and nets of `root`, descending `depth` levels.
    ///
    /// Depth 1 draws the root's sub-blocks and the root's nets; each further
    /// level draws the nets inside every drawn block. A depth of 0 is
    /// treated as 1.
    pub fn emit(mut self, root: &DiagramBlock, depth: usize) -> Emission {
        debug!("emitting {} to depth {depth}", root.path);
        self.process_block(root, None, &HashMap::new(), depth.max(1) - 1, &HashMap::new());
        debug!(
            "emitted {} nodes and {} edges",
            self.emission.request.nodes.len(),
            self.emission.request.edges.len()
        );
        self.emission
    }

    fn process_block(
        &mut self,
        block: &DiagramBlock,
        container: Option<&str>,
        outer_ports: &HashMap<Path, String>,
        remaining_depth: usize,
        parent_roles: &HashMap<Path, ResolvedRole>,
    ) {
        let mut sub_ports = HashMap::new();
        for (name, sub) in &block.subblocks {
            let id = block_id(&sub.path);
            let mut ports = Vec::with_capacity(sub.ports.len());
            for port_name in sub.ports.keys() {
                let path = sub.path.append_port([port_name.as_str()]);
                let pid = port_id(&path);
                self.emission
                    .elements
                    .insert(pid.clone(), ElementKind::Port, path.clone());
                sub_ports.insert(path, pid.clone());
                ports.push(PortSpec {
                    id: pid,
                    label: port_name.clone(),
                });
            }
            trace!("node {id}");
            self.emission
                .elements
                .insert(id.clone(), ElementKind::Block, sub.path.clone());
            self.emission.request.nodes.push(NodeSpec {
                id,
                parent: container.map(str::to_string),
                label: format!("{name}: {}", sub.class_name()),
                min_width: self.options.min_block_width,
                min_height: self.options.min_block_height,
                ports,
            });
        }

        let mut visible_ports = outer_ports.clone();
        visible_ports.extend(sub_ports.iter().map(|(k, v)| (k.clone(), v.clone())));
        let mut level_roles = HashMap::new();
        for link in block.sublinks.values() {
            let roles = self.resolver.resolve(link, parent_roles);
            self.emit_link(link, &roles, &visible_ports, container);
            for (path, role) in roles.roles() {
                level_roles.insert(path.clone(), role);
            }
        }

        if remaining_depth > 0 {
            for sub in block.subblocks.values() {
                let id = block_id(&sub.path);
                let depth = remaining_depth - 1;
                self.process_block(sub, Some(id.as_str()), &sub_ports, depth, &level_roles);
            }
        }
    }

    fn is_fanout(&self, link: &DiagramLink, roles: &NetRoles) -> bool {
        let DiagramLink::Link(net) = link else {
            return false;
        };
        let eligible = net.link_type().is_some_and(|link_type| {
            self.options
                .fanout_link_types
                .iter()
                .any(|candidate| candidate == link_type.name())
        });
        eligible && roles.sinks.len() > self.options.fanout_threshold
    }

    fn emit_link(
        &mut self,
        link: &DiagramLink,
        roles: &NetRoles,
        ports: &HashMap<Path, String>,
        container: Option<&str>,
    ) {
        let link_path = link.path();
        if self.is_fanout(link, roles) {
            self.emit_tunnels(link_path, roles, ports, container);
        } else if !roles.sources.is_empty() && !roles.sinks.is_empty() {
            for source in &roles.sources {
                for sink in &roles.sinks {
                    if source.block_component() == sink.block_component() {
                        self.sink.emit(warn_same_block_edge(link_path, source, sink));
                        continue;
                    }
                    let id = pair_edge_id(link_path, source, sink);
                    self.edge(id, link_path, source, sink, true, ports, container);
                }
            }
        } else if !roles.sources.is_empty() || !roles.sinks.is_empty() {
            let (ends, missing) = if roles.sources.is_empty() {
                (&roles.sinks, "sources")
            } else {
                (&roles.sources, "sinks")
            };
            self.sink.emit(warn_single_role(link_path, missing));
            for (i, a) in ends.iter().enumerate() {
                for b in &ends[i + 1..] {
                    if a == b {
                        continue;
                    }
                    let id = pair_edge_id(link_path, a, b);
                    self.edge(id, link_path, a, b, false, ports, container);
                }
            }
        } else {
            self.sink.emit(warn_empty_net(link_path));
        }
    }

    fn emit_tunnels(
        &mut self,
        link_path: &Path,
        roles: &NetRoles,
        ports: &HashMap<Path, String>,
        container: Option<&str>,
    ) {
        let raw_name = link_path.links().last().map(String::as_str).unwrap_or("");
        let label = if raw_name.starts_with("_anon") {
            roles
                .sources
                .first()
                .and_then(|source| source.ports().first())
                .map(String::as_str)
                .unwrap_or(raw_name)
        } else {
            raw_name
        };
        debug!("drawing {link_path} with tunnels labelled '{label}'");

        for (side, ends) in [("sources", &roles.sources), ("sinks", &roles.sinks)] {
            for (i, end) in ends.iter().enumerate() {
                let Some(end_port) = self.port_of(link_path, end, ports) else {
                    continue;
                };
                let tunnel = tunnel_id(link_path, side, i);
                let tunnel_port = tunnel_port_id(&tunnel);
                self.emission
                    .elements
                    .insert(tunnel.clone(), ElementKind::Tunnel, link_path.clone());
                self.emission.request.nodes.push(NodeSpec {
                    id: tunnel,
                    parent: container.map(str::to_string),
                    label: label.to_string(),
                    min_width: 0.0,
                    min_height: 0.0,
                    ports: vec![PortSpec {
                        id: tunnel_port.clone(),
                        label: String::new(),
                    }],
                });
                let (source, target) = if side == "sources" {
                    (end_port, tunnel_port)
                } else {
                    (tunnel_port, end_port)
                };
                let id = tunnel_edge_id(link_path, end);
                self.push_edge(id, link_path, source, target, true, container);
            }
        }
    }

    /// The drawn port of `end`, reporting it when there is none.
    fn port_of(
        &mut self,
        link_path: &Path,
        end: &Path,
        ports: &HashMap<Path, String>,
    ) -> Option<String> {
        let port = ports.get(&end.simple_port()).cloned();
        if port.is_none() && self.missing_reported.insert((link_path.clone(), end.clone())) {
            self.sink.emit(warn_missing_port(link_path, end));
        }
        port
    }

    #[allow(clippy::too_many_arguments)]
    fn edge(
        &mut self,
        id: String,
        link_path: &Path,
        from: &Path,
        to: &Path,
        directed: bool,
        ports: &HashMap<Path, String>,
        container: Option<&str>,
    ) {
        let source = self.port_of(link_path, from, ports);
        let target = self.port_of(link_path, to, ports);
        if let (Some(source), Some(target)) = (source, target) {
            self.push_edge(id, link_path, source, target, directed, container);
        }
    }

    fn push_edge(
        &mut self,
        id: String,
        link_path: &Path,
        source: String,
        target: String,
        directed: bool,
        container: Option<&str>,
    ) {
        if self.emission.elements.get(&id).is_some() {
            trace!("edge {id} already emitted");
            return;
        }
        trace!("edge {id}: {source} -> {target}");
        self.emission
            .elements
            .insert(id.clone(), ElementKind::Edge, link_path.clone());
        self.emission.request.edges.push(EdgeSpec {
            id,
            parent: container.map(str::to_string),
            source,
            target,
            directed,
        });
    }
}
