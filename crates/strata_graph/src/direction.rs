//! Port roles and their resolution per net.

use crate::errors::warn_unknown_direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use strata_config::{DirectionSpec, RoleName, StrataConfig};
use strata_diagnostics::DiagnosticSink;
use strata_diagram::DiagramLink;
use strata_path::Path;

/// The role a link port plays on its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PortRole {
    /// Drives the net.
    Source,
    /// Is driven by the net.
    Sink,
    /// Decided from context.
    Bidirectional,
}

impl From<RoleName> for PortRole {
    fn from(role: RoleName) -> Self {
        match role {
            RoleName::Source => PortRole::Source,
            RoleName::Sink => PortRole::Sink,
            RoleName::Bidir => PortRole::Bidirectional,
        }
    }
}

/// The role an endpoint ends up with after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResolvedRole {
    /// Drives the net.
    Source,
    /// Is driven by the net.
    Sink,
}

impl ResolvedRole {
    /// The role the same port plays seen from the other side of a block
    /// boundary.
    pub fn inverse(self) -> Self {
        match self {
            ResolvedRole::Source => ResolvedRole::Sink,
            ResolvedRole::Sink => ResolvedRole::Source,
        }
    }
}

#[derive(Debug, Clone)]
enum RoleRule {
    PerPort(HashMap<String, PortRole>),
    All(PortRole),
}

const SIGNAL_LINKS: [&str; 4] = [
    "electronics_model.DigitalPorts.DigitalLink",
    "electronics_model.ElectricalPorts.ElectricalLink",
    "electronics_model.AnalogPort.AnalogLink",
    "electronics_model.SpeakerPort.SpeakerLink",
];

/// Port roles by link type and link port name.
#[derive(Debug, Clone)]
pub struct DirectionTable {
    rules: HashMap<String, RoleRule>,
}

impl Default for DirectionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DirectionTable {
    /// A table with no rules; every lookup misses.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// The roles of the standard electronics link library.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for link in SIGNAL_LINKS {
            table.set_ports(
                link,
                &["source", "single_sources"],
                &["sinks", "sink"],
                &["bidirs", "passives"],
            );
        }
        table.set_all("electronics_model.PassivePort.PassiveLink", PortRole::Bidirectional);
        table.set_ports(
            "electronics_model.CrystalPort.CrystalLink",
            &["driver"],
            &["crystal"],
            &[],
        );
        table.set_ports("electronics_model.DebugPorts.SwdLink", &["host"], &["device"], &[]);
        table.set_ports("electronics_model.UartPort.UartLink", &["a"], &["b"], &[]);
        table.set_ports(
            "electronics_model.UsbPort.UsbLink",
            &["host"],
            &["device", "passive"],
            &[],
        );
        table.set_ports("electronics_model.SpiPort.SpiLink", &["master"], &["devices"], &[]);
        table.set_ports(
            "electronics_model.I2cPort.I2cLink",
            &["master", "pull"],
            &["devices"],
            &[],
        );
        table.set_ports(
            "electronics_model.CanPort.CanLogicLink",
            &["controller"],
            &["transceiver"],
            &[],
        );
        table.set_ports("electronics_model.CanPort.CanDiffLink", &[], &[], &["nodes"]);
        table
    }

    /// The built-in roles, with each `[directions]` entry of `config`
    /// replacing the rule for its link type.
    pub fn from_config(config: &StrataConfig) -> Self {
        let mut table = Self::builtin();
        for (link_type, spec) in &config.directions {
            table.apply(link_type, spec);
        }
        table
    }

    /// Replaces the rule for `link_type` with a configured one.
    pub fn apply(&mut self, link_type: &str, spec: &DirectionSpec) {
        fn names(list: &[String]) -> Vec<&str> {
            list.iter().map(String::as_str).collect()
        }

        match spec.all {
            Some(role) => self.set_all(link_type, role.into()),
            None => {
                self.set_ports(
                    link_type,
                    &names(&spec.source),
                    &names(&spec.sink),
                    &names(&spec.bidir),
                );
            }
        }
    }

    /// Gives every port of `link_type` the same role.
    pub fn set_all(&mut self, link_type: &str, role: PortRole) {
        self.rules.insert(link_type.to_string(), RoleRule::All(role));
    }

    /// Lists the source, sink and bidirectional ports of `link_type`.
    pub fn set_ports(&mut self, link_type: &str, source: &[&str], sink: &[&str], bidir: &[&str]) {
        let mut ports = HashMap::new();
        for (names, role) in [
            (source, PortRole::Source),
            (sink, PortRole::Sink),
            (bidir, PortRole::Bidirectional),
        ] {
            for name in names {
                ports.insert(name.to_string(), role);
            }
        }
        self.rules.insert(link_type.to_string(), RoleRule::PerPort(ports));
    }

    /// The role of `port` on a link of type `link_type`, if known.
    pub fn role(&self, link_type: &str, port: &str) -> Option<PortRole> {
        match self.rules.get(link_type)? {
            RoleRule::All(role) => Some(*role),
            RoleRule::PerPort(ports) => ports.get(port).copied(),
        }
    }
}

/// The endpoints of one net, split by resolved role, in attachment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetRoles {
    /// Endpoints driving the net.
    pub sources: Vec<Path>,
    /// Endpoints driven by the net.
    pub sinks: Vec<Path>,
}

impl NetRoles {
    /// Every endpoint with its role, sources first.
    pub fn roles(&self) -> impl Iterator<Item = (&Path, ResolvedRole)> {
        self.sources
            .iter()
            .map(|path| (path, ResolvedRole::Source))
            .chain(self.sinks.iter().map(|path| (path, ResolvedRole::Sink)))
    }
}

/// Resolves the roles of each net's endpoints, reporting unknown ports.
pub struct RoleResolver<'a> {
    table: &'a DirectionTable,
    sink: &'a DiagnosticSink,
    reported: HashSet<(Path, String)>,
}

impl<'a> RoleResolver<'a> {
    /// Creates a resolver over `table` that reports into `sink`.
    pub fn new(table: &'a DirectionTable, sink: &'a DiagnosticSink) -> Self {
        Self {
            table,
            sink,
            reported: HashSet::new(),
        }
    }

    fn port_role(&mut self, link: &Path, link_type: &str, port: &str) -> PortRole {
        if let Some(role) = self.table.role(link_type, port) {
            return role;
        }
        if self.reported.insert((link.clone(), port.to_string())) {
            self.sink.emit(warn_unknown_direction(link, link_type, port));
        }
        PortRole::Bidirectional
    }

    /// Splits the endpoints of `link` into sources and sinks.
    ///
    /// Table roles come first. A bidirectional endpoint that the enclosing
    /// scope already resolved takes the inverse role here. Of the remaining
    /// bidirectional endpoints, the first becomes a source if there is none
    /// yet, and every other one a sink. An export's exterior is considered
    /// before its interior.
    pub fn resolve(
        &mut self,
        link: &DiagramLink,
        parent_roles: &HashMap<Path, ResolvedRole>,
    ) -> NetRoles {
        let mut roles = NetRoles::default();
        let mut bidir = Vec::new();
        match link {
            DiagramLink::Link(net) => {
                let link_type = net.link_type().map(|t| t.name()).unwrap_or("");
                for (port, ends) in &net.ports {
                    if ends.is_empty() {
                        continue;
                    }
                    let role = self.port_role(&net.path, link_type, port);
                    for end in ends {
                        match role {
                            PortRole::Source => roles.sources.push(end.clone()),
                            PortRole::Sink => roles.sinks.push(end.clone()),
                            PortRole::Bidirectional => bidir.push(end.clone()),
                        }
                    }
                }
            }
            DiagramLink::Export(export) => {
                bidir.push(export.exterior.clone());
                bidir.push(export.interior.clone());
            }
        }

        let mut unresolved = Vec::new();
        for end in bidir {
            match parent_roles.get(&end).map(|role| role.inverse()) {
                Some(ResolvedRole::Source) => roles.sources.push(end),
                Some(ResolvedRole::Sink) => roles.sinks.push(end),
                None => unresolved.push(end),
            }
        }
        for end in unresolved {
            if roles.sources.is_empty() {
                roles.sources.push(end);
            } else {
                roles.sinks.push(end);
            }
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_diagram::{Export, LinkNet};
    use strata_ir::{LibraryPath, Link, PortLike};

    fn net(link_type: &str, ports: &[(&str, &[&str])]) -> DiagramLink {
        let mut link = Link::new(link_type);
        for (name, _) in ports {
            link = link.with_port(name, PortLike::port("lib.P"));
        }
        let mut net = LinkNet::new(Path::empty().append_link(["n"]), &link).unwrap();
        for (name, blocks) in ports {
            for block in blocks.iter() {
                let end = Path::empty().append_block([*block]).append_port(["p"]);
                net.ports[*name].push(end);
            }
        }
        DiagramLink::Link(net)
    }

    fn end(block: &str) -> Path {
        Path::empty().append_block([block]).append_port(["p"])
    }

    #[test]
    fn builtin_roles() {
        let table = DirectionTable::builtin();
        let power = "electronics_model.ElectricalPorts.ElectricalLink";
        assert_eq!(table.role(power, "source"), Some(PortRole::Source));
        assert_eq!(table.role(power, "sinks"), Some(PortRole::Sink));
        assert_eq!(table.role(power, "passives"), Some(PortRole::Bidirectional));
        assert_eq!(table.role(power, "other"), None);
        let passive = "electronics_model.PassivePort.PassiveLink";
        assert_eq!(table.role(passive, "anything"), Some(PortRole::Bidirectional));
        assert_eq!(
            table.role("electronics_model.I2cPort.I2cLink", "pull"),
            Some(PortRole::Source)
        );
        assert_eq!(table.role("lib.Unknown", "a"), None);
    }

    #[test]
    fn config_overrides_builtin() {
        let config = strata_config::load_config_from_str(
            r#"
[directions."electronics_model.UartPort.UartLink"]
all = "bidir"

[directions."lib.Custom"]
source = ["drv"]
sink = ["rx"]
"#,
        )
        .unwrap();
        let table = DirectionTable::from_config(&config);
        assert_eq!(
            table.role("electronics_model.UartPort.UartLink", "a"),
            Some(PortRole::Bidirectional)
        );
        assert_eq!(table.role("lib.Custom", "drv"), Some(PortRole::Source));
        assert_eq!(table.role("lib.Custom", "rx"), Some(PortRole::Sink));
    }

    #[test]
    fn table_roles_split() {
        let table = DirectionTable::builtin();
        let sink = DiagnosticSink::new();
        let link = net(
            "electronics_model.SpiPort.SpiLink",
            &[("master", &["mcu"]), ("devices", &["a", "b"])],
        );
        let roles = RoleResolver::new(&table, &sink).resolve(&link, &HashMap::new());
        assert_eq!(roles.sources, vec![end("mcu")]);
        assert_eq!(roles.sinks, vec![end("a"), end("b")]);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn bidir_first_becomes_source() {
        let table = DirectionTable::builtin();
        let sink = DiagnosticSink::new();
        let link = net(
            "electronics_model.PassivePort.PassiveLink",
            &[("passives", &["r1", "r2", "r3"])],
        );
        let roles = RoleResolver::new(&table, &sink).resolve(&link, &HashMap::new());
        assert_eq!(roles.sources, vec![end("r1")]);
        assert_eq!(roles.sinks, vec![end("r2"), end("r3")]);
    }

    #[test]
    fn unknown_port_warns_once() {
        let table = DirectionTable::builtin();
        let sink = DiagnosticSink::new();
        let link = net("lib.Mystery", &[("x", &["a", "b"])]);
        let mut resolver = RoleResolver::new(&table, &sink);
        resolver.resolve(&link, &HashMap::new());
        resolver.resolve(&link, &HashMap::new());
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, crate::errors::W401);
    }

    #[test]
    fn export_inverts_parent_role() {
        let table = DirectionTable::builtin();
        let sink = DiagnosticSink::new();
        let exterior = Path::empty().append_block(["m"]).append_port(["vin"]);
        let interior = Path::empty().append_block(["m", "reg"]).append_port(["vin"]);
        let export = DiagramLink::Export(Export {
            exterior: exterior.clone(),
            interior: interior.clone(),
        });
        let mut resolver = RoleResolver::new(&table, &sink);

        let parent = HashMap::from([(exterior.clone(), ResolvedRole::Sink)]);
        let roles = resolver.resolve(&export, &parent);
        assert_eq!(roles.sources, vec![exterior.clone()]);
        assert_eq!(roles.sinks, vec![interior.clone()]);

        let parent = HashMap::from([(exterior.clone(), ResolvedRole::Source)]);
        let roles = resolver.resolve(&export, &parent);
        assert_eq!(roles.sinks, vec![exterior]);
        assert_eq!(roles.sources, vec![interior]);
    }

    #[test]
    fn link_without_type_is_unknown() {
        let table = DirectionTable::builtin();
        let sink = DiagnosticSink::new();
        let mut link = Link::new("lib.X");
        link.superclasses.clear();
        link.self_class = Some(LibraryPath::new("lib.X"));
        let link = link.with_port("a", PortLike::port("lib.P"));
        let mut net = LinkNet::new(Path::empty().append_link(["n"]), &link).unwrap();
        net.ports
            .get_mut("a")
            .unwrap()
            .push(Path::empty().append_block(["u1"]).append_port(["x"]));
        let roles = RoleResolver::new(&table, &sink).resolve(&DiagramLink::Link(net), &HashMap::new());
        assert_eq!(roles.sources, vec![Path::empty().append_block(["u1"]).append_port(["x"])]);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, crate::errors::W401);
    }
}
