//! Conformance test helpers for the Strata diagram pipeline.
//!
//! Provides design builders for the scenarios exercised by the integration
//! tests, a helper that runs the full load pipeline on the built-in layout
//! engine, and canonical constraint listings for comparing a design with
//! its extracted model.

#![warn(missing_docs)]

use std::collections::BTreeSet;

use strata_config::StrataConfig;
use strata_diagnostics::{Diagnostic, Severity};
use strata_diagram::{DiagramBlock, DiagramLink};
use strata_graph::{BuildError, LayeredEngine, LayoutSession, LoadedDiagram};
use strata_ir::{BlockLike, Constraint, Design, HierarchyBlock, Link, LinkLike, LocalPath, PortLike};
use strata_path::Path;

/// Full name of the power link type drawn with tunnels by default.
pub const ELECTRICAL_LINK: &str = "electronics_model.ElectricalPorts.ElectricalLink";

/// Full name of the digital signal link type.
pub const DIGITAL_LINK: &str = "electronics_model.DigitalPorts.DigitalLink";

/// Result of running the full load pipeline.
pub struct PipelineResult {
    /// The loaded diagram.
    pub loaded: LoadedDiagram,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// The diagnostic codes emitted, as `W401`-style strings, in order.
    pub fn codes(&self) -> Vec<String> {
        self.loaded.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }
}

/// Runs extract, simplify, emit and layout on the built-in layered engine.
pub fn run_pipeline(design: &Design, config: &StrataConfig) -> Result<PipelineResult, BuildError> {
    let mut session = LayoutSession::open(Box::new(LayeredEngine::from_config(&config.layout)))?;
    let loaded = strata_graph::load(design, config, &mut session)?;
    session.close()?;
    let error_count = count(&loaded.diagnostics, Severity::Error);
    let warning_count = count(&loaded.diagnostics, Severity::Warning);
    Ok(PipelineResult {
        loaded,
        error_count,
        warning_count,
    })
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

/// A hierarchy block with one plain port per name.
pub fn leaf(class: &str, ports: &[&str]) -> BlockLike {
    let mut block = HierarchyBlock::new(class);
    for port in ports {
        block = block.with_port(port, PortLike::port("lib.Port"));
    }
    BlockLike::Hierarchy(block)
}

/// A link of `link_type` with `source` and `sinks` ports.
pub fn net(link_type: &str) -> LinkLike {
    LinkLike::Link(
        Link::new(link_type)
            .with_port("source", PortLike::port("lib.Source"))
            .with_port("sinks", PortLike::port("lib.Sink")),
    )
}

/// A module whose `vin` port is exported to an inner `cap.pwr`.
pub fn powered_module() -> BlockLike {
    BlockLike::Hierarchy(
        HierarchyBlock::new("lib.Module")
            .with_port("vin", PortLike::port("lib.Sink"))
            .with_block("cap", leaf("lib.Capacitor", &["pwr"]))
            .with_constraint("e", Constraint::exported(&["vin"], &["cap", "pwr"])),
    )
}

/// A board where `reg.vout` powers `loads` modules over the `vcc` net.
pub fn power_board(loads: usize) -> Design {
    let mut top = HierarchyBlock::new("lib.Board")
        .with_link("vcc", net(ELECTRICAL_LINK))
        .with_block("reg", leaf("lib.Regulator", &["vout"]))
        .with_constraint("c_reg", Constraint::connected(&["vcc", "source"], &["reg", "vout"]));
    for i in 0..loads {
        let name = format!("load{i}");
        top = top
            .with_block(&name, powered_module())
            .with_constraint(
                &format!("c_{name}"),
                Constraint::connected(&["vcc", "sinks"], &[name.as_str(), "vin"]),
            );
    }
    Design::new(top)
}

/// A board with an exported supply bridged onto `pwr`, and a digital
/// signal passed through an adapter from `osc` to `mcu`.
pub fn helper_board() -> Design {
    Design::new(
        HierarchyBlock::new("lib.Board")
            .with_port("vin", PortLike::port("lib.Sink"))
            .with_link("pwr", net(ELECTRICAL_LINK))
            .with_link("clk_raw", net(DIGITAL_LINK))
            .with_link("clk", net(DIGITAL_LINK))
            .with_block("(bridge)vin", leaf("lib.Bridge", &["outer_port", "inner_link"]))
            .with_block("osc", leaf("lib.Oscillator", &["out", "vdd"]))
            .with_block("(adapter)osc_mcu", leaf("lib.Adapter", &["src", "dst"]))
            .with_block("mcu", leaf("lib.Mcu", &["clk", "vdd"]))
            .with_constraint("e", Constraint::exported(&["vin"], &["(bridge)vin", "outer_port"]))
            .with_constraint(
                "b0",
                Constraint::connected(&["pwr", "source"], &["(bridge)vin", "inner_link"]),
            )
            .with_constraint("p0", Constraint::connected(&["pwr", "sinks"], &["osc", "vdd"]))
            .with_constraint("p1", Constraint::connected(&["pwr", "sinks"], &["mcu", "vdd"]))
            .with_constraint("k0", Constraint::connected(&["clk_raw", "source"], &["osc", "out"]))
            .with_constraint(
                "k1",
                Constraint::connected(&["clk_raw", "sinks"], &["(adapter)osc_mcu", "src"]),
            )
            .with_constraint(
                "k2",
                Constraint::connected(&["clk", "source"], &["(adapter)osc_mcu", "dst"]),
            )
            .with_constraint("k3", Constraint::connected(&["clk", "sinks"], &["mcu", "clk"])),
    )
}

/// The `connected` and `exported` constraints of `block`, one line each.
pub fn design_constraints(block: &HierarchyBlock) -> BTreeSet<String> {
    block
        .constraints
        .iter()
        .filter_map(|(_, constraint)| match constraint {
            Constraint::Connected {
                link_port,
                block_port,
            } => Some(format!("connected {link_port} {block_port}")),
            Constraint::Exported {
                exterior_port,
                internal_block_port,
            } => Some(format!("exported {exterior_port} {internal_block_port}")),
            Constraint::Expr { .. } => None,
        })
        .collect()
}

/// The constraints that would rebuild `block`'s sub-links, in the same
/// format as [`design_constraints`].
pub fn model_constraints(block: &DiagramBlock) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for (name, link) in &block.sublinks {
        match link {
            DiagramLink::Link(net) => {
                for (port, ends) in &net.ports {
                    let link_port = LocalPath::from_names([name.as_str(), port.as_str()]);
                    for end in ends {
                        let block_port = relative(&block.path, end);
                        out.insert(format!("connected {link_port} {block_port}"));
                    }
                }
            }
            DiagramLink::Export(export) => {
                let exterior = relative(&block.path, &export.exterior);
                let interior = relative(&block.path, &export.interior);
                out.insert(format!("exported {exterior} {interior}"));
            }
        }
    }
    out
}

fn relative(base: &Path, path: &Path) -> LocalPath {
    let blocks = path.blocks().iter().skip(base.blocks().len());
    LocalPath::from_names(blocks.chain(path.ports()).map(String::as_str))
}
