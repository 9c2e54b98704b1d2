//! The end-to-end load pipeline.

use crate::direction::DirectionTable;
use crate::emit::{EdgeEmitter, EmitOptions};
use crate::layout::{LayoutError, LayoutResponse, LayoutSession};
use crate::request::{ElementMap, GraphRequest};
use log::{debug, info};
use serde::Serialize;
use strata_config::StrataConfig;
use strata_diagnostics::{Diagnostic, DiagnosticSink};
use strata_diagram::{ConnectivityIndex, DiagramBlock, ExtractError, SimplifyError, SimplifyOptions};
use strata_ir::Design;
use thiserror::Error;

/// A failure that stops a load.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The design could not be turned into a diagram.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// A helper block could not be collapsed.
    #[error(transparent)]
    Simplify(#[from] SimplifyError),
    /// The layout engine failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Everything a load produces.
#[derive(Debug, Serialize)]
pub struct LoadedDiagram {
    /// The (simplified) diagram model.
    pub root: DiagramBlock,
    /// The render depth actually used.
    pub depth: usize,
    /// The deepest sub-block nesting in the model.
    pub max_depth: usize,
    /// The request handed to the layout engine.
    pub request: GraphRequest,
    /// Every emitted identifier mapped back to the design.
    pub elements: ElementMap,
    /// The engine's geometry.
    pub layout: LayoutResponse,
    /// Net lookup over the whole model.
    #[serde(skip)]
    pub connectivity: ConnectivityIndex,
    /// Non-fatal diagnostics collected along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadedDiagram {
    /// Serializes the loaded diagram as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Returns `true` if any collected diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// Builds, simplifies, emits and lays out `design`.
///
/// The render depth is `config.diagram.depth`, clamped to between 1 and the
/// model's nesting depth.
pub fn load(
    design: &Design,
    config: &StrataConfig,
    session: &mut LayoutSession,
) -> Result<LoadedDiagram, BuildError> {
    let sink = DiagnosticSink::new();
    let class = design.contents.superclasses.first();
    info!("loading design {}", class.map(|c| c.name()).unwrap_or("(unnamed)"));

    let mut root = DiagramBlock::from_design(design)?;
    let options = SimplifyOptions {
        collapse_bridges: config.diagram.collapse_bridges,
        collapse_adapters: config.diagram.collapse_adapters,
    };
    root.simplify_recursive(options, &sink)?;
    let connectivity = ConnectivityIndex::build(&root);
    let max_depth = root.max_depth();
    let depth = config.diagram.depth.min(max_depth).max(1);
    debug!("model depth {max_depth}, rendering {depth}");

    let table = DirectionTable::from_config(config);
    let emit_options = EmitOptions::from_config(config);
    let emission = EdgeEmitter::new(&table, &emit_options, &sink).emit(&root, depth);
    let layout = session.layout(&emission.request)?;

    Ok(LoadedDiagram {
        root,
        depth,
        max_depth,
        request: emission.request,
        elements: emission.elements,
        layout,
        connectivity,
        diagnostics: sink.take_all(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layered::LayeredEngine;
    use strata_ir::{BlockLike, Constraint, HierarchyBlock, Link, LinkLike, PortLike};

    fn leaf(ports: &[&str]) -> BlockLike {
        let mut block = HierarchyBlock::new("lib.Leaf");
        for port in ports {
            block = block.with_port(port, PortLike::port("lib.Port"));
        }
        BlockLike::Hierarchy(block)
    }

    fn design() -> Design {
        let link = Link::new("electronics_model.DigitalPorts.DigitalLink")
            .with_port("source", PortLike::port("lib.Out"))
            .with_port("sinks", PortLike::port("lib.In"));
        Design::new(
            HierarchyBlock::new("lib.Board")
                .with_link("clk", LinkLike::Link(link))
                .with_block("osc", leaf(&["out"]))
                .with_block("mcu", leaf(&["clk"]))
                .with_constraint("a", Constraint::connected(&["clk", "source"], &["osc", "out"]))
                .with_constraint("b", Constraint::connected(&["clk", "sinks"], &["mcu", "clk"])),
        )
    }

    #[test]
    fn load_runs_every_stage() {
        let mut session = LayoutSession::open(Box::new(LayeredEngine::default())).unwrap();
        let loaded = load(&design(), &StrataConfig::default(), &mut session).unwrap();
        session.close().unwrap();
        assert_eq!(loaded.max_depth, 1);
        assert_eq!(loaded.depth, 1);
        assert_eq!(loaded.request.nodes.len(), 2);
        assert_eq!(loaded.request.edges.len(), 1);
        assert!(loaded.layout.edges.contains_key("edge:clk_osc.out_mcu.clk"));
        assert!(loaded.diagnostics.is_empty());
        assert!(!loaded.has_errors());
        let osc = strata_path::Path::empty().append_block(["osc"]).append_port(["out"]);
        assert_eq!(loaded.connectivity.links_at(&osc).len(), 1);
    }

    #[test]
    fn json_export_has_sections() {
        let mut session = LayoutSession::open(Box::new(LayeredEngine::default())).unwrap();
        let loaded = load(&design(), &StrataConfig::default(), &mut session).unwrap();
        let json: serde_json::Value = serde_json::from_str(&loaded.to_json().unwrap()).unwrap();
        assert_eq!(json["depth"], 1);
        assert!(json["elements"]["block:osc"].is_object());
        assert!(json["layout"]["nodes"]["block:mcu"].is_object());
        assert!(json.get("connectivity").is_none());
    }

    #[test]
    fn engine_failure_propagates() {
        struct Closed;
        impl crate::layout::LayoutEngine for Closed {
            fn name(&self) -> &str {
                "closed"
            }
            fn layout(&mut self, _: &GraphRequest) -> Result<LayoutResponse, LayoutError> {
                Err(LayoutError::Engine("engine exited".into()))
            }
        }
        let mut session = LayoutSession::open(Box::new(Closed)).unwrap();
        let err = load(&design(), &StrataConfig::default(), &mut session).unwrap_err();
        assert!(matches!(err, BuildError::Layout(_)));
        assert_eq!(err.to_string(), "layout failed: engine exited");
    }

    #[test]
    fn extraction_errors_propagate() {
        let design = Design::new(
            HierarchyBlock::new("lib.Board")
                .with_constraint("a", Constraint::connected(&["clk", "source"], &["osc", "out"])),
        );
        let mut session = LayoutSession::open(Box::new(LayeredEngine::default())).unwrap();
        let err = load(&design, &StrataConfig::default(), &mut session).unwrap_err();
        assert!(matches!(err, BuildError::Extract(_)));
    }
}
