//! `strata diagram`: build, lay out and export a block diagram.
//!
//! The full pipeline:
//!
//! 1. Load config (with `--depth` and `--no-simplify` applied on top)
//! 2. Read the design JSON
//! 3. Open a layout session on the built-in layered engine
//! 4. Extract, simplify, emit and lay out
//! 5. Write a text outline or the JSON export

use std::fmt::Write as _;
use std::fs;

use strata_graph::{LayeredEngine, LayoutSession, LoadedDiagram};

use crate::pipeline::{print_summary, read_design, report_diagnostics, resolve_config};
use crate::{DiagramArgs, GlobalArgs, ReportFormat};

/// Runs the `strata diagram` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &DiagramArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = resolve_config(global)?;
    if let Some(depth) = args.depth {
        config.diagram.depth = depth;
    }
    if args.no_simplify {
        config.diagram.collapse_bridges = false;
        config.diagram.collapse_adapters = false;
    }

    let design = read_design(&args.design)?;
    if !global.quiet {
        eprintln!("   Building {}", args.design);
    }

    let mut session = LayoutSession::open(Box::new(LayeredEngine::from_config(&config.layout)))?;
    let loaded = strata_graph::load(&design, &config, &mut session)?;
    session.close()?;
    if global.verbose {
        eprintln!(
            "   {} node(s), {} edge(s), depth {} of {}",
            loaded.request.nodes.len(),
            loaded.request.edges.len(),
            loaded.depth,
            loaded.max_depth
        );
    }

    let output = match args.format {
        ReportFormat::Text => render_outline(&loaded),
        ReportFormat::Json => loaded.to_json()?,
    };
    match args.output {
        Some(ref path) => {
            fs::write(path, &output)?;
            if !global.quiet {
                eprintln!("   Wrote {path}");
            }
        }
        None => print!("{output}"),
    }

    report_diagnostics(&loaded.diagnostics, ReportFormat::Text, global);
    print_summary(&loaded.diagnostics, global);

    if loaded.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// A plain-text outline: nested nodes with their geometry, then edges.
fn render_outline(loaded: &LoadedDiagram) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "diagram depth {} of {} ({:.0} x {:.0})",
        loaded.depth, loaded.max_depth, loaded.layout.width, loaded.layout.height
    );
    for node in &loaded.request.nodes {
        let mut level = 0;
        let mut parent = node.parent.as_deref();
        while let Some(id) = parent {
            level += 1;
            parent = loaded.request.node(id).and_then(|p| p.parent.as_deref());
        }
        let indent = "  ".repeat(level + 1);
        match loaded.layout.nodes.get(&node.id) {
            Some(g) => {
                let _ = writeln!(
                    out,
                    "{indent}{} @ ({:.0}, {:.0}) {:.0}x{:.0}",
                    node.label, g.x, g.y, g.width, g.height
                );
            }
            None => {
                let _ = writeln!(out, "{indent}{}", node.label);
            }
        }
    }
    for edge in &loaded.request.edges {
        let arrow = if edge.directed { "->" } else { "--" };
        let net = loaded
            .elements
            .path(&edge.id)
            .map(ToString::to_string)
            .unwrap_or_default();
        let _ = writeln!(out, "  {} {arrow} {}  [{net}]", edge.source, edge.target);
    }
    out
}
