//! `strata connections`: show the nets reaching a port or link.

use strata_diagnostics::DiagnosticSink;
use strata_diagram::{ConnectivityIndex, Highlight};
use strata_path::Path;

use crate::pipeline::{build_model, read_design, resolve_config, resolve_reference};
use crate::{ConnectionsArgs, GlobalArgs};

/// Runs the `strata connections` command.
///
/// Prints the nets directly on the path, then everything reachable from it
/// through exports and shared nets.
pub fn run(args: &ConnectionsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = resolve_config(global)?;
    let design = read_design(&args.design)?;
    let start = resolve_reference(&design, &args.path)?;

    let sink = DiagnosticSink::new();
    let root = build_model(&design, &config, &sink)?;
    let index = ConnectivityIndex::build(&root);
    let highlight = index.propagate(&start);
    print!("{}", render_connections(&index, &start, &highlight));
    Ok(0)
}

fn render_connections(index: &ConnectivityIndex, start: &Path, highlight: &Highlight) -> String {
    let mut out = format!("{start}\n");
    let direct = index.links_at(start);
    if direct.is_empty() && highlight.links.is_empty() {
        out.push_str("  not connected\n");
        return out;
    }
    for net in direct {
        let kind = if net.is_export { "export" } else { "net" };
        out.push_str(&format!("  {kind} {}\n", net.path));
    }
    out.push_str("reachable links:\n");
    for link in &highlight.links {
        out.push_str(&format!("  {link}\n"));
    }
    out.push_str("reachable ports:\n");
    for port in &highlight.ports {
        out.push_str(&format!("  {port}\n"));
    }
    out
}
