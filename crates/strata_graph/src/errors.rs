//! Diagnostic codes and helper functions for edge emission.
//!
//! Warning codes `W401`, `W403`--`W406` cover nets that can be drawn only
//! partially: unknown port roles, self-loops, nets with one role or none, and
//! endpoints with nothing to attach to.

use strata_diagnostics::{Diagnostic, DiagnosticCode, Label};
use strata_path::Path;

/// A link port whose role is not in the direction table.
pub const W401: DiagnosticCode = DiagnosticCode::warning(401);

/// A source/sink pair inside one block, dropped from the drawing.
pub const W403: DiagnosticCode = DiagnosticCode::warning(403);

/// A net with only sources or only sinks.
pub const W404: DiagnosticCode = DiagnosticCode::warning(404);

/// A net with no endpoints.
pub const W405: DiagnosticCode = DiagnosticCode::warning(405);

/// An endpoint with no drawn port.
pub const W406: DiagnosticCode = DiagnosticCode::warning(406);

/// Creates a W401 warning for an unknown port role.
pub fn warn_unknown_direction(link: &Path, link_type: &str, port: &str) -> Diagnostic {
    Diagnostic::new(
        W401,
        format!("unknown direction for {link_type} port '{port}'"),
        link.clone(),
    )
    .with_note("the port is treated as bidirectional")
}

/// Creates a W403 warning for a source and sink on the same block.
pub fn warn_same_block_edge(link: &Path, source: &Path, sink: &Path) -> Diagnostic {
    Diagnostic::new(
        W403,
        format!("discarding edge from '{source}' to '{sink}'"),
        link.clone(),
    )
    .with_label(Label::secondary(source.clone(), "source"))
    .with_label(Label::secondary(sink.clone(), "sink"))
    .with_note("both endpoints are on the same block")
}

/// Creates a W404 warning for a net whose endpoints all have one role.
pub fn warn_single_role(link: &Path, missing: &str) -> Diagnostic {
    Diagnostic::new(W404, format!("no {missing} on net '{link}'"), link.clone())
        .with_note("endpoints are joined by undirected edges")
}

/// Creates a W405 warning for a net with no endpoints.
pub fn warn_empty_net(link: &Path) -> Diagnostic {
    Diagnostic::new(W405, format!("empty net '{link}'"), link.clone())
}

/// Creates a W406 warning for an endpoint that has no port in the drawing.
pub fn warn_missing_port(link: &Path, endpoint: &Path) -> Diagnostic {
    Diagnostic::new(
        W406,
        format!("endpoint '{endpoint}' of '{link}' is not drawn"),
        link.clone(),
    )
    .with_label(Label::primary(endpoint.clone(), "no port at this level"))
}
