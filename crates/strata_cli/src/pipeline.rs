//! Shared pipeline helpers for CLI commands.
//!
//! Configuration lookup, design loading, model building, reference
//! resolution and diagnostic reporting used by every subcommand.

use std::path::{Path as FsPath, PathBuf};

use strata_config::{StrataConfig, CONFIG_FILE_NAME};
use strata_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer,
};
use strata_diagram::errors::{error_malformed_design, error_malformed_helper};
use strata_diagram::{DiagramBlock, ExtractError, SimplifyError, SimplifyOptions};
use strata_ir::{Design, LocalPath};
use strata_path::{Element, Path};

use crate::{GlobalArgs, ReportFormat};

/// Loads the configuration selected by the global flags.
///
/// If `--config` is specified, uses that path (file, or a directory holding
/// `strata.toml`). Otherwise reads `./strata.toml` when present and falls
/// back to defaults.
pub fn resolve_config(global: &GlobalArgs) -> Result<StrataConfig, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(strata_config::load_config(&p)?)
            } else {
                Ok(strata_config::load_config_file(&p)?)
            }
        }
        None => {
            let cwd = std::env::current_dir()?;
            if cwd.join(CONFIG_FILE_NAME).is_file() {
                Ok(strata_config::load_config(&cwd)?)
            } else {
                log::debug!("no {CONFIG_FILE_NAME} found, using defaults");
                Ok(StrataConfig::default())
            }
        }
    }
}

/// Reads an elaborated design from a JSON file.
pub fn read_design(path: &str) -> Result<Design, Box<dyn std::error::Error>> {
    let design = strata_ir::load_design(FsPath::new(path))
        .map_err(|e| format!("{path}: {e}"))?;
    Ok(design)
}

/// Why the diagram model could not be built.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The design's connections or names are inconsistent.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// A helper block could not be collapsed.
    #[error(transparent)]
    Simplify(#[from] SimplifyError),
}

impl ModelError {
    /// The failure as an error diagnostic located at the offending element.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ModelError::Extract(err) => error_malformed_design(err),
            ModelError::Simplify(err) => error_malformed_helper(err),
        }
    }
}

/// Extracts and simplifies the diagram model, collecting diagnostics in `sink`.
pub fn build_model(
    design: &Design,
    config: &StrataConfig,
    sink: &DiagnosticSink,
) -> Result<DiagramBlock, ModelError> {
    let mut root = DiagramBlock::from_design(design)?;
    let options = SimplifyOptions {
        collapse_bridges: config.diagram.collapse_bridges,
        collapse_adapters: config.diagram.collapse_adapters,
    };
    root.simplify_recursive(options, sink)?;
    Ok(root)
}

/// Resolves a dotted reference such as `mcu.swd` from the design root.
///
/// An empty reference names the root.
pub fn resolve_reference(design: &Design, text: &str) -> Result<Path, Box<dyn std::error::Error>> {
    if text.is_empty() {
        return Ok(Path::empty());
    }
    let local = LocalPath::from_names(text.split('.'));
    let (path, _) = Path::empty().follow(&local, Element::Block(&design.contents))?;
    Ok(path)
}

/// Counts `(errors, warnings)` in `diagnostics`.
pub fn count_diagnostics(diagnostics: &[Diagnostic]) -> (usize, usize) {
    let errors = diagnostics.iter().filter(|d| d.severity.is_error()).count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    (errors, warnings)
}

/// Renders diagnostics to stderr as text, or to stdout as a JSON array.
pub fn report_diagnostics(diagnostics: &[Diagnostic], format: ReportFormat, global: &GlobalArgs) {
    match format {
        ReportFormat::Text => {
            if global.quiet {
                return;
            }
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                eprintln!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Prints the closing `Result:` line for text output.
pub fn print_summary(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    let (errors, warnings) = count_diagnostics(diagnostics);
    eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
}
