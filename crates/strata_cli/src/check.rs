//! `strata check`: build the diagram model and report diagnostics.
//!
//! Runs extraction, simplification and edge emission without a layout
//! engine, so problems in the design show up without rendering anything.
//! A model that cannot be built is reported as an error diagnostic.

use strata_diagnostics::DiagnosticSink;
use strata_graph::{DirectionTable, EdgeEmitter, EmitOptions};

use crate::pipeline::{build_model, print_summary, read_design, report_diagnostics, resolve_config};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `strata check` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = resolve_config(global)?;
    let design = read_design(&args.design)?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking {}", args.design);
    }

    let sink = DiagnosticSink::new();
    match build_model(&design, &config, &sink) {
        Ok(root) => {
            let depth = config.diagram.depth.min(root.max_depth()).max(1);
            let table = DirectionTable::from_config(&config);
            let options = EmitOptions::from_config(&config);
            EdgeEmitter::new(&table, &options, &sink).emit(&root, depth);
        }
        Err(err) => {
            log::debug!("model build failed: {err}");
            sink.emit(err.to_diagnostic());
        }
    }

    let diagnostics = sink.take_all();
    report_diagnostics(&diagnostics, args.format, global);
    if args.format == ReportFormat::Text {
        print_summary(&diagnostics, global);
    }

    if sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{global, write_board};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn clean_design_passes() {
        let tmp = TempDir::new().unwrap();
        let args = CheckArgs {
            design: write_board(&tmp),
            format: ReportFormat::Text,
        };
        assert_eq!(run(&args, &global()).unwrap(), 0);
    }

    #[test]
    fn malformed_design_reports_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(
            &path,
            r#"{"contents": {"constraints": {
                "a": {"connected": {"link_port": ["x", "y"], "block_port": ["z", "w"]}}
            }}}"#,
        )
        .unwrap();
        let args = CheckArgs {
            design: path.to_string_lossy().into_owned(),
            format: ReportFormat::Text,
        };
        assert_eq!(run(&args, &global()).unwrap(), 1);
    }

    #[test]
    fn unreadable_design_is_an_error() {
        let args = CheckArgs {
            design: "/nonexistent/board.json".into(),
            format: ReportFormat::Json,
        };
        assert!(run(&args, &global()).is_err());
    }
}
