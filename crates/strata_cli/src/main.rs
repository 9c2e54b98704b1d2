//! Strata CLI, the command-line interface for the Strata diagram mid-end.
//!
//! Provides `strata diagram` for building and laying out a block diagram,
//! `strata check` for reporting diagnostics only, `strata tree` for listing
//! a design's elements, and `strata connections` for tracing the nets that
//! reach a port or link.

#![warn(missing_docs)]

mod check;
mod connections;
mod diagram;
mod pipeline;
mod tree;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Strata, block diagrams from elaborated hardware designs.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Strata block diagram compiler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `strata.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level for library output. Overrides `--verbose` and `--quiet`.
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, lay out and export a block diagram.
    Diagram(DiagramArgs),
    /// Build a diagram and report its diagnostics.
    Check(CheckArgs),
    /// List every block, link and port of a design.
    Tree(TreeArgs),
    /// Show the nets connected to a port or link.
    Connections(ConnectionsArgs),
}

/// Arguments for the `strata diagram` subcommand.
#[derive(Parser, Debug)]
pub struct DiagramArgs {
    /// Elaborated design file (JSON).
    pub design: String,

    /// Render depth. Overrides `[diagram] depth` from the configuration.
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Keep bridge and adapter blocks instead of collapsing them.
    #[arg(long)]
    pub no_simplify: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `strata check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Elaborated design file (JSON).
    pub design: String,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `strata tree` subcommand.
#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Elaborated design file (JSON).
    pub design: String,
}

/// Arguments for the `strata connections` subcommand.
#[derive(Parser, Debug)]
pub struct ConnectionsArgs {
    /// Elaborated design file (JSON).
    pub design: String,

    /// Dotted reference from the design root, e.g. `mcu.swd` or `vcc`.
    pub path: String,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Log level selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No log output.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Progress messages.
    Info,
    /// Per-pass details.
    Debug,
    /// Per-element details.
    Trace,
}

impl LogLevel {
    fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_filter(&cli))
        .init();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Diagram(ref args) => diagram::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Tree(ref args) => tree::run(args, &global),
        Command::Connections(ref args) => connections::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// The log filter implied by `--log-level`, `--verbose` and `--quiet`.
fn log_filter(cli: &Cli) -> log::LevelFilter {
    match cli.log_level {
        Some(level) => level.filter(),
        None if cli.verbose => log::LevelFilter::Debug,
        None if cli.quiet => log::LevelFilter::Error,
        None => log::LevelFilter::Warn,
    }
}

/// Rough terminal detection from the TERM env var.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diagram_defaults() {
        let cli = Cli::parse_from(["strata", "diagram", "board.json"]);
        match cli.command {
            Command::Diagram(args) => {
                assert_eq!(args.design, "board.json");
                assert!(args.depth.is_none());
                assert!(!args.no_simplify);
                assert_eq!(args.format, ReportFormat::Text);
                assert!(args.output.is_none());
            }
            _ => panic!("expected Diagram command"),
        }
    }

    #[test]
    fn parse_diagram_with_options() {
        let cli = Cli::parse_from([
            "strata",
            "diagram",
            "board.json",
            "--depth",
            "3",
            "--no-simplify",
            "--format",
            "json",
            "-o",
            "out.json",
        ]);
        match cli.command {
            Command::Diagram(args) => {
                assert_eq!(args.depth, Some(3));
                assert!(args.no_simplify);
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.output.as_deref(), Some("out.json"));
            }
            _ => panic!("expected Diagram command"),
        }
    }

    #[test]
    fn parse_check_json() {
        let cli = Cli::parse_from(["strata", "check", "board.json", "-f", "json"]);
        match cli.command {
            Command::Check(args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_connections() {
        let cli = Cli::parse_from(["strata", "connections", "board.json", "mcu.swd"]);
        match cli.command {
            Command::Connections(args) => {
                assert_eq!(args.design, "board.json");
                assert_eq!(args.path, "mcu.swd");
            }
            _ => panic!("expected Connections command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "strata",
            "--quiet",
            "--color",
            "never",
            "--config",
            "custom.toml",
            "tree",
            "board.json",
        ]);
        assert!(cli.quiet);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(matches!(cli.command, Command::Tree(_)));
    }

    #[test]
    fn log_level_precedence() {
        let cli = Cli::parse_from(["strata", "-v", "tree", "d.json"]);
        assert_eq!(log_filter(&cli), log::LevelFilter::Debug);
        let cli = Cli::parse_from(["strata", "-q", "tree", "d.json"]);
        assert_eq!(log_filter(&cli), log::LevelFilter::Error);
        let cli = Cli::parse_from(["strata", "-v", "--log-level", "trace", "tree", "d.json"]);
        assert_eq!(log_filter(&cli), log::LevelFilter::Trace);
        let cli = Cli::parse_from(["strata", "tree", "d.json"]);
        assert_eq!(log_filter(&cli), log::LevelFilter::Warn);
    }
}
