//! Diagnostics for the Strata mid-end.
//!
//! Passes that can continue past a questionable input (an unknown link type, a
//! net with no driver, an adapter that cannot be collapsed) report a structured
//! [`Diagnostic`] located by a design [`Path`](strata_path::Path) into a shared
//! [`DiagnosticSink`]. A checker that cannot build a model at all reports that
//! as an error diagnostic in the same sink. [`TerminalRenderer`] formats them
//! for humans; the types serialize to JSON for tools.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::DiagnosticCode;
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
