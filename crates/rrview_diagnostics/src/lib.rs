//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Ingestion and metric passes never abort on a bad record: they emit a
//! structured [`Diagnostic`] into the thread-safe [`DiagnosticSink`] and keep
//! going. Callers drain the sink afterwards and decide whether a partial
//! result is acceptable. [`TerminalRenderer`] formats diagnostics for humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use location::{Location, RecordSection};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
