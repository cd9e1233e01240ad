//! Diagnostic emitters.
//!
//! - Terminal: human-readable, optionally colored, with source snippets
//! - JSON: machine-readable array for editors and CI

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Sink for rendered diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    fn flush(&mut self);

    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// Source text and display path attached to an emitter.
#[derive(Clone, Debug)]
pub struct SourceContext<'a> {
    pub path: &'a str,
    pub source: &'a str,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
