use std::io::Write;

use litset_check::CheckedModule;
use litset_diagnostic::emitter::{
    ColorMode, DiagnosticEmitter, JsonEmitter, SourceContext, TerminalEmitter,
};

use crate::SourceFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal(ColorMode),
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Terminal(ColorMode::Auto)
    }
}

/// Write `checked`'s diagnostics for `file` to `writer`.
pub fn render<W: Write>(
    writer: W,
    file: &SourceFile,
    checked: &CheckedModule,
    format: OutputFormat,
    is_tty: bool,
) {
    let context = SourceContext {
        path: &file.display,
        source: &file.source,
    };
    match format {
        OutputFormat::Terminal(mode) => {
            let errors = checked.error_count();
            let mut emitter = TerminalEmitter::new(writer, mode, is_tty).with_source(context);
            emitter.emit_all(&checked.diagnostics);
            emitter.emit_summary(errors, checked.diagnostics.len() - errors);
            emitter.flush();
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(writer).with_source(context);
            emitter.emit_all(&checked.diagnostics);
            emitter.flush();
        }
    }
}
