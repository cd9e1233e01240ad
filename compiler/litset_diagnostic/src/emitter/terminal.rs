use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Severity};

use super::{DiagnosticEmitter, SourceContext};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const HELP: &str = "\x1b[1;32m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when the output is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Human-readable emitter.
///
/// With a `SourceContext`, labels render as `path:line:col` followed by the
/// source line and a caret underline; without one, as raw byte spans.
pub struct TerminalEmitter<'a, W: Write> {
    writer: W,
    colors: bool,
    context: Option<(SourceContext<'a>, LineOffsetTable)>,
}

impl<'a, W: Write> TerminalEmitter<'a, W> {
    pub fn new(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            context: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, context: SourceContext<'a>) -> Self {
        let table = LineOffsetTable::build(context.source);
        self.context = Some((context, table));
        self
    }

    fn paint(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        }
    }
}

impl<'a> TerminalEmitter<'a, io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::new(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let severity = diagnostic.severity.to_string();
        self.paint(&severity, Self::severity_color(diagnostic.severity));
        let code = format!("[{}]", diagnostic.code);
        self.paint(&code, colors::BOLD);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            let color = if label.is_primary {
                Self::severity_color(diagnostic.severity)
            } else {
                colors::SECONDARY
            };
            match &self.context {
                Some((ctx, table)) => {
                    let (line, col) = table.offset_to_line_col(ctx.source, label.span.start);
                    let snippet = table.line_text(ctx.source, line).unwrap_or("").to_owned();
                    let _ = writeln!(self.writer, "  {marker} {}:{line}:{col}", ctx.path);
                    let _ = writeln!(self.writer, "{line:>5} | {snippet}");
                    let width = (label.span.len() as usize).max(1);
                    let underline = format!(
                        "{}{} {}",
                        " ".repeat(col.saturating_sub(1) as usize),
                        if label.is_primary { "^" } else { "-" }.repeat(width),
                        label.message
                    );
                    let _ = write!(self.writer, "      | ");
                    self.paint(&underline, color);
                    let _ = writeln!(self.writer);
                }
                None => {
                    let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
                    self.paint(&label.message, color);
                    let _ = writeln!(self.writer);
                }
            }
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.paint("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }
        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.paint("help", colors::HELP);
            let _ = writeln!(self.writer, ": {suggestion}");
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        if error_count > 0 {
            self.paint("error", colors::ERROR);
            let _ = write!(
                self.writer,
                ": {error_count} error{} found",
                plural(error_count)
            );
            if warning_count > 0 {
                let _ = write!(
                    self.writer,
                    "; {warning_count} warning{} emitted",
                    plural(warning_count)
                );
            }
            let _ = writeln!(self.writer);
        } else if warning_count > 0 {
            self.paint("warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {warning_count} warning{} emitted",
                plural(warning_count)
            );
        }
    }
}
