//! Collects diagnostics for one file, applying an error limit and
//! same-line deduplication, and hands them back sorted by position.

use std::hash::{DefaultHasher, Hash, Hasher};

use litset_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Characters of the message compared when deduplicating.
const MESSAGE_PREFIX_LEN: usize = 30;

fn message_prefix_hash(msg: &str) -> u64 {
    let end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = DefaultHasher::new();
    msg[..end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error on the same line with the same message prefix as the
    /// previous one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 50,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    line: u32,
    column: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    error_count: usize,
    last_syntax_line: Option<u32>,
    last_error: Option<(u32, u64)>,
    truncated: bool,
    config: DiagnosticConfig,
    lines: LineOffsetTable,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Queue whose positions are computed against `source`.
    pub fn for_source(source: &str, config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            lines: LineOffsetTable::build(source),
            ..Self::default()
        }
    }

    /// Line and byte column of the primary span; `(1, 1)` without a source.
    fn position(&self, diag: &Diagnostic) -> (u32, u32) {
        match diag.primary_span() {
            Some(span) if self.lines.line_count() > 0 => {
                let line = self.lines.line_from_offset(span.start);
                let start = self.lines.line_start_offset(line).unwrap_or(0);
                (line, span.start.saturating_sub(start) + 1)
            }
            _ => (1, 1),
        }
    }

    /// Add a diagnostic. Returns `false` when it was filtered out.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let (line, column) = self.position(&diag);
        self.add_at(diag, line, column)
    }

    /// Add a diagnostic with an explicit position.
    pub fn add_at(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        let is_error = diag.is_error();
        if is_error && self.limit_reached() {
            self.truncated = true;
            return false;
        }
        if self.config.deduplicate && self.is_duplicate(&diag, line) {
            return false;
        }

        if is_error {
            if diag.code.is_parser_error() {
                self.last_syntax_line = Some(line);
            } else {
                self.last_error = Some((line, message_prefix_hash(&diag.message)));
            }
            self.error_count += 1;
        }
        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });
        true
    }

    /// Emit an error diagnostic and get proof it was emitted.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.add(diag);
        ErrorGuaranteed::new()
    }

    pub fn extend(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.add(diag);
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sorted diagnostics; clears the queue.
    ///
    /// When the error limit dropped anything, a trailing E9002 says so.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| (d.line, d.column));
        let mut result: Vec<Diagnostic> =
            self.diagnostics.drain(..).map(|d| d.diagnostic).collect();
        if self.truncated {
            let span = result
                .last()
                .and_then(Diagnostic::primary_span)
                .unwrap_or(Span::DUMMY);
            result.push(too_many_errors(self.config.error_limit, span));
        }
        self.error_count = 0;
        self.last_syntax_line = None;
        self.last_error = None;
        self.truncated = false;
        result
    }

    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }

    fn is_duplicate(&self, diag: &Diagnostic, line: u32) -> bool {
        if !diag.is_error() {
            return false;
        }
        if diag.code.is_parser_error() {
            return self.last_syntax_line == Some(line);
        }
        self.last_error == Some((line, message_prefix_hash(&diag.message)))
    }
}

/// "too many errors" summary diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting after {limit} errors"))
        .with_label(span, "error limit reached here")
        .with_note("raise `error_limit` in the check configuration to see more")
}
