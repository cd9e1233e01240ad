use std::io::Write;

use serde_json::{json, Value};

use crate::span_utils::LineOffsetTable;
use crate::Diagnostic;

use super::{DiagnosticEmitter, SourceContext};

/// Buffers diagnostics and writes them as one JSON array on `flush`.
pub struct JsonEmitter<'a, W: Write> {
    writer: W,
    buffer: Vec<Value>,
    context: Option<(SourceContext<'a>, LineOffsetTable)>,
}

impl<'a, W: Write> JsonEmitter<'a, W> {
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            buffer: Vec::new(),
            context: None,
        }
    }

    /// Adds `file`, `line` and `column` to every label.
    #[must_use]
    pub fn with_source(mut self, context: SourceContext<'a>) -> Self {
        let table = LineOffsetTable::build(context.source);
        self.context = Some((context, table));
        self
    }

    fn to_value(&self, diagnostic: &Diagnostic) -> Value {
        let labels: Vec<Value> = diagnostic
            .labels
            .iter()
            .map(|label| {
                let mut value = json!({
                    "start": label.span.start,
                    "end": label.span.end,
                    "message": label.message,
                    "primary": label.is_primary,
                });
                if let (Some((ctx, table)), Some(obj)) = (&self.context, value.as_object_mut()) {
                    let (line, column) = table.offset_to_line_col(ctx.source, label.span.start);
                    obj.insert("file".into(), json!(ctx.path));
                    obj.insert("line".into(), json!(line));
                    obj.insert("column".into(), json!(column));
                }
                value
            })
            .collect();

        json!({
            "code": diagnostic.code.as_str(),
            "title": diagnostic.code.description(),
            "severity": diagnostic.severity.to_string(),
            "message": diagnostic.message,
            "labels": labels,
            "notes": diagnostic.notes,
            "suggestions": diagnostic.suggestions,
        })
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let value = self.to_value(diagnostic);
        self.buffer.push(value);
    }

    fn flush(&mut self) {
        let values = Value::Array(std::mem::take(&mut self.buffer));
        let _ = serde_json::to_writer_pretty(&mut self.writer, &values);
        let _ = writeln!(self.writer);
        let _ = self.writer.flush();
    }

    /// Counts are implied by the array; nothing extra is written.
    fn emit_summary(&mut self, _error_count: usize, _warning_count: usize) {}
}
