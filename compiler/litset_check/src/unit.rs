//! One parsed source file.

use litset_ir::{Span, StringInterner};
use litset_parse::{parse_source, ParseOutput};

/// A module's source and its syntax tree.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    /// Dotted module path (`app.models`).
    pub module: String,
    pub source: String,
    pub parsed: ParseOutput,
}

impl SourceUnit {
    pub fn parse(module: impl Into<String>, source: impl Into<String>, interner: &StringInterner) -> Self {
        let module = module.into();
        let source = source.into();
        let parsed = parse_source(&source, interner);
        tracing::debug!(
            module = %module,
            statements = parsed.module.body.len(),
            errors = parsed.errors.len(),
            "parsed unit"
        );
        SourceUnit {
            module,
            source,
            parsed,
        }
    }

    /// Source text under `span`, empty when out of range.
    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.to_range()).unwrap_or("")
    }
}
