//! Entry point and result of checking one module.

use litset_diagnostic::{Diagnostic, DiagnosticQueue};
use litset_ir::{Span, StringInterner};

use super::ModuleChecker;
use crate::cache::SetCache;
use crate::config::CheckConfig;
use crate::unit::SourceUnit;

/// A source range and the type assigned to it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypedSpan {
    pub span: Span,
    pub ty: String,
}

impl TypedSpan {
    pub fn new(span: Span, ty: impl Into<String>) -> Self {
        TypedSpan { span, ty: ty.into() }
    }
}

/// Everything checking one module produced.
#[derive(Clone, Debug)]
pub struct CheckedModule {
    pub module: String,
    /// Parse, definition and resolution diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Type of every visited annotation.
    pub annotations: Vec<TypedSpan>,
    /// Type of every resolved set occurrence.
    pub occurrences: Vec<TypedSpan>,
}

impl CheckedModule {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Type recorded for exactly `span`, occurrences first.
    pub fn type_at(&self, span: Span) -> Option<&str> {
        self.occurrences
            .iter()
            .chain(&self.annotations)
            .find(|t| t.span == span)
            .map(|t| t.ty.as_str())
    }
}

/// Check one module whose sets are already in `cache`.
///
/// `definition_diagnostics` are the unit's diagnostics from building its
/// sets; they are merged with parse and resolution diagnostics so the
/// whole file reports through one queue.
pub fn check_module(
    unit: &SourceUnit,
    interner: &StringInterner,
    config: &CheckConfig,
    cache: &SetCache,
    definition_diagnostics: Vec<Diagnostic>,
) -> CheckedModule {
    let mut checker = ModuleChecker::new(unit, interner, cache, config.resolver());
    checker.check();

    let mut all = unit.parsed.errors.clone();
    all.extend(definition_diagnostics);
    all.append(&mut checker.diagnostics);
    all.sort_by_key(|d| d.primary_span().map_or(0, |s| s.start));

    let mut queue = DiagnosticQueue::for_source(&unit.source, config.diagnostics.clone());
    queue.extend(all);
    let diagnostics = queue.flush();
    tracing::debug!(
        module = %unit.module,
        diagnostics = diagnostics.len(),
        occurrences = checker.occurrences.len(),
        "checked module"
    );

    CheckedModule {
        module: unit.module.clone(),
        diagnostics,
        annotations: checker.annotations,
        occurrences: checker.occurrences,
    }
}
