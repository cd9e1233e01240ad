//! Building every discovered definition, bases first.
//!
//! Definitions are processed from a queue. One whose base is still
//! `Building` goes to the back of the queue. When a whole round of the
//! queue defers without a single build, the remaining definitions can
//! never finish and fail with E2007 instead of looping.

use std::collections::VecDeque;
use std::sync::Arc;

use litset_diagnostic::Diagnostic;
use litset_ir::{Span, StmtKind, StringInterner};
use litset_sets::{DefinitionError, LiteralSet, MemberExtractor};
use rustc_hash::FxHashSet;

use crate::cache::{fingerprint, SetCache, SetKey, SetState};
use crate::config::CheckConfig;
use crate::definitions::SetDefinition;
use crate::unit::SourceUnit;

/// What `build_sets` did.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    /// Definition diagnostics, indexed like the unit slice.
    pub diagnostics: Vec<Vec<Diagnostic>>,
    pub built: Vec<SetKey>,
    pub failed: Vec<SetKey>,
}

enum Readiness {
    Ready(Vec<(Arc<LiteralSet>, u64)>),
    Wait,
    Broken(DefinitionError),
}

/// Build `definitions` into `cache`.
#[tracing::instrument(level = "debug", skip_all, fields(definitions = definitions.len()))]
pub fn build_sets(
    units: &[SourceUnit],
    definitions: &[SetDefinition],
    interner: &StringInterner,
    config: &CheckConfig,
    cache: &SetCache,
) -> BuildReport {
    let mut report = BuildReport {
        diagnostics: vec![Vec::new(); units.len()],
        ..BuildReport::default()
    };

    let live: FxHashSet<&SetKey> = definitions.iter().map(|d| &d.key).collect();
    for unit in units {
        cache.retain_module(&unit.module, |key| live.contains(key));
    }
    for definition in definitions {
        cache.declare(&definition.key);
    }

    let builder = config.builder();
    let mut queue: VecDeque<&SetDefinition> = definitions.iter().collect();
    let mut deferred_in_a_row = 0;
    while let Some(definition) = queue.pop_front() {
        let bases = match readiness(definition, cache) {
            Readiness::Ready(bases) => bases,
            Readiness::Wait => {
                tracing::debug!(set = %definition.key, "deferred: base still building");
                queue.push_back(definition);
                deferred_in_a_row += 1;
                if deferred_in_a_row >= queue.len() {
                    break;
                }
                continue;
            }
            Readiness::Broken(err) => {
                cache.fail(&definition.key);
                report.diagnostics[definition.unit].push(err.to_diagnostic());
                report.failed.push(definition.key.clone());
                deferred_in_a_row = 0;
                continue;
            }
        };
        deferred_in_a_row = 0;

        let unit = &units[definition.unit];
        let stmt = &unit.parsed.module.body[definition.stmt];
        let StmtKind::Class(class) = &stmt.kind else {
            cache.fail(&definition.key);
            continue;
        };
        let extraction = MemberExtractor::new(&unit.parsed.arena, interner).extract(class);
        report.diagnostics[definition.unit]
            .extend(extraction.errors.iter().map(DefinitionError::to_diagnostic));

        let base_fingerprints: Vec<u64> = bases.iter().map(|(_, fp)| *fp).collect();
        let fp = fingerprint(&unit.module, unit.text(stmt.span), &base_fingerprints, config.alias_scope);
        let mut request = extraction.into_request(definition.key.name.clone(), definition.span);
        for (base, _) in bases {
            request = request.with_base(base);
        }
        match cache.complete(&definition.key, fp, || builder.build(request)) {
            Ok(_) => report.built.push(definition.key.clone()),
            Err(err) => {
                report.diagnostics[definition.unit].push(err.to_diagnostic());
                report.failed.push(definition.key.clone());
            }
        }
    }

    for definition in queue {
        let waiting_on = definition
            .set_bases()
            .map(|(key, _)| key.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let err = unresolved(
            definition,
            format!("base {waiting_on} never finished building (cyclic definition)"),
        );
        cache.fail(&definition.key);
        report.diagnostics[definition.unit].push(err.to_diagnostic());
        report.failed.push(definition.key.clone());
    }

    tracing::debug!(
        built = report.built.len(),
        failed = report.failed.len(),
        "built sets"
    );
    report
}

fn readiness(definition: &SetDefinition, cache: &SetCache) -> Readiness {
    let mut bases = Vec::new();
    for (key, span) in definition.set_bases() {
        match cache.entry(key) {
            Some(entry) => match entry.state {
                SetState::Built(set) => bases.push((set, entry.fingerprint)),
                SetState::Building { .. } => return Readiness::Wait,
                SetState::Failed => {
                    return Readiness::Broken(unresolved_at(
                        definition,
                        format!("base '{key}' failed to build"),
                        span,
                    ))
                }
            },
            None => {
                return Readiness::Broken(unresolved_at(
                    definition,
                    format!("base '{key}' is not a built set"),
                    span,
                ))
            }
        }
    }
    Readiness::Ready(bases)
}

fn unresolved(definition: &SetDefinition, reason: String) -> DefinitionError {
    unresolved_at(definition, reason, definition.span)
}

fn unresolved_at(definition: &SetDefinition, reason: String, span: Span) -> DefinitionError {
    DefinitionError::Unresolved {
        set: definition.key.name.clone(),
        reason,
        span,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
