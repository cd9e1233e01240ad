//! Reference host pass for literal sets.
//!
//! Given parsed modules, this crate finds the classes that define sets,
//! builds them into a shared `SetCache` bases first, and then checks
//! every module: each occurrence of a set is classified as a type or a
//! value position and resolved to the matching type, and the places
//! where such a type meets a value are checked.
//!
//! ```text
//! SourceUnit*  -> collect_definitions -> build_sets (deferral queue)
//!                                           |
//!                                       SetCache
//!                                           |
//!              check_module (per unit, independent) -> CheckedModule
//! ```

mod cache;
mod check;
mod config;
mod definitions;
mod schedule;
mod scope;
mod unit;

pub use cache::{fingerprint, CacheEntry, CacheStats, SetCache, SetKey, SetState};
pub use check::{check_module, CheckedModule, TypedSpan};
pub use config::{CheckConfig, ConfigError};
pub use definitions::{collect_definitions, BaseRef, SetDefinition};
pub use schedule::{build_sets, BuildReport};
pub use scope::ModuleScope;
pub use unit::SourceUnit;

use litset_ir::StringInterner;

/// Build every set in `units` and check each unit, one after another.
pub fn check_units(
    units: &[SourceUnit],
    interner: &StringInterner,
    config: &CheckConfig,
    cache: &SetCache,
) -> Vec<CheckedModule> {
    let definitions = collect_definitions(units, interner, config, cache);
    let report = build_sets(units, &definitions, interner, config, cache);
    units
        .iter()
        .zip(report.diagnostics)
        .map(|(unit, diagnostics)| check_module(unit, interner, config, cache, diagnostics))
        .collect()
}
