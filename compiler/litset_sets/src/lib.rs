//! Literal sets: finite, named collections of scalar literals.
//!
//! The pipeline for one definition is
//! `MemberExtractor` (syntax to declared members), then `SetBuilder`
//! (declared members plus base set to an immutable `LiteralSet`), then
//! `LiteralNamespace` (the runtime view: lookup, validation, iteration).
//! The static side (`litset_types`) reads the same `LiteralSet`, so both
//! views agree by construction.
//!
//! `SetBuilder::union` and `SetBuilder::intersection` combine two built
//! sets into an anonymous one (`A | B`, `A & B`) for runtime callers.
//! They are library-only: the host pass types an annotation `A | B` as
//! the union of the two member types and never materializes the
//! combined set.
//!
//! A built set can be flattened to `(name, value, tag)` triples with
//! `PersistedSet` and reloaded without the source.

mod build;
mod error;
mod extract;
mod member;
mod namespace;
mod pattern;
mod persist;
mod schema;
mod set;

pub use build::{AliasScope, ExtensionRequest, SetBuilder};
pub use error::{
    AttributeNotFound, CallError, DefinitionError, EmptySchema, NotCallable, NotStringValued,
    PatternError, UnknownValue, ValidationError,
};
pub use extract::{
    evaluate_literal, extract_candidates, Candidate, ClassOptions, Classification, Exclusion,
    Extraction, MemberExtractor, NotLiteral,
};
pub use member::{DeclaredMember, LiteralMember};
pub use namespace::LiteralNamespace;
pub use persist::{PersistError, PersistedSet, PersistedTable, MemberRecord, FORMAT_VERSION};
pub use schema::SchemaOptions;
pub use set::{LiteralSet, UniqueValue};

/// Default name of the root marker class.
pub const ROOT_MARKER: &str = "LiteralEnum";

/// Render values the way error messages list them: `"GET", "POST", 1`.
pub fn render_values<'a>(values: impl IntoIterator<Item = &'a litset_ir::LiteralValue>) -> String {
    let mut out = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&value.to_string());
    }
    out
}
