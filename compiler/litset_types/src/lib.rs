//! Static types for literal sets.
//!
//! A literal set has two static readings. In a type position (annotation,
//! alias, anything nested under `Optional`/`Union`/a container) it is the
//! exhaustive union of one singleton type per unique value. In a value
//! position it is the set object itself, and `Set.MEMBER` is that
//! member's singleton.
//!
//! - [`Pool`] interns types behind 32-bit [`Idx`] handles
//! - [`ContextClassifier`] decides which reading applies to an occurrence
//! - [`TypeResolver`] turns a built set plus a verdict into a type

mod assign;
mod classify;
mod data;
mod flags;
mod idx;
mod pool;
mod resolve;

pub use classify::{
    Classified, ContextClassifier, ForwardRef, Occurrence, Position, ResolutionContext, Role,
    Site, Wrapper,
};
pub use data::TypeData;
pub use flags::TypeFlags;
pub use idx::Idx;
pub use pool::Pool;
pub use resolve::{
    BroadArgumentPolicy, OccurrenceShape, Rejection, Resolution, SetLookup, TypeResolver,
};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    litset_ir::static_assert_size!(super::Idx, 4);
}
