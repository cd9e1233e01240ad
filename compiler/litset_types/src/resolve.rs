//! Type resolution for literal-set occurrences.

use litset_diagnostic::{Diagnostic, ErrorCode};
use litset_ir::{LiteralValue, Span};
use litset_sets::{render_values, LiteralSet};

use crate::{Idx, Pool, ResolutionContext, TypeData};

/// What a construction call with an argument that is not narrowed to
/// known literals resolves to.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum BroadArgumentPolicy {
    /// The full union: any member, checked at runtime.
    #[default]
    FullUnion,
    /// A static rejection.
    Reject,
}

/// The host's knowledge of the symbol an occurrence names.
#[derive(Copy, Clone, Debug)]
pub enum SetLookup<'a> {
    Built(&'a LiteralSet),
    /// A literal set that is still being built.
    Pending,
    /// Not a literal set at all.
    NotASet,
}

/// How the occurrence is used.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OccurrenceShape<'a> {
    /// The set name on its own.
    Bare,
    /// `Set.NAME`
    Member(&'a str),
    /// `Set(args)`, honoring `call_to_validate`.
    Construct(&'a [Idx]),
    /// `Set.validate(args)`, always allowed.
    Validate(&'a [Idx]),
    /// `Set.is_valid(x)` / `x in Set`
    Predicate,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    Type(Idx),
    Rejected(Rejection),
    /// Retry once the set is built.
    Deferred,
    /// Leave the host's own resolution alone.
    NotApplicable,
}

/// A static error found while resolving an occurrence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rejection {
    /// A literal that is not one of the set's values.
    NotAMember {
        set: String,
        value: LiteralValue,
        allowed: Vec<LiteralValue>,
    },
    UnknownMember {
        set: String,
        name: String,
    },
    NotCallable {
        set: String,
    },
    Arity {
        callee: String,
        found: usize,
    },
    /// A broad argument whose type no member value has, such as `int`
    /// for a set of strings. Rejected under either policy.
    Disjoint {
        set: String,
        argument: String,
        allowed: Vec<LiteralValue>,
    },
    /// An argument not narrowed to known literals, under
    /// `BroadArgumentPolicy::Reject`.
    BroadArgument {
        set: String,
        argument: String,
        allowed: Vec<LiteralValue>,
    },
}

impl Rejection {
    pub fn code(&self) -> ErrorCode {
        match self {
            Rejection::NotAMember { .. } | Rejection::Disjoint { .. } => ErrorCode::E3001,
            Rejection::UnknownMember { .. } => ErrorCode::E3002,
            Rejection::NotCallable { .. } => ErrorCode::E3003,
            Rejection::Arity { .. } => ErrorCode::E3005,
            Rejection::BroadArgument { .. } => ErrorCode::E3006,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Rejection::NotAMember {
                set,
                value,
                allowed,
            } => format!(
                "Value {value} is not a member of {set}; expected one of: {}",
                render_values(allowed)
            ),
            Rejection::UnknownMember { set, name } => {
                format!("'{name}' is not a member of {set}")
            }
            Rejection::Disjoint {
                set,
                argument,
                allowed,
            } => format!(
                "argument of type {argument} can never be a member of {set}; expected one of: {}",
                render_values(allowed)
            ),
            Rejection::NotCallable { set } => format!(
                "'{set}' is not callable; use {set}.validate(x) or pass call_to_validate=True"
            ),
            Rejection::Arity { callee, found } => {
                format!("{callee}() takes exactly one argument ({found} given)")
            }
            Rejection::BroadArgument {
                set,
                argument,
                allowed,
            } => format!(
                "argument of type {argument} is too broad for {set}; expected one of: {}",
                render_values(allowed)
            ),
        }
    }

    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code()).with_message(self.message());
        match self {
            Rejection::NotAMember { set, .. } => {
                diagnostic.with_label(span, format!("not a member of {set}"))
            }
            Rejection::UnknownMember { set, .. } => {
                diagnostic.with_label(span, format!("{set} has no such member"))
            }
            Rejection::Disjoint { set, .. } => {
                diagnostic.with_label(span, format!("no member of {set} has this type"))
            }
            Rejection::NotCallable { set } => diagnostic
                .with_label(span, "called here")
                .with_suggestion(format!("{set}.validate(x)")),
            Rejection::Arity { .. } => diagnostic.with_label(span, "expected one argument"),
            Rejection::BroadArgument { set, .. } => diagnostic
                .with_label(span, "not narrowed to a member")
                .with_note(format!(
                    "narrow the value first, or check it at runtime with {set}.validate(x)"
                )),
        }
    }
}

/// Resolves literal-set occurrences to types.
#[derive(Copy, Clone, Debug, Default)]
pub struct TypeResolver {
    policy: BroadArgumentPolicy,
}

impl TypeResolver {
    pub fn new(policy: BroadArgumentPolicy) -> Self {
        TypeResolver { policy }
    }

    pub fn policy(&self) -> BroadArgumentPolicy {
        self.policy
    }

    /// The exhaustive union of one singleton per unique value. A
    /// one-value set is that singleton; an empty set is `Never`.
    pub fn set_type(&self, pool: &mut Pool, set: &LiteralSet) -> Idx {
        let members: Vec<Idx> = set
            .unique_values()
            .map(|v| pool.literal(v.clone()))
            .collect();
        pool.union(members)
    }

    pub fn resolve(
        &self,
        pool: &mut Pool,
        lookup: SetLookup<'_>,
        context: &ResolutionContext,
        shape: OccurrenceShape<'_>,
    ) -> Resolution {
        let set = match lookup {
            SetLookup::Built(set) => set,
            SetLookup::Pending => return Resolution::Deferred,
            SetLookup::NotASet => return Resolution::NotApplicable,
        };
        match shape {
            OccurrenceShape::Bare if context.is_type() => {
                Resolution::Type(self.set_type(pool, set))
            }
            OccurrenceShape::Bare => Resolution::Type(pool.set_object(set.name())),
            OccurrenceShape::Member(name) => match set.member(name) {
                Some(member) => Resolution::Type(pool.literal(member.value.clone())),
                None => Resolution::Rejected(Rejection::UnknownMember {
                    set: set.name().to_owned(),
                    name: name.to_owned(),
                }),
            },
            OccurrenceShape::Construct(_) if !set.call_to_validate() => {
                Resolution::Rejected(Rejection::NotCallable {
                    set: set.name().to_owned(),
                })
            }
            OccurrenceShape::Construct(args) => self.narrow(pool, set, set.name().to_owned(), args),
            OccurrenceShape::Validate(args) => {
                self.narrow(pool, set, format!("{}.validate", set.name()), args)
            }
            OccurrenceShape::Predicate => Resolution::Type(Idx::BOOL),
        }
    }

    /// Result of constructing or validating with `args`.
    ///
    /// A literal argument that is a member keeps its singleton type; a
    /// literal that is not is rejected. Anything broader follows the
    /// policy.
    fn narrow(&self, pool: &mut Pool, set: &LiteralSet, callee: String, args: &[Idx]) -> Resolution {
        let &[argument] = args else {
            return Resolution::Rejected(Rejection::Arity {
                callee,
                found: args.len(),
            });
        };
        if argument == Idx::UNKNOWN {
            return Resolution::Type(self.set_type(pool, set));
        }
        if let Some(values) = pool.singleton_values(argument) {
            if let Some(&stray) = values.iter().find(|&&v| !set.contains(v)) {
                return Resolution::Rejected(Rejection::NotAMember {
                    set: set.name().to_owned(),
                    value: stray.clone(),
                    allowed: set.unique_values().cloned().collect(),
                });
            }
            return Resolution::Type(argument);
        }
        if self.is_disjoint(pool, set, argument) {
            return Resolution::Rejected(Rejection::Disjoint {
                set: set.name().to_owned(),
                argument: pool.format_type(argument),
                allowed: set.unique_values().cloned().collect(),
            });
        }
        match self.policy {
            BroadArgumentPolicy::FullUnion => Resolution::Type(self.set_type(pool, set)),
            BroadArgumentPolicy::Reject => Resolution::Rejected(Rejection::BroadArgument {
                set: set.name().to_owned(),
                argument: pool.format_type(argument),
                allowed: set.unique_values().cloned().collect(),
            }),
        }
    }

    /// Whether no member value could have type `argument`. Only types
    /// whose values are fully known to the pool count; a class instance
    /// might be a `str` subclass and is never called disjoint.
    fn is_disjoint(&self, pool: &mut Pool, set: &LiteralSet, argument: Idx) -> bool {
        let known = pool.union_members(argument).iter().all(|&m| {
            matches!(
                pool.data(m),
                TypeData::Str
                    | TypeData::Int
                    | TypeData::Bool
                    | TypeData::Bytes
                    | TypeData::NoneType
                    | TypeData::Generic { .. }
                    | TypeData::SetObject(_)
                    | TypeData::ClassOf(_)
            )
        });
        if !known {
            return false;
        }
        let members = self.set_type(pool, set);
        !pool
            .union_members(members)
            .iter()
            .any(|&member| pool.is_assignable(member, argument))
    }
}

#[cfg(test)]
mod tests;
