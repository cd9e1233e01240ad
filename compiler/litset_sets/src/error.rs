//! Errors raised while defining and using literal sets.
//!
//! `DefinitionError` is reported to whoever wrote the definition and has a
//! `Diagnostic` form. The rest are runtime errors returned to callers of
//! `LiteralNamespace`; `ValidationError` is the expected way to reject
//! bad input and is always recoverable.

use litset_diagnostic::{Diagnostic, ErrorCode};
use litset_ir::{LiteralValue, Span};
use thiserror::Error;

use crate::render_values;

/// A literal-set definition that cannot be built.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DefinitionError {
    /// Subclassing a populated set without `extend=True`.
    #[error(
        "cannot subclass '{base}' without extend=True; it already has members \
         (use `class {set}({base}, extend=True)` to inherit them)"
    )]
    ExtensionRequired { set: String, base: String, span: Span },

    /// Same value under a second name while aliases are disallowed.
    #[error(
        "duplicate value {value} in '{set}': '{alias}' is an alias for '{canonical}' \
         (allow_aliases=False)"
    )]
    DuplicateValue {
        set: String,
        value: LiteralValue,
        alias: String,
        canonical: String,
        span: Span,
    },

    #[error("{set} may not inherit from multiple literal-set bases ({})", .bases.join(", "))]
    MultipleBases {
        set: String,
        bases: Vec<String>,
        span: Span,
    },

    /// A float-valued public attribute. Floats are never members.
    #[error("member '{set}.{member}' has value {value} (type float), not a supported literal value")]
    UnsupportedLiteral {
        set: String,
        member: String,
        value: String,
        span: Span,
    },

    #[error("member name '{set}.{member}' conflicts with inherited member '{base}.{member}'")]
    NameConflict {
        set: String,
        member: String,
        base: String,
        span: Span,
    },

    #[error("member '{set}.{member}' is defined more than once")]
    Redefined {
        set: String,
        member: String,
        span: Span,
        previous: Span,
    },

    #[error("class option `{option}` of '{set}' must be True or False")]
    InvalidOption {
        set: String,
        option: String,
        span: Span,
    },

    #[error("_ignore_ in '{set}' must be a str or a sequence of names")]
    InvalidIgnore { set: String, span: Span },

    /// The definition never became buildable (missing or cyclic base).
    #[error("definition of '{set}' could not be resolved: {reason}")]
    Unresolved {
        set: String,
        reason: String,
        span: Span,
    },
}

impl DefinitionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DefinitionError::ExtensionRequired { .. } => ErrorCode::E2001,
            DefinitionError::DuplicateValue { .. } => ErrorCode::E2002,
            DefinitionError::MultipleBases { .. } => ErrorCode::E2003,
            DefinitionError::UnsupportedLiteral { .. } => ErrorCode::E2004,
            DefinitionError::NameConflict { .. } => ErrorCode::E2005,
            DefinitionError::Redefined { .. } => ErrorCode::E2006,
            DefinitionError::Unresolved { .. } => ErrorCode::E2007,
            DefinitionError::InvalidOption { .. } => ErrorCode::E2008,
            DefinitionError::InvalidIgnore { .. } => ErrorCode::E2009,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            DefinitionError::ExtensionRequired { span, .. }
            | DefinitionError::DuplicateValue { span, .. }
            | DefinitionError::MultipleBases { span, .. }
            | DefinitionError::UnsupportedLiteral { span, .. }
            | DefinitionError::NameConflict { span, .. }
            | DefinitionError::Redefined { span, .. }
            | DefinitionError::InvalidOption { span, .. }
            | DefinitionError::InvalidIgnore { span, .. }
            | DefinitionError::Unresolved { span, .. } => *span,
        }
    }

    /// Name of the set whose definition failed.
    pub fn set_name(&self) -> &str {
        match self {
            DefinitionError::ExtensionRequired { set, .. }
            | DefinitionError::DuplicateValue { set, .. }
            | DefinitionError::MultipleBases { set, .. }
            | DefinitionError::UnsupportedLiteral { set, .. }
            | DefinitionError::NameConflict { set, .. }
            | DefinitionError::Redefined { set, .. }
            | DefinitionError::InvalidOption { set, .. }
            | DefinitionError::InvalidIgnore { set, .. }
            | DefinitionError::Unresolved { set, .. } => set,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            DefinitionError::ExtensionRequired { set, base, span } => diagnostic
                .with_label(*span, format!("'{base}' already has members"))
                .with_suggestion(format!("class {set}({base}, extend=True): ...")),
            DefinitionError::DuplicateValue {
                canonical, span, ..
            } => diagnostic
                .with_label(*span, format!("same value as '{canonical}'"))
                .with_note("pass allow_aliases=True to permit aliases"),
            DefinitionError::MultipleBases { span, .. } => diagnostic
                .with_label(*span, "more than one populated base")
                .with_note("combine the sets into one base, or extend one of them"),
            DefinitionError::UnsupportedLiteral { span, .. } => diagnostic
                .with_label(*span, "float values are not literal-set members")
                .with_note("members may be str, int, bool, bytes, or None"),
            DefinitionError::NameConflict { base, span, .. } => {
                diagnostic.with_label(*span, format!("already inherited from '{base}'"))
            }
            DefinitionError::Redefined { span, previous, .. } => diagnostic
                .with_label(*span, "redefined here")
                .with_secondary_label(*previous, "first defined here"),
            DefinitionError::InvalidOption { span, .. } => {
                diagnostic.with_label(*span, "expected `True` or `False`")
            }
            DefinitionError::InvalidIgnore { span, .. } => diagnostic
                .with_label(*span, "unsupported `_ignore_` value")
                .with_note("use a string such as \"a b\" or a list of names"),
            DefinitionError::Unresolved { span, .. } => {
                diagnostic.with_label(*span, "definition never completed")
            }
        }
    }
}

/// A candidate value that is not a member.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{value} is not a valid {set}. Valid: {}", render_values(.allowed))]
pub struct ValidationError {
    pub set: String,
    pub value: LiteralValue,
    /// Every unique value, in declaration order.
    pub allowed: Vec<LiteralValue>,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("'{name}' is not a member of {set}")]
pub struct AttributeNotFound {
    pub set: String,
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{set} is not instantiable; use {set}.validate(x) or pass call_to_validate=True")]
pub struct NotCallable {
    pub set: String,
}

/// Calling a set: either calling is off, or the value failed validation.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CallError {
    #[error(transparent)]
    NotCallable(#[from] NotCallable),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Name lookup for a value that is not in the set.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{value} is not a member of {set}")]
pub struct UnknownValue {
    pub set: String,
    pub value: LiteralValue,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("regex is only valid for string-valued sets; '{set}' has {offending}")]
pub struct NotStringValued {
    pub set: String,
    pub offending: LiteralValue,
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error(transparent)]
    NotStringValued(#[from] NotStringValued),
    #[error("generated pattern failed to compile: {0}")]
    Compile(#[from] regex::Error),
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{set} has no values to describe")]
pub struct EmptySchema {
    pub set: String,
}
