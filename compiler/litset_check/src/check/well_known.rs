//! Names with a fixed meaning in annotations and calls.

use litset_types::Idx;

/// Builtin type written as a bare name (or last segment: `typing.Any`).
pub(super) fn builtin_type(name: &str) -> Option<Idx> {
    Some(match name {
        "str" => Idx::STR,
        "int" => Idx::INT,
        "bool" => Idx::BOOL,
        "bytes" => Idx::BYTES,
        "object" => Idx::OBJECT,
        "NoneType" => Idx::NONE,
        "Any" | "Final" | "ClassVar" => Idx::UNKNOWN,
        "NoReturn" | "Never" => Idx::NEVER,
        _ => return None,
    })
}

/// Result type of calling a builtin.
pub(super) fn builtin_call(name: &str) -> Option<Idx> {
    Some(match name {
        "str" | "repr" | "format" => Idx::STR,
        "int" | "len" | "hash" => Idx::INT,
        "bool" | "isinstance" | "issubclass" | "callable" | "hasattr" => Idx::BOOL,
        "bytes" => Idx::BYTES,
        _ => return None,
    })
}

/// `typing` spellings of builtin containers.
pub(super) fn generic_name(name: &str) -> &str {
    match name {
        "List" => "list",
        "Dict" => "dict",
        "Set" => "set",
        "FrozenSet" => "frozenset",
        "Tuple" => "tuple",
        "Type" => "type",
        other => other,
    }
}

/// `X: TypeAlias = ...`
pub(super) fn is_alias_marker(name: &str) -> bool {
    name == "TypeAlias"
}

/// Attributes of a set that are namespace operations, not members.
pub(super) const NAMESPACE_METHODS: &[&str] = &[
    "validate",
    "is_valid",
    "call",
    "construct",
    "contains",
    "names",
    "canonical_name",
    "keys",
    "values",
    "items",
    "unique_mapping",
    "name_mapping",
    "matches_values",
    "regex",
    "compiled_regex",
    "json_schema",
    "as_mapping",
];

/// Namespace operations that answer yes or no.
pub(super) fn is_predicate(name: &str) -> bool {
    matches!(name, "is_valid" | "contains" | "matches_values")
}
