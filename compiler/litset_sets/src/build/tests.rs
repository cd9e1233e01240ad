use std::sync::Arc;

use litset_ir::LiteralValue;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::error::DefinitionError;
use crate::member::DeclaredMember;

fn member(name: &str, value: impl Into<LiteralValue>) -> DeclaredMember {
    DeclaredMember::detached(name, value)
}

fn http_method() -> Arc<LiteralSet> {
    let request = ExtensionRequest::new("HttpMethod").with_members([
        member("GET", "GET"),
        member("POST", "POST"),
        member("DELETE", "DELETE"),
    ]);
    Arc::new(SetBuilder::default().build(request).unwrap_or_else(|e| panic!("{e}")))
}

fn names(set: &LiteralSet) -> Vec<&str> {
    set.members().iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn build_root_definition() {
    let set = http_method();
    assert_eq!(names(&set), vec!["GET", "POST", "DELETE"]);
    assert!(set.allow_aliases());
    assert!(!set.call_to_validate());
}

#[test]
fn extension_appends_after_base() {
    let request = ExtensionRequest::new("Extended")
        .with_base(http_method())
        .extending(true)
        .with_members([member("PATCH", "PATCH")]);
    let set = SetBuilder::default().build(request).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(names(&set), vec!["GET", "POST", "DELETE", "PATCH"]);
    assert_eq!(set.base(), Some("HttpMethod"));
}

#[test]
fn subclass_without_extend_is_rejected() {
    let request = ExtensionRequest::new("Sub")
        .with_base(http_method())
        .with_members([member("PATCH", "PATCH")]);
    let err = SetBuilder::default().build(request);
    assert!(matches!(
        err,
        Err(DefinitionError::ExtensionRequired { ref base, .. }) if base == "HttpMethod"
    ));
}

#[test]
fn subclass_of_empty_base_needs_no_extend() {
    let empty = Arc::new(LiteralSet::root("Marker"));
    let request = ExtensionRequest::new("Colors")
        .with_base(empty)
        .with_members([member("RED", "red")]);
    let set = SetBuilder::default().build(request).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(set.len(), 1);
}

#[test]
fn aliases_allowed_by_default() {
    let request = ExtensionRequest::new("Method")
        .with_members([member("GET", "GET"), member("get", "GET")]);
    let set = SetBuilder::default().build(request).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(set.len(), 1);
    assert_eq!(set.members().len(), 2);
}

#[test]
fn aliases_rejected_when_disallowed() {
    let request = ExtensionRequest::new("Method")
        .allow_aliases(false)
        .with_members([member("GET", "GET"), member("get", "GET")]);
    let err = SetBuilder::default().build(request);
    let Err(DefinitionError::DuplicateValue {
        alias, canonical, ..
    }) = err
    else {
        panic!("expected duplicate value, got {err:?}");
    };
    assert_eq!((alias.as_str(), canonical.as_str()), ("get", "GET"));
}

#[test]
fn new_alias_of_inherited_value_rejected() {
    let request = ExtensionRequest::new("Strict")
        .with_base(http_method())
        .extending(true)
        .allow_aliases(false)
        .with_members([member("FETCH", "GET")]);
    let err = SetBuilder::default().build(request);
    assert!(matches!(err, Err(DefinitionError::DuplicateValue { ref canonical, .. }) if canonical == "GET"));
}

#[test]
fn inherited_alias_scope_is_configurable() {
    let base = ExtensionRequest::new("Loose").with_members([member("A", 1_i64), member("B", 1_i64)]);
    let base = Arc::new(SetBuilder::default().build(base).unwrap_or_else(|e| panic!("{e}")));
    let request = || {
        ExtensionRequest::new("Strict")
            .with_base(Arc::clone(&base))
            .extending(true)
            .allow_aliases(false)
            .with_members([member("C", 2_i64)])
    };

    assert!(SetBuilder::new(AliasScope::NewMembers).build(request()).is_ok());
    let err = SetBuilder::new(AliasScope::IncludingInherited).build(request());
    assert!(matches!(err, Err(DefinitionError::DuplicateValue { ref alias, .. }) if alias == "B"));
}

#[test]
fn inherited_name_conflict() {
    let request = ExtensionRequest::new("Extended")
        .with_base(http_method())
        .extending(true)
        .with_members([member("GET", "get")]);
    let err = SetBuilder::default().build(request);
    assert!(matches!(err, Err(DefinitionError::NameConflict { ref member, .. }) if member == "GET"));
}

#[test]
fn multiple_populated_bases_rejected() {
    let other = ExtensionRequest::new("Other").with_members([member("X", "x")]);
    let other = Arc::new(SetBuilder::default().build(other).unwrap_or_else(|e| panic!("{e}")));
    let request = ExtensionRequest::new("Both")
        .with_base(http_method())
        .with_base(other)
        .extending(true);
    let err = SetBuilder::default().build(request);
    let Err(DefinitionError::MultipleBases { bases, .. }) = err else {
        panic!("expected multiple bases, got {err:?}");
    };
    assert_eq!(bases, vec!["HttpMethod".to_owned(), "Other".to_owned()]);
}

#[test]
fn empty_extra_base_is_not_a_second_base() {
    let request = ExtensionRequest::new("Both")
        .with_base(Arc::new(LiteralSet::root("Mixin")))
        .with_base(http_method())
        .extending(true)
        .with_members([member("PATCH", "PATCH")]);
    let set = SetBuilder::default().build(request).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(set.base(), Some("HttpMethod"));
    assert_eq!(set.len(), 4);
}

#[test]
fn flags_inherit_unless_explicit() {
    let base = ExtensionRequest::new("Base")
        .call_to_validate(true)
        .allow_aliases(false)
        .with_members([member("A", "a")]);
    let base = Arc::new(SetBuilder::default().build(base).unwrap_or_else(|e| panic!("{e}")));

    let inherited = ExtensionRequest::new("Inherits")
        .with_base(Arc::clone(&base))
        .extending(true);
    let inherited = SetBuilder::default().build(inherited).unwrap_or_else(|e| panic!("{e}"));
    assert!(inherited.call_to_validate());
    assert!(!inherited.allow_aliases());

    let overridden = ExtensionRequest::new("Overrides")
        .with_base(base)
        .extending(true)
        .call_to_validate(false)
        .allow_aliases(true)
        .with_members([member("B", "a")]);
    let overridden = SetBuilder::default().build(overridden).unwrap_or_else(|e| panic!("{e}"));
    assert!(!overridden.call_to_validate());
    assert_eq!(overridden.len(), 1);
}

#[test]
fn union_and_intersection() {
    let reads = ExtensionRequest::new("ReadWrite")
        .with_members([member("GET", "GET"), member("POST", "POST")]);
    let reads = SetBuilder::default().build(reads).unwrap_or_else(|e| panic!("{e}"));
    let only = ExtensionRequest::new("ReadOnly")
        .with_members([member("GET", "GET"), member("HEAD", "HEAD")]);
    let only = SetBuilder::default().build(only).unwrap_or_else(|e| panic!("{e}"));

    let builder = SetBuilder::default();
    let union = builder.union(&reads, &only);
    assert_eq!(union.name(), "ReadWrite|ReadOnly");
    assert_eq!(names(&union), vec!["GET", "POST", "HEAD"]);

    let common = builder.intersection(&reads, &only);
    assert_eq!(common.name(), "ReadWrite&ReadOnly");
    assert_eq!(names(&common), vec!["GET"]);
}

fn arb_value() -> impl Strategy<Value = LiteralValue> {
    prop_oneof![
        "[a-c]{1,2}".prop_map(LiteralValue::Str),
        (-2_i64..3).prop_map(LiteralValue::Int),
        any::<bool>().prop_map(LiteralValue::Bool),
        Just(LiteralValue::None),
    ]
}

fn arb_members(prefix: &'static str) -> impl Strategy<Value = Vec<DeclaredMember>> {
    prop::collection::vec(arb_value(), 0..8).prop_map(move |values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| member(&format!("{prefix}{i}"), v))
            .collect()
    })
}

proptest! {
    #[test]
    fn extension_preserves_base_then_own_order(
        base in arb_members("B"),
        own in arb_members("O"),
    ) {
        let built_base = SetBuilder::default()
            .build(ExtensionRequest::new("Base").with_members(base.clone()));
        let built_base = Arc::new(built_base.map_err(|e| TestCaseError::fail(e.to_string()))?);
        let set = SetBuilder::default()
            .build(
                ExtensionRequest::new("Ext")
                    .with_base(built_base)
                    .extending(true)
                    .with_members(own.clone()),
            )
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let expected: Vec<LiteralMember> =
            base.iter().chain(&own).map(|d| d.member.clone()).collect();
        prop_assert_eq!(set.members(), &expected[..]);
    }

    #[test]
    fn unique_values_have_no_duplicates(own in arb_members("M")) {
        let set = SetBuilder::default()
            .build(ExtensionRequest::new("S").with_members(own))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let first: Vec<&LiteralValue> = set.unique_values().collect();
        let second: Vec<&LiteralValue> = set.unique_values().collect();
        prop_assert_eq!(&first, &second);
        let distinct: rustc_hash::FxHashSet<&LiteralValue> = first.iter().copied().collect();
        prop_assert_eq!(distinct.len(), first.len());
    }

    #[test]
    fn disallowed_aliases_fail_iff_values_repeat(own in arb_members("M")) {
        let mut seen = rustc_hash::FxHashSet::default();
        let repeats = own.iter().any(|d| !seen.insert(d.member.value.clone()));
        let result = SetBuilder::default()
            .build(ExtensionRequest::new("S").allow_aliases(false).with_members(own));
        prop_assert_eq!(result.is_err(), repeats);
    }
}
