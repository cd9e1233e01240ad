use litset_diagnostic::ErrorCode;
use litset_ir::{LiteralValue, Span};
use litset_sets::{DeclaredMember, ExtensionRequest, LiteralSet, SetBuilder};
use pretty_assertions::assert_eq;
use test_case::test_case;

use crate::{
    BroadArgumentPolicy, Idx, OccurrenceShape, Pool, Rejection, Resolution, ResolutionContext,
    SetLookup, Site, TypeResolver,
};

fn build(name: &str, call_to_validate: bool, members: &[(&str, LiteralValue)]) -> LiteralSet {
    SetBuilder::default()
        .build(
            ExtensionRequest::new(name)
                .call_to_validate(call_to_validate)
                .with_members(
                    members
                        .iter()
                        .map(|(n, v)| DeclaredMember::detached(*n, v.clone())),
                ),
        )
        .unwrap_or_else(|e| panic!("{e}"))
}

fn http_method(call_to_validate: bool) -> LiteralSet {
    build(
        "HttpMethod",
        call_to_validate,
        &[
            ("GET", "GET".into()),
            ("POST", "POST".into()),
            ("DELETE", "DELETE".into()),
        ],
    )
}

fn param() -> ResolutionContext {
    ResolutionContext::annotation(Site::Parameter)
}

fn ty(resolution: Resolution) -> Idx {
    match resolution {
        Resolution::Type(idx) => idx,
        other => panic!("expected a type, got {other:?}"),
    }
}

fn rejection(resolution: Resolution) -> Rejection {
    match resolution {
        Resolution::Rejected(r) => r,
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[test]
fn type_position_is_the_exhaustive_union() {
    let set = http_method(false);
    let mut pool = Pool::new();
    let resolver = TypeResolver::default();
    let union = ty(resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &param(),
        OccurrenceShape::Bare,
    ));
    assert_eq!(
        pool.format_type(union),
        r#"Literal["GET", "POST", "DELETE"]"#
    );

    let get = pool.literal("GET".into());
    let patch = pool.literal("PATCH".into());
    assert!(pool.is_assignable(get, union));
    assert!(!pool.is_assignable(patch, union));
    assert!(!pool.is_assignable(Idx::STR, union));
}

#[test]
fn member_access_is_its_singleton() {
    let set = http_method(false);
    let mut pool = Pool::new();
    let resolver = TypeResolver::default();
    let get = ty(resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Member("GET"),
    ));
    assert_eq!(get, pool.literal("GET".into()));

    let missing = rejection(resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Member("PATCH"),
    ));
    assert_eq!(missing.code(), ErrorCode::E3002);
    assert_eq!(missing.message(), "'PATCH' is not a member of HttpMethod");
}

#[test]
fn bare_value_is_the_set_object() {
    let set = http_method(false);
    let mut pool = Pool::new();
    let object = ty(TypeResolver::default().resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Bare,
    ));
    assert_eq!(pool.format_type(object), "type[HttpMethod]");
}

#[test]
fn aliases_collapse_and_single_values_degenerate() {
    let set = build(
        "One",
        false,
        &[("A", LiteralValue::Int(1)), ("B", LiteralValue::Int(1))],
    );
    let mut pool = Pool::new();
    let resolver = TypeResolver::default();
    assert_eq!(resolver.set_type(&mut pool, &set), pool.literal(LiteralValue::Int(1)));

    let empty = build("Empty", false, &[]);
    assert_eq!(resolver.set_type(&mut pool, &empty), Idx::NEVER);

    let strict = build(
        "Strict",
        false,
        &[("YES", LiteralValue::Bool(true)), ("ONE", LiteralValue::Int(1))],
    );
    let union = resolver.set_type(&mut pool, &strict);
    assert_eq!(pool.union_members(union).len(), 2);
}

#[test]
fn construct_without_call_to_validate_is_rejected() {
    let set = http_method(false);
    let mut pool = Pool::new();
    let get = pool.literal("GET".into());
    let rejected = rejection(TypeResolver::default().resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&[get]),
    ));
    assert_eq!(rejected.code(), ErrorCode::E3003);
    assert_eq!(
        rejected.message(),
        "'HttpMethod' is not callable; use HttpMethod.validate(x) or pass call_to_validate=True"
    );
}

#[test]
fn construct_narrows_member_literals() {
    let set = http_method(true);
    let mut pool = Pool::new();
    let resolver = TypeResolver::default();
    let get = pool.literal("GET".into());
    let narrowed = ty(resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&[get]),
    ));
    assert_eq!(narrowed, get);

    let patch = pool.literal("PATCH".into());
    let rejected = rejection(resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&[patch]),
    ));
    assert_eq!(
        rejected.message(),
        r#"Value "PATCH" is not a member of HttpMethod; expected one of: "GET", "POST", "DELETE""#
    );
    let diagnostic = rejected.to_diagnostic(Span::new(10, 17));
    assert_eq!(diagnostic.code, ErrorCode::E3001);
    assert_eq!(diagnostic.primary_span(), Some(Span::new(10, 17)));
}

#[test]
fn validate_ignores_call_to_validate() {
    let set = http_method(false);
    let mut pool = Pool::new();
    let post = pool.literal("POST".into());
    let delete = pool.literal("DELETE".into());
    let either = pool.union([post, delete]);
    let narrowed = ty(TypeResolver::default().resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Validate(&[either]),
    ));
    assert_eq!(narrowed, either);
}

#[test]
fn none_argument_needs_a_none_member() {
    let set = build(
        "Maybe",
        true,
        &[("A", "a".into()), ("NOTHING", LiteralValue::None)],
    );
    let mut pool = Pool::new();
    let resolver = TypeResolver::default();
    let narrowed = ty(resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&[Idx::NONE]),
    ));
    assert_eq!(narrowed, Idx::NONE);

    let http = http_method(true);
    let rejected = rejection(resolver.resolve(
        &mut pool,
        SetLookup::Built(&http),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&[Idx::NONE]),
    ));
    assert!(matches!(
        rejected,
        Rejection::NotAMember { value: LiteralValue::None, .. }
    ));
}

#[test_case(BroadArgumentPolicy::FullUnion, Idx::STR, None; "broad under full union")]
#[test_case(BroadArgumentPolicy::Reject, Idx::STR, Some(ErrorCode::E3006); "broad under reject")]
#[test_case(BroadArgumentPolicy::Reject, Idx::UNKNOWN, None; "unknown is never rejected")]
#[test_case(BroadArgumentPolicy::FullUnion, Idx::INT, Some(ErrorCode::E3001); "disjoint under full union")]
#[test_case(BroadArgumentPolicy::Reject, Idx::INT, Some(ErrorCode::E3001); "disjoint under reject")]
#[test_case(BroadArgumentPolicy::FullUnion, Idx::OBJECT, None; "object may hold a member")]
fn broad_arguments_follow_policy(
    policy: BroadArgumentPolicy,
    argument: Idx,
    expected: Option<ErrorCode>,
) {
    let set = http_method(true);
    let mut pool = Pool::new();
    let resolver = TypeResolver::new(policy);
    let full = resolver.set_type(&mut pool, &set);
    let resolution = resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&[argument]),
    );
    match expected {
        None => assert_eq!(resolution, Resolution::Type(full)),
        Some(code) => assert_eq!(rejection(resolution).code(), code),
    }
}

#[test]
fn broad_rejection_names_the_argument_type() {
    let set = http_method(true);
    let mut pool = Pool::new();
    let rejected = rejection(TypeResolver::new(BroadArgumentPolicy::Reject).resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Validate(&[Idx::STR]),
    ));
    assert_eq!(
        rejected.message(),
        r#"argument of type str is too broad for HttpMethod; expected one of: "GET", "POST", "DELETE""#
    );
}

#[test]
fn disjoint_argument_names_its_type() {
    let set = http_method(true);
    let mut pool = Pool::new();
    let rejected = rejection(TypeResolver::default().resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Validate(&[Idx::INT]),
    ));
    assert_eq!(
        rejected.message(),
        r#"argument of type int can never be a member of HttpMethod; expected one of: "GET", "POST", "DELETE""#
    );
}

#[test]
fn overlapping_union_is_not_disjoint() {
    let set = http_method(true);
    let mut pool = Pool::new();
    let argument = pool.union(vec![Idx::STR, Idx::INT]);
    let resolver = TypeResolver::default();
    let full = resolver.set_type(&mut pool, &set);
    let resolution = resolver.resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&[argument]),
    );
    assert_eq!(resolution, Resolution::Type(full));
}

#[test_case(0; "no arguments")]
#[test_case(2; "two arguments")]
fn construct_takes_one_argument(count: usize) {
    let set = http_method(true);
    let mut pool = Pool::new();
    let args = vec![Idx::STR; count];
    let rejected = rejection(TypeResolver::default().resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Construct(&args),
    ));
    assert_eq!(
        rejected,
        Rejection::Arity {
            callee: "HttpMethod".into(),
            found: count,
        }
    );
}

#[test]
fn predicate_is_bool() {
    let set = http_method(false);
    let mut pool = Pool::new();
    let resolution = TypeResolver::default().resolve(
        &mut pool,
        SetLookup::Built(&set),
        &ResolutionContext::value(),
        OccurrenceShape::Predicate,
    );
    assert_eq!(resolution, Resolution::Type(Idx::BOOL));
}

#[test]
fn pending_defers_and_unrelated_does_not_fire() {
    let mut pool = Pool::new();
    let resolver = TypeResolver::default();
    assert_eq!(
        resolver.resolve(&mut pool, SetLookup::Pending, &param(), OccurrenceShape::Bare),
        Resolution::Deferred
    );
    assert_eq!(
        resolver.resolve(&mut pool, SetLookup::NotASet, &param(), OccurrenceShape::Bare),
        Resolution::NotApplicable
    );
}
