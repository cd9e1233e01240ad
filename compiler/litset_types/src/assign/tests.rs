use litset_ir::LiteralValue;
use test_case::test_case;

use crate::{Idx, Pool};

/// `Literal["GET", "POST", "DELETE"]`
fn http(pool: &mut Pool) -> Idx {
    let members = ["GET", "POST", "DELETE"].map(|m| pool.literal(m.into()));
    pool.union(members)
}

#[test]
fn union_accepts_its_members_and_raw_literals() {
    let mut pool = Pool::new();
    let union = http(&mut pool);
    let get = pool.literal("GET".into());
    let patch = pool.literal("PATCH".into());
    let post = pool.literal("POST".into());
    let narrowed = pool.union([get, post]);

    assert!(pool.is_assignable(get, union));
    assert!(pool.is_assignable(narrowed, union));
    assert!(pool.is_assignable(union, union));
    assert!(!pool.is_assignable(patch, union));
    assert!(!pool.is_assignable(Idx::STR, union));
    assert!(pool.is_assignable(union, Idx::STR));
    assert!(!pool.is_assignable(union, get));
}

#[test]
fn extension_is_a_superset() {
    let mut pool = Pool::new();
    let base = http(&mut pool);
    let patch = pool.literal("PATCH".into());
    let extended = pool.union([base, patch]);
    assert!(pool.is_assignable(base, extended));
    assert!(!pool.is_assignable(extended, base));
}

#[test_case(LiteralValue::Bool(true), Idx::BOOL, true; "bool literal to bool")]
#[test_case(LiteralValue::Bool(true), Idx::INT, true; "bool literal to int")]
#[test_case(LiteralValue::Int(1), Idx::BOOL, false; "int literal to bool")]
#[test_case(LiteralValue::Bytes(vec![1]), Idx::STR, false; "bytes literal to str")]
#[test_case(LiteralValue::None, Idx::NONE, true; "none to none")]
#[test_case(LiteralValue::Str("a".into()), Idx::OBJECT, true; "anything to object")]
#[test_case(LiteralValue::Str("a".into()), Idx::UNKNOWN, true; "anything to unknown")]
fn literal_to_broad(value: LiteralValue, target: Idx, expected: bool) {
    let mut pool = Pool::new();
    let source = pool.literal(value);
    assert_eq!(pool.is_assignable(source, target), expected);
}

#[test]
fn bool_and_int_literals_stay_distinct() {
    let mut pool = Pool::new();
    let one = pool.literal(LiteralValue::Int(1));
    let yes = pool.literal(LiteralValue::Bool(true));
    assert!(!pool.is_assignable(yes, one));
    assert!(!pool.is_assignable(one, yes));
}

#[test]
fn optional_and_containers() {
    let mut pool = Pool::new();
    let union = http(&mut pool);
    let optional = pool.optional(union);
    let get = pool.literal("GET".into());
    assert!(pool.is_assignable(Idx::NONE, optional));
    assert!(pool.is_assignable(get, optional));
    assert!(!pool.is_assignable(optional, union));

    let of_get = pool.generic("list", &[get]);
    let of_union = pool.generic("list", &[union]);
    let of_str = pool.generic("list", &[Idx::STR]);
    let dict = pool.generic("dict", &[Idx::STR, union]);
    assert!(pool.is_assignable(of_get, of_union));
    assert!(!pool.is_assignable(of_str, of_union));
    assert!(!pool.is_assignable(of_union, dict));
}

#[test]
fn unknown_and_never_are_permissive() {
    let mut pool = Pool::new();
    let union = http(&mut pool);
    assert!(pool.is_assignable(Idx::UNKNOWN, union));
    assert!(pool.is_assignable(Idx::NEVER, union));
    assert!(!pool.is_assignable(Idx::OBJECT, union));
}

#[test]
fn set_objects_are_not_values() {
    let mut pool = Pool::new();
    let union = http(&mut pool);
    let object = pool.set_object("HttpMethod");
    let other = pool.set_object("Other");
    assert!(!pool.is_assignable(object, union));
    assert!(pool.is_assignable(object, object));
    assert!(!pool.is_assignable(object, other));
}
