use litset_ir::LiteralValue;
use pretty_assertions::assert_eq;

use crate::{Idx, Pool, TypeData, TypeFlags};

#[test]
fn primitives_have_fixed_indices() {
    let mut pool = Pool::new();
    assert_eq!(pool.intern(TypeData::Str), Idx::STR);
    assert_eq!(pool.intern(TypeData::NoneType), Idx::NONE);
    assert_eq!(pool.intern(TypeData::Never), Idx::NEVER);
    assert_eq!(pool.len(), Idx::PRIMITIVE_COUNT as usize);
    assert!(Idx::BYTES.is_primitive());
}

#[test]
fn literals_are_interned_once() {
    let mut pool = Pool::new();
    let a = pool.literal("GET".into());
    let b = pool.literal("GET".into());
    let c = pool.literal(LiteralValue::Int(1));
    let d = pool.literal(LiteralValue::Bool(true));
    assert_eq!(a, b);
    assert_ne!(c, d);
    assert_eq!(pool.literal(LiteralValue::None), Idx::NONE);
    assert!(!a.is_primitive());
}

#[test]
fn unions_are_normalized() {
    let mut pool = Pool::new();
    let get = pool.literal("GET".into());
    let post = pool.literal("POST".into());

    let inner = pool.union([get, post]);
    let outer = pool.union([inner, get, Idx::NEVER, Idx::NONE]);
    assert_eq!(pool.union_members(outer).as_slice(), &[get, post, Idx::NONE]);

    assert_eq!(pool.union([get]), get);
    assert_eq!(pool.union([get, get]), get);
    assert_eq!(pool.union([]), Idx::NEVER);
    assert_eq!(pool.union([post, get]), pool.union([post, get]));
    assert_ne!(pool.union([post, get]), inner);
    assert_eq!(pool.optional(get), pool.union([get, Idx::NONE]));
}

#[test]
fn flags_track_singleton_only_types() {
    let mut pool = Pool::new();
    let get = pool.literal("GET".into());
    let literal_union = pool.union([get, Idx::NONE]);
    let broad_union = pool.union([get, Idx::STR]);
    let with_unknown = pool.generic("list", &[Idx::UNKNOWN]);

    assert!(pool.flags(get).contains(TypeFlags::IS_LITERAL));
    assert!(pool.flags(literal_union).is_singleton_only());
    assert!(!pool.flags(broad_union).is_singleton_only());
    assert!(pool.flags(with_unknown).has_unknown());
    assert!(!pool.flags(Idx::STR).is_singleton_only());
}

#[test]
fn singleton_values_of_a_union() {
    let mut pool = Pool::new();
    let get = pool.literal("GET".into());
    let union = pool.union([get, Idx::NONE]);
    assert_eq!(
        pool.singleton_values(union),
        Some(vec![&LiteralValue::from("GET"), &LiteralValue::None])
    );
    assert_eq!(pool.singleton_values(Idx::STR), None);
    assert_eq!(pool.singleton_value(Idx::NONE), Some(&LiteralValue::None));
}

#[test]
fn formatting() {
    let mut pool = Pool::new();
    let get = pool.literal("GET".into());
    let post = pool.literal("POST".into());
    let one = pool.literal(LiteralValue::Int(1));
    let union = pool.union([get, Idx::NONE, post, one]);
    assert_eq!(pool.format_type(union), r#"Literal["GET", "POST", 1] | None"#);
    assert_eq!(pool.format_type(get), r#"Literal["GET"]"#);

    let list = pool.generic("list", &[union]);
    assert_eq!(
        pool.format_type(list),
        r#"list[Literal["GET", "POST", 1] | None]"#
    );
    let object = pool.set_object("HttpMethod");
    assert_eq!(pool.format_type(object), "type[HttpMethod]");
    let class = pool.class_of(Idx::STR);
    assert_eq!(pool.format_type(class), "type[str]");
    assert_eq!(pool.format_type(Idx::UNKNOWN), "Any");
    let bytes = pool.literal(LiteralValue::Bytes(b"x".to_vec()));
    let flag = pool.literal(LiteralValue::Bool(false));
    let mixed = pool.union([Idx::INT, bytes, flag]);
    assert_eq!(pool.format_type(mixed), r#"int | Literal[b"x", False]"#);
}

proptest::proptest! {
    #[test]
    fn union_is_flat_and_idempotent(values in proptest::collection::vec(-5i64..5, 0..12)) {
        let mut pool = Pool::new();
        let members: Vec<Idx> = values
            .iter()
            .map(|&v| pool.literal(LiteralValue::Int(v)))
            .collect();
        let union = pool.union(members.iter().copied());
        let again = pool.union([union, union]);
        proptest::prop_assert_eq!(union, again);

        let flat = pool.union_members(union);
        for (i, a) in flat.iter().enumerate() {
            proptest::prop_assert!(!matches!(pool.data(*a), TypeData::Union(_)));
            proptest::prop_assert!(!flat[i + 1..].contains(a));
        }
        for &member in &members {
            proptest::prop_assert!(pool.is_assignable(member, union));
        }
    }
}
