use super::*;
use pretty_assertions::assert_eq;

fn http() -> LiteralSet {
    LiteralSet::assemble(
        "HttpMethod".into(),
        None,
        true,
        false,
        vec![
            LiteralMember::new("GET", "GET"),
            LiteralMember::new("POST", "POST"),
            LiteralMember::new("get", "GET"),
            LiteralMember::new("DELETE", "DELETE"),
        ],
    )
}

#[test]
fn unique_values_collapse_aliases_in_first_seen_order() {
    let set = http();
    let values: Vec<&LiteralValue> = set.unique_values().collect();
    assert_eq!(
        values,
        vec![
            &LiteralValue::from("GET"),
            &LiteralValue::from("POST"),
            &LiteralValue::from("DELETE"),
        ]
    );
    assert_eq!(set.len(), 3);
    assert_eq!(set.members().len(), 4);
    assert!(set.has_aliases());
}

#[test]
fn canonical_member_is_first_declared() {
    let set = http();
    let get = LiteralValue::from("GET");
    assert_eq!(set.canonical_member(&get).map(|m| m.name.as_str()), Some("GET"));
    let names: Vec<&str> = set.members_for(&get).iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["GET", "get"]);
    assert_eq!(set.unique()[0].alias_count(), 1);
}

#[test]
fn lookup_by_name_and_position() {
    let set = http();
    assert_eq!(set.member("get").map(|m| &m.value), Some(&LiteralValue::from("GET")));
    assert_eq!(set.member("PATCH"), None);
    assert_eq!(set.position(&LiteralValue::from("DELETE")), Some(2));
}

#[test]
fn bool_and_int_members_stay_distinct() {
    let set = LiteralSet::assemble(
        "Flags".into(),
        None,
        true,
        false,
        vec![
            LiteralMember::new("YES", true),
            LiteralMember::new("ONE", 1_i64),
        ],
    );
    assert_eq!(set.len(), 2);
    assert!(set.contains(&LiteralValue::Bool(true)));
    assert!(set.contains(&LiteralValue::Int(1)));
    assert!(!set.has_aliases());
}

#[test]
fn display_lists_all_names() {
    let set = LiteralSet::assemble(
        "Mixed".into(),
        None,
        true,
        false,
        vec![
            LiteralMember::new("A", "a"),
            LiteralMember::new("B", 1_i64),
            LiteralMember::new("C", LiteralValue::None),
        ],
    );
    assert_eq!(set.to_string(), "<LiteralEnum 'Mixed' [A=\"a\", B=1, C=None]>");
    assert_eq!(LiteralSet::root("LiteralEnum").to_string(), "<LiteralEnum 'LiteralEnum'>");
}

#[test]
fn root_is_empty_with_default_flags() {
    let root = LiteralSet::root("LiteralEnum");
    assert!(root.is_empty());
    assert!(root.allow_aliases());
    assert!(!root.call_to_validate());
    assert_eq!(root.base(), None);
}
