use litset_ir::{ClassDef, LiteralValue, StmtKind, StringInterner};
use litset_parse::{parse_source, ParseOutput};
use pretty_assertions::assert_eq;
use test_case::test_case;

use super::*;

fn parse(source: &str, interner: &StringInterner) -> ParseOutput {
    let output = parse_source(source, interner);
    assert!(output.errors.is_empty(), "Parse errors: {:?}", output.errors);
    output
}

fn first_class(output: &ParseOutput) -> &ClassDef {
    output
        .module
        .body
        .iter()
        .find_map(|s| match &s.kind {
            StmtKind::Class(class) => Some(class),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no class in module"))
}

fn extract(source: &str) -> (Vec<(String, LiteralValue)>, Extraction) {
    let interner = StringInterner::new();
    let output = parse(source, &interner);
    let extraction = MemberExtractor::new(&output.arena, &interner).extract(first_class(&output));
    let members = extraction
        .members
        .iter()
        .map(|d| (d.member.name.clone(), d.member.value.clone()))
        .collect();
    (members, extraction)
}

#[test]
fn members_in_declaration_order() {
    let (members, extraction) = extract(
        "class HttpMethod(LiteralEnum):\n    GET = \"GET\"\n    POST = \"POST\"\n    DELETE = \"DELETE\"\n",
    );
    assert_eq!(
        members,
        vec![
            ("GET".into(), "GET".into()),
            ("POST".into(), "POST".into()),
            ("DELETE".into(), "DELETE".into()),
        ]
    );
    assert!(extraction.errors.is_empty());
}

#[test_case("X = 'a'", LiteralValue::from("a") ; "string")]
#[test_case("X = b'\\x01'", LiteralValue::Bytes(vec![1]) ; "bytes")]
#[test_case("X = 0x10", LiteralValue::Int(16) ; "hex int")]
#[test_case("X = -5", LiteralValue::Int(-5) ; "negative int")]
#[test_case("X = -9223372036854775808", LiteralValue::Int(i64::MIN) ; "min int")]
#[test_case("X = True", LiteralValue::Bool(true) ; "bool")]
#[test_case("X = None", LiteralValue::None ; "none")]
#[test_case("X: str = 'typed'", LiteralValue::from("typed") ; "annotated")]
fn literal_kinds(line: &str, expected: LiteralValue) {
    let (members, _) = extract(&format!("class S(LiteralEnum):\n    {line}\n"));
    assert_eq!(members, vec![("X".to_owned(), expected)]);
}

#[test_case("X = some_call()" ; "call")]
#[test_case("X = OTHER" ; "name")]
#[test_case("X = [1, 2]" ; "list")]
#[test_case("X = f'{y}'" ; "fstring")]
#[test_case("X = lambda: 1" ; "lambda")]
#[test_case("X = 9223372036854775808" ; "out of range")]
#[test_case("X = 1 + 2" ; "arithmetic")]
#[test_case("_private = 'p'" ; "private")]
#[test_case("def method(self): pass" ; "function")]
#[test_case("@property\n    def prop(self): return 1" ; "decorated")]
#[test_case("class Nested: pass" ; "nested class")]
fn non_members_are_skipped_silently(line: &str) {
    let (members, extraction) = extract(&format!("class S(LiteralEnum):\n    {line}\n    KEEP = 1\n"));
    assert_eq!(members, vec![("KEEP".to_owned(), LiteralValue::Int(1))]);
    assert!(extraction.errors.is_empty(), "{:?}", extraction.errors);
}

#[test]
fn float_is_excluded_and_reported() {
    let (members, extraction) = extract("class S(LiteralEnum):\n    A = 1\n    HALF = 1.5\n    B = 2\n");
    assert_eq!(
        members,
        vec![("A".to_owned(), LiteralValue::Int(1)), ("B".to_owned(), LiteralValue::Int(2))]
    );
    let [DefinitionError::UnsupportedLiteral { member, value, .. }] = &extraction.errors[..] else {
        panic!("expected one unsupported literal, got {:?}", extraction.errors);
    };
    assert_eq!((member.as_str(), value.as_str()), ("HALF", "1.5"));
}

#[test]
fn chained_assignment_binds_both_names() {
    let (members, _) = extract("class S(LiteralEnum):\n    A = B = 'x'\n");
    let names: Vec<&str> = members.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test_case("_ignore_ = 'TMP OTHER'" ; "space separated")]
#[test_case("_ignore_ = 'TMP, OTHER'" ; "comma separated")]
#[test_case("_ignore_ = ['TMP', 'OTHER']" ; "list")]
#[test_case("_ignore_ = ('TMP', 'OTHER')" ; "tuple")]
fn ignore_directive(line: &str) {
    let (members, extraction) = extract(&format!(
        "class S(LiteralEnum):\n    {line}\n    TMP = 1\n    OTHER = 2\n    KEEP = 3\n"
    ));
    assert_eq!(members, vec![("KEEP".to_owned(), LiteralValue::Int(3))]);
    assert_eq!(extraction.ignored, vec!["OTHER".to_owned(), "TMP".to_owned()]);
}

#[test]
fn invalid_ignore_directive() {
    let (_, extraction) = extract("class S(LiteralEnum):\n    _ignore_ = 5\n    A = 1\n");
    assert!(matches!(
        extraction.errors[..],
        [DefinitionError::InvalidIgnore { .. }]
    ));
}

#[test]
fn redefinition_is_reported_and_first_binding_kept() {
    let (members, extraction) = extract("class S(LiteralEnum):\n    A = 1\n    A = 2\n");
    assert_eq!(members, vec![("A".to_owned(), LiteralValue::Int(1))]);
    assert!(matches!(
        extraction.errors[..],
        [DefinitionError::Redefined { .. }]
    ));
}

#[test]
fn class_options() {
    let (_, extraction) = extract(
        "class S(Base, extend=True, allow_aliases=False, call_to_validate=True, metaclass=M):\n    A = 1\n",
    );
    assert_eq!(
        extraction.options,
        ClassOptions {
            extend: true,
            allow_aliases: Some(false),
            call_to_validate: Some(true),
        }
    );
    assert!(extraction.errors.is_empty());
}

#[test]
fn non_boolean_option_is_reported() {
    let (_, extraction) = extract("class S(LiteralEnum, extend=1):\n    A = 1\n");
    assert!(matches!(
        &extraction.errors[..],
        [DefinitionError::InvalidOption { option, .. }] if option == "extend"
    ));
    assert!(!extraction.options.extend);
}

#[test]
fn into_request_carries_options() {
    let (_, extraction) = extract("class S(LiteralEnum, call_to_validate=True):\n    A = 1\n");
    let request = extraction.into_request("S", Span::DUMMY);
    assert_eq!(request.call_to_validate, Some(true));
    assert_eq!(request.allow_aliases, None);
    assert_eq!(request.own_members.len(), 1);
}

#[test]
fn candidates_include_private_and_computed() {
    let interner = StringInterner::new();
    let output = parse("class S:\n    _x = 1\n    Y = f()\n    Z: int\n", &interner);
    let candidates = extract_candidates(&output.arena, first_class(&output));
    let names: Vec<&str> = candidates.iter().map(|c| interner.lookup(c.name)).collect();
    assert_eq!(names, vec!["_x", "Y"]);
}
