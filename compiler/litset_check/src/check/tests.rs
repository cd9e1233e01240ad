use litset_diagnostic::ErrorCode;
use litset_ir::{SharedInterner, Span};
use litset_types::BroadArgumentPolicy;
use pretty_assertions::assert_eq;

use crate::{check_units, CheckConfig, CheckedModule, SetCache, SourceUnit};

const HTTP: &str = "\
class HttpMethod(LiteralEnum):
    GET = \"GET\"
    POST = \"POST\"
    DELETE = \"DELETE\"

def handle(method: HttpMethod) -> None:
    pass
";

const ALL: &str = r#"Literal["GET", "POST", "DELETE"]"#;

fn check_with(source: &str, config: &CheckConfig) -> CheckedModule {
    let interner = SharedInterner::new();
    let cache = SetCache::new();
    let units = [SourceUnit::parse("app", source, &interner)];
    check_units(&units, &interner, config, &cache).remove(0)
}

fn check(source: &str) -> CheckedModule {
    check_with(source, &CheckConfig::default())
}

fn codes(module: &CheckedModule) -> Vec<ErrorCode> {
    module.diagnostics.iter().map(|d| d.code).collect()
}

fn messages(module: &CheckedModule) -> Vec<&str> {
    module.diagnostics.iter().map(|d| d.message.as_str()).collect()
}

/// Span of the last occurrence of `needle` in `source`.
fn span_of(source: &str, needle: &str) -> Span {
    let start = source.rfind(needle).unwrap();
    Span::from_range(start..start + needle.len())
}

fn type_at<'m>(module: &'m CheckedModule, source: &str, needle: &str) -> Option<&'m str> {
    module.type_at(span_of(source, needle))
}

#[test]
fn parameter_annotation_is_the_member_union() {
    let module = check(HTTP);
    assert_eq!(codes(&module), vec![]);
    let at = HTTP.find("method: HttpMethod").unwrap() + "method: ".len();
    assert_eq!(
        module.type_at(Span::from_range(at..at + "HttpMethod".len())),
        Some(ALL)
    );
}

#[test]
fn literal_and_member_arguments_are_accepted() {
    let source = format!("{HTTP}handle(\"GET\")\nhandle(HttpMethod.DELETE)\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![]);
    assert_eq!(
        type_at(&module, &source, "HttpMethod.DELETE"),
        Some(r#"Literal["DELETE"]"#)
    );
}

#[test]
fn non_member_literal_argument_is_rejected() {
    let source = format!("{HTTP}handle(\"PATCH\")\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    let diagnostic = &module.diagnostics[0];
    assert_eq!(
        diagnostic.message,
        format!(r#"Argument 1 to "handle" has incompatible type Literal["PATCH"]; expected {ALL}"#)
    );
    assert_eq!(diagnostic.primary_span(), Some(span_of(&source, "\"PATCH\"")));
    assert_eq!(diagnostic.notes, vec![r#"allowed values: "GET", "POST", "DELETE""#]);
}

#[test]
fn broad_argument_is_rejected() {
    let source = format!("{HTTP}def relay(raw: str) -> None:\n    handle(raw)\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert!(messages(&module)[0].contains("incompatible type str;"));
}

#[test]
fn keyword_arguments_are_matched_by_name() {
    let source = format!("{HTTP}handle(method=\"PUT\")\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
}

#[test]
fn optional_and_union_annotations() {
    let source = format!(
        "{HTTP}\
class Extra(LiteralEnum):
    HEAD = \"HEAD\"

def pick(a: Optional[HttpMethod] = None, b: HttpMethod | Extra = \"HEAD\") -> None:
    pass
"
    );
    let module = check(&source);
    assert_eq!(codes(&module), vec![]);
    assert_eq!(
        type_at(&module, &source, "Optional[HttpMethod]"),
        Some(r#"Literal["GET", "POST", "DELETE"] | None"#)
    );
    assert_eq!(
        type_at(&module, &source, "HttpMethod | Extra"),
        Some(r#"Literal["GET", "POST", "DELETE", "HEAD"]"#)
    );
}

#[test]
fn unknown_member_is_reported() {
    let source = format!("{HTTP}verb = HttpMethod.PATCH\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3002]);
    assert_eq!(messages(&module), vec!["'PATCH' is not a member of HttpMethod"]);
    assert_eq!(
        module.diagnostics[0].primary_span(),
        Some(span_of(&source, "HttpMethod.PATCH"))
    );
}

#[test]
fn construction_requires_call_to_validate() {
    let source = format!("{HTTP}verb = HttpMethod(\"GET\")\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3003]);
}

#[test]
fn construction_narrows_literal_arguments() {
    let source = "\
class Method(LiteralEnum, call_to_validate=True):
    GET = \"GET\"
    POST = \"POST\"

ok = Method(\"GET\")
bad = Method(\"git\")
";
    let module = check(source);
    assert_eq!(codes(&module), vec![ErrorCode::E3001]);
    assert!(messages(&module)[0].starts_with("Value \"git\" is not a member of Method"));
    assert_eq!(
        module.diagnostics[0].primary_span(),
        Some(span_of(source, "\"git\""))
    );
    assert_eq!(type_at(&module, source, "Method(\"GET\")"), Some(r#"Literal["GET"]"#));
}

#[test]
fn validate_follows_the_broad_argument_policy() {
    let source = format!("{HTTP}def parse(raw: str) -> None:\n    verb = HttpMethod.validate(raw)\n");

    let module = check(&source);
    assert_eq!(codes(&module), vec![]);
    assert_eq!(type_at(&module, &source, "HttpMethod.validate(raw)"), Some(ALL));

    let strict = CheckConfig {
        broad_arguments: BroadArgumentPolicy::Reject,
        ..CheckConfig::default()
    };
    let module = check_with(&source, &strict);
    assert_eq!(codes(&module), vec![ErrorCode::E3006]);
}

#[test]
fn argument_of_a_disjoint_type_is_rejected() {
    let source = format!("{HTTP}def parse(code: int) -> None:\n    verb = HttpMethod.validate(code)\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3001]);
    assert!(messages(&module)[0].starts_with("argument of type int can never be a member of HttpMethod"));
    assert_eq!(
        module.diagnostics[0].primary_span(),
        Some(span_of(&source, "code"))
    );
}

#[test]
fn validated_value_can_be_passed_on() {
    let source = format!(
        "{HTTP}def parse(raw: str) -> None:\n    verb = HttpMethod.validate(raw)\n    handle(verb)\n"
    );
    assert_eq!(codes(&check(&source)), vec![]);
}

#[test]
fn is_valid_is_a_predicate() {
    let source = format!("{HTTP}ok = HttpMethod.is_valid(\"x\")\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![]);
    assert_eq!(type_at(&module, &source, "HttpMethod.is_valid(\"x\")"), Some("bool"));
}

#[test]
fn isinstance_against_a_set_is_rejected() {
    let source = format!("{HTTP}flag = isinstance(\"GET\", HttpMethod)\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3004]);
    assert!(messages(&module)[0]
        .starts_with("isinstance() is not supported for LiteralEnum subclass 'HttpMethod'"));
}

#[test]
fn forward_references_resolve_after_building() {
    let source = "\
def early(m: \"Later\") -> None:
    pass

class Later(LiteralEnum):
    A = 1

early(2)
";
    let module = check(source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert_eq!(type_at(&module, source, "\"Later\""), Some("Literal[1]"));
    let inner = span_of(source, "\"Later\"");
    assert_eq!(
        module.type_at(Span::new(inner.start + 1, inner.end - 1)),
        Some("Literal[1]")
    );
}

#[test]
fn invalid_forward_reference_is_reported() {
    let source = format!("{HTTP}def odd(m: \"Http Method\") -> None:\n    pass\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E1006]);
    assert_eq!(messages(&module), vec![r#"invalid forward reference "Http Method""#]);
}

#[test]
fn defaults_returns_and_assignments_are_checked() {
    let source = format!(
        "{HTTP}\
def with_default(m: HttpMethod = \"PATCH\") -> None:
    pass

def give() -> HttpMethod:
    return \"PUT\"

current: HttpMethod = \"TRACE\"
"
    );
    let module = check(&source);
    assert_eq!(
        codes(&module),
        vec![ErrorCode::E3007, ErrorCode::E3007, ErrorCode::E3007]
    );
    let messages = messages(&module);
    assert!(messages[0].starts_with("Incompatible default for argument \"m\""));
    assert!(messages[1].starts_with("Incompatible return value type (got Literal[\"PUT\"]"));
    assert!(messages[2].starts_with("Incompatible types in assignment"));
}

#[test]
fn reassigning_an_annotated_variable_is_checked() {
    let source = format!("{HTTP}current: HttpMethod = \"GET\"\ncurrent = \"NOPE\"\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert_eq!(
        module.diagnostics[0].primary_span(),
        Some(span_of(&source, "\"NOPE\""))
    );
}

#[test]
fn iterating_a_set_yields_its_members() {
    let source = format!("{HTTP}for verb in HttpMethod:\n    handle(verb)\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![]);
    let at = source.rfind("in HttpMethod").unwrap() + 3;
    assert_eq!(
        module.type_at(Span::from_range(at..at + "HttpMethod".len())),
        Some("type[HttpMethod]")
    );
}

#[test]
fn aliases_stand_for_their_value() {
    let source = format!(
        "{HTTP}\
Verb: TypeAlias = HttpMethod
type Pair = tuple[Verb, Verb]

def act(v: Verb, p: Pair) -> None:
    pass

act(\"PATCH\", (\"GET\", \"POST\"))
"
    );
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert_eq!(
        messages(&module)[0],
        format!(r#"Argument 1 to "act" has incompatible type Literal["PATCH"]; expected {ALL}"#)
    );
}

#[test]
fn extensions_accept_base_members_but_not_the_reverse() {
    let source = format!(
        "{HTTP}\
class Wide(HttpMethod, extend=True):
    PATCH = \"PATCH\"

def wide(m: Wide) -> None:
    pass

wide(HttpMethod.GET)
handle(Wide.PATCH)
"
    );
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert_eq!(
        module.diagnostics[0].primary_span(),
        Some(span_of(&source, "Wide.PATCH"))
    );
}

#[test]
fn containers_of_sets_are_covariant() {
    let source = format!(
        "{HTTP}\
def many(ms: list[HttpMethod]) -> None:
    pass

many([\"GET\", \"POST\"])
many([\"PATCH\"])
"
    );
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert!(messages(&module)[0].contains(r#"incompatible type list[Literal["PATCH"]]"#));
}

#[test]
fn literal_annotation_accepts_set_members() {
    let source = format!("{HTTP}def only_get(m: Literal[HttpMethod.GET]) -> None:\n    pass\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![]);
    assert_eq!(
        type_at(&module, &source, "Literal[HttpMethod.GET]"),
        Some(r#"Literal["GET"]"#)
    );
}

#[test]
fn booleans_and_integers_stay_distinct() {
    let source = "\
class Flag(LiteralEnum):
    YES = True
    ONE = 1

def take(f: Flag) -> None:
    pass

take(True)
take(1)
take(False)
";
    let module = check(source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    let at = source.find("f: Flag").unwrap() + "f: ".len();
    assert_eq!(
        module.type_at(Span::from_range(at..at + "Flag".len())),
        Some("Literal[True, 1]")
    );
    assert!(messages(&module)[0].contains("incompatible type Literal[False]"));
}

#[test]
fn unrelated_classes_are_left_alone() {
    let source = "class Plain:\n    pass\n\ndef use(p: Plain) -> Plain:\n    return p\n";
    let module = check(source);
    assert_eq!(codes(&module), vec![]);
    assert!(module.occurrences.is_empty());
}

#[test]
fn failed_sets_do_not_cascade() {
    let source = format!("{HTTP}class Bad(HttpMethod):\n    X = \"X\"\n\ndef bad(m: Bad) -> None:\n    pass\n\nbad(\"X\")\n");
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E2001]);
    let at = source.find("m: Bad").unwrap() + "m: ".len();
    assert_eq!(
        module.type_at(Span::from_range(at..at + "Bad".len())),
        Some("Any")
    );
}

#[test]
fn definition_diagnostics_are_merged_in_source_order() {
    let source = "\
class Ratio(LiteralEnum):
    HALF = 0.5
    ONE = 1

x = Ratio.HALF
";
    let module = check(source);
    assert_eq!(codes(&module), vec![ErrorCode::E2004, ErrorCode::E3002]);
    assert!(module.has_errors());
    assert_eq!(module.error_count(), 2);
}

#[test]
fn sets_imported_from_other_modules() {
    let interner = SharedInterner::new();
    let cache = SetCache::new();
    let units = [
        SourceUnit::parse(
            "app.views",
            "\
from app.http import HttpMethod as Verb
import app.http as http

def view(m: Verb, n: http.HttpMethod) -> None:
    pass

view(\"GET\", http.HttpMethod.POST)
view(\"BREW\", \"GET\")
",
            &interner,
        ),
        SourceUnit::parse("app.http", HTTP, &interner),
    ];
    let modules = check_units(&units, &interner, &CheckConfig::default(), &cache);
    assert_eq!(codes(&modules[0]), vec![ErrorCode::E3007]);
    assert_eq!(codes(&modules[1]), vec![]);
    assert_eq!(modules[0].module, "app.views");
}

#[test]
fn calls_to_nested_functions_are_checked() {
    let source = format!(
        "{HTTP}\
def outer() -> None:
    def inner(m: HttpMethod) -> None:
        pass

    inner(\"GET\")
    inner(\"PATCH\")
"
    );
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert_eq!(
        messages(&module)[0],
        format!(r#"Argument 1 to "inner" has incompatible type Literal["PATCH"]; expected {ALL}"#)
    );
    assert_eq!(
        module.diagnostics[0].primary_span(),
        Some(span_of(&source, "\"PATCH\""))
    );
}

#[test]
fn nested_definitions_shadow_module_functions() {
    let source = format!(
        "{HTTP}\
def outer() -> None:
    def handle(m: str) -> None:
        pass

    handle(\"PATCH\")

handle(\"TRACE\")
"
    );
    let module = check(&source);
    assert_eq!(codes(&module), vec![ErrorCode::E3007]);
    assert_eq!(
        module.diagnostics[0].primary_span(),
        Some(span_of(&source, "\"TRACE\""))
    );
}
