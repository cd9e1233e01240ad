use litset_ir::{ExprArena, ExprId, StmtKind, StringInterner};
use litset_parse::{parse_expression_into, parse_source, ParseOutput};
use pretty_assertions::assert_eq;
use test_case::test_case;

use crate::{Classified, ContextClassifier, Position, Role, Site, Wrapper};

use crate::Position::{Type, Value};

fn parse(source: &str, interner: &StringInterner) -> ParseOutput {
    let output = parse_source(source, interner);
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    output
}

/// `(dotted path, position, nesting)` for every occurrence; deferred
/// references are rendered as `"text"`.
fn describe(
    arena: &ExprArena,
    interner: &StringInterner,
    found: &[Classified],
) -> Vec<(String, Position, Vec<Wrapper>)> {
    found
        .iter()
        .map(|c| match c {
            Classified::Occurrence(o) => {
                let path = arena
                    .dotted_path(o.expr)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|n| interner.lookup(n))
                    .collect::<Vec<_>>()
                    .join(".");
                (path, o.context.position, o.context.nesting.to_vec())
            }
            Classified::Deferred(r) => (
                format!("\"{}\"", interner.lookup(r.text)),
                Type,
                r.nesting.to_vec(),
            ),
        })
        .collect()
}

fn function_annotations(output: &ParseOutput) -> (Vec<ExprId>, Option<ExprId>) {
    let StmtKind::Function(function) = &output.module.body[0].kind else {
        panic!("expected a function");
    };
    let params = function.params.iter().filter_map(|p| p.annotation).collect();
    (params, function.returns)
}

fn expression(output: &ParseOutput, index: usize) -> ExprId {
    match &output.module.body[index].kind {
        StmtKind::Expr(e) => *e,
        StmtKind::Assign { value, .. } => *value,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test_case(Site::Parameter, Type; "parameter")]
#[test_case(Site::Return, Type; "return")]
#[test_case(Site::Variable, Type; "variable")]
#[test_case(Site::TypeAlias, Type; "type alias")]
#[test_case(Site::Cast, Type; "cast target")]
#[test_case(Site::Expression, Value; "expression")]
fn site_verdicts(site: Site, expected: Position) {
    assert_eq!(ContextClassifier::classify(site), expected);
}

#[test]
fn parameters_and_return() {
    let interner = StringInterner::new();
    let output = parse(
        "def f(m: HttpMethod, o: Optional[HttpMethod] = None) -> list[HttpMethod]: ...\n",
        &interner,
    );
    let classifier = ContextClassifier::new(&output.arena, &interner);
    let (params, returns) = function_annotations(&output);

    let mut found = Vec::new();
    for param in params {
        found.extend(classifier.annotation(param, Site::Parameter));
    }
    found.extend(classifier.annotation(returns.unwrap_or_else(|| panic!("no return")), Site::Return));

    assert_eq!(
        describe(&output.arena, &interner, &found),
        vec![
            ("HttpMethod".into(), Type, vec![]),
            ("HttpMethod".into(), Type, vec![Wrapper::Optional]),
            ("list".into(), Type, vec![]),
            ("HttpMethod".into(), Type, vec![Wrapper::Container]),
        ]
    );
    let sites: Vec<Site> = found
        .iter()
        .filter_map(Classified::as_occurrence)
        .map(|o| o.context.site)
        .collect();
    assert_eq!(
        sites,
        vec![Site::Parameter, Site::Parameter, Site::Return, Site::Return]
    );
}

#[test]
fn nested_wrappers_propagate() {
    let interner = StringInterner::new();
    let output = parse(
        "x: Final[Union[A, typing.Optional[B | C]]] = A.GET\n",
        &interner,
    );
    let StmtKind::AnnAssign {
        annotation, value, ..
    } = &output.module.body[0].kind
    else {
        panic!("expected an annotated assignment");
    };
    let classifier = ContextClassifier::new(&output.arena, &interner);

    let found = classifier.annotation(*annotation, Site::Variable);
    use Wrapper::{Optional, Qualifier, Union};
    assert_eq!(
        describe(&output.arena, &interner, &found),
        vec![
            ("A".into(), Type, vec![Qualifier, Union]),
            ("B".into(), Type, vec![Qualifier, Union, Optional, Union]),
            ("C".into(), Type, vec![Qualifier, Union, Optional, Union]),
        ]
    );

    let value = value.unwrap_or_else(|| panic!("no value"));
    let found = classifier.expression(value);
    assert_eq!(
        describe(&output.arena, &interner, &found),
        vec![("A.GET".into(), Value, vec![])]
    );
}

#[test]
fn literal_arguments_and_metadata() {
    let interner = StringInterner::new();
    let output = parse(
        "def f(a: Literal[\"x\", \"y\"], b: Annotated[HttpMethod, Doc(\"m\")], c: type[S]): ...\n",
        &interner,
    );
    let classifier = ContextClassifier::new(&output.arena, &interner);
    let (params, _) = function_annotations(&output);
    let found: Vec<Classified> = params
        .into_iter()
        .flat_map(|p| classifier.annotation(p, Site::Parameter))
        .collect();

    assert_eq!(
        describe(&output.arena, &interner, &found),
        vec![
            ("HttpMethod".into(), Type, vec![Wrapper::Annotated]),
            ("Doc".into(), Value, vec![]),
            ("S".into(), Type, vec![Wrapper::ClassOf]),
        ]
    );
    let doc = found[1].as_occurrence().unwrap_or_else(|| panic!("deferred"));
    assert!(matches!(doc.role, Role::Callee { .. }));
}

#[test]
fn forward_references_are_deferred_then_reclassified() {
    let interner = StringInterner::new();
    let source = "def f(m: Optional[\"HttpMethod\"]): ...\n";
    let mut output = parse(source, &interner);
    let (params, _) = function_annotations(&output);

    let found = ContextClassifier::new(&output.arena, &interner).annotation(params[0], Site::Parameter);
    let [Classified::Deferred(reference)] = &found[..] else {
        panic!("expected one deferred reference, got {found:?}");
    };
    assert_eq!(interner.lookup(reference.text), "HttpMethod");
    assert_eq!(reference.nesting.as_slice(), &[Wrapper::Optional]);
    assert_eq!(&source[reference.span.to_range()], "\"HttpMethod\"");

    let parsed = parse_expression_into(
        interner.lookup(reference.text),
        reference.span.start + 1,
        &interner,
        &mut output.arena,
    )
    .unwrap_or_else(|e| panic!("{e:?}"));
    let found = ContextClassifier::new(&output.arena, &interner).forward_ref(reference, parsed);
    assert_eq!(
        describe(&output.arena, &interner, &found),
        vec![("HttpMethod".into(), Type, vec![Wrapper::Optional])]
    );
    let occurrence = found[0].as_occurrence().unwrap_or_else(|| panic!("deferred"));
    assert_eq!(&source[occurrence.span.to_range()], "HttpMethod");
    assert_eq!(occurrence.context.site, Site::Parameter);
}

#[test]
fn runtime_expressions() {
    let interner = StringInterner::new();
    let output = parse(
        concat!(
            "HttpMethod(\"GET\")\n",
            "isinstance(x, (HttpMethod, int))\n",
            "y = cast(Optional[HttpMethod], raw)\n",
        ),
        &interner,
    );
    let classifier = ContextClassifier::new(&output.arena, &interner);

    let construct = classifier.expression(expression(&output, 0));
    let [Classified::Occurrence(callee)] = &construct[..] else {
        panic!("expected one occurrence");
    };
    assert!(matches!(callee.role, Role::Callee { .. }));
    assert_eq!(callee.context.position, Value);

    let check = classifier.expression(expression(&output, 1));
    let roles: Vec<Role> = check
        .iter()
        .filter_map(Classified::as_occurrence)
        .map(|o| o.role)
        .collect();
    let call = expression(&output, 1);
    assert_eq!(
        roles,
        vec![
            Role::Plain,
            Role::InstanceCheck { call },
            Role::InstanceCheck { call },
        ]
    );

    let cast = classifier.expression(expression(&output, 2));
    assert_eq!(
        describe(&output.arena, &interner, &cast),
        vec![
            ("HttpMethod".into(), Type, vec![Wrapper::Optional]),
            ("raw".into(), Value, vec![]),
        ]
    );
}
