use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_every_part() {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("\"PATCH\" is not a member of HttpMethod")
        .with_label(Span::new(40, 47), "not a member")
        .with_secondary_label(Span::new(0, 10), "HttpMethod defined here")
        .with_note("allowed values: \"GET\", \"POST\", \"DELETE\"")
        .with_suggestion("use one of the allowed values");

    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(40, 47)));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn warnings_are_not_errors() {
    let diag = Diagnostic::warning(ErrorCode::E2004).with_message("float member ignored");
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn display_is_a_one_line_header() {
    let diag = Diagnostic::error(ErrorCode::E2002).with_message("duplicate value");
    assert_eq!(diag.to_string(), "error[E2002]: duplicate value");
}

#[test]
fn offset_spans_moves_all_labels() {
    let diag = Diagnostic::error(ErrorCode::E1006)
        .with_label(Span::new(0, 3), "here")
        .with_secondary_label(Span::new(4, 5), "and here")
        .offset_spans(100);
    assert_eq!(diag.labels[0].span, Span::new(100, 103));
    assert_eq!(diag.labels[1].span, Span::new(104, 105));
}

#[test]
fn helper_constructors_pick_parser_codes() {
    let span = Span::new(1, 2);
    assert_eq!(unexpected_token(span, "`:`", "`=`").code, ErrorCode::E1001);
    assert_eq!(expected_expression(span, "`)`").code, ErrorCode::E1002);
    assert_eq!(unclosed_delimiter(span, ')').code, ErrorCode::E1003);
    assert_eq!(expected_identifier(span, "integer").code, ErrorCode::E1004);
}
