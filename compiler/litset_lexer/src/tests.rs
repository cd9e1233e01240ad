use super::*;
use litset_ir::TokenKind as T;
use test_case::test_case;

fn kinds(source: &str) -> (Vec<TokenKind>, StringInterner) {
    let interner = StringInterner::new();
    let out = lex(source, &interner);
    assert!(out.errors.is_empty(), "unexpected errors: {:?}", out.errors);
    (out.tokens.kinds().collect(), interner)
}

fn codes(source: &str) -> Vec<ErrorCode> {
    let interner = StringInterner::new();
    lex(source, &interner).errors.iter().map(|d| d.code).collect()
}

#[test]
fn class_body_gets_indent_and_dedent() {
    let (toks, interner) = kinds("class A(LiteralEnum):\n    X = 1\n");
    let a = interner.intern("A");
    let base = interner.intern("LiteralEnum");
    let x = interner.intern("X");
    assert_eq!(
        toks,
        vec![
            T::Class,
            T::Ident(a),
            T::LParen,
            T::Ident(base),
            T::RParen,
            T::Colon,
            T::Newline,
            T::Indent,
            T::Ident(x),
            T::Eq,
            T::Int(1),
            T::Newline,
            T::Dedent,
            T::Eof,
        ]
    );
}

#[test]
fn blank_and_comment_lines_do_not_change_layout() {
    let (toks, _) = kinds("class A:\n\n    # comment\n    X = 1\n\n    Y = 2\n");
    let indents = toks.iter().filter(|k| **k == T::Indent).count();
    let dedents = toks.iter().filter(|k| **k == T::Dedent).count();
    assert_eq!((indents, dedents), (1, 1));
}

#[test]
fn newlines_inside_brackets_are_ignored() {
    let (toks, _) = kinds("x = [\n    1,\n    2,\n]\n");
    assert_eq!(toks.iter().filter(|k| **k == T::Newline).count(), 1);
    assert!(!toks.contains(&T::Indent));
}

#[test]
fn backslash_continues_the_line() {
    let (toks, _) = kinds("x = 1 + \\\n    2\n");
    assert_eq!(toks.iter().filter(|k| **k == T::Newline).count(), 1);
    assert!(!toks.contains(&T::Indent));
}

#[test]
fn missing_trailing_newline_is_synthesized() {
    let (toks, _) = kinds("class A:\n    X = 1");
    assert_eq!(&toks[toks.len() - 3..], &[T::Newline, T::Dedent, T::Eof]);
}

#[test_case("42", T::Int(42) ; "decimal")]
#[test_case("1_000", T::Int(1000) ; "underscores")]
#[test_case("0xff", T::Int(255) ; "hex")]
#[test_case("0o17", T::Int(15) ; "octal")]
#[test_case("0b101", T::Int(5) ; "binary")]
#[test_case("99999999999999999999999", T::BigInt ; "overflow")]
#[test_case("1.5", T::Float(1.5f64.to_bits()) ; "float")]
#[test_case("2e3", T::Float(2000f64.to_bits()) ; "exponent")]
#[test_case("...", T::Ellipsis ; "ellipsis")]
#[test_case("f\"{x}\"", T::FString ; "fstring")]
fn single_token(source: &str, expected: TokenKind) {
    let (toks, _) = kinds(source);
    assert_eq!(toks[0], expected);
}

#[test]
fn strings_are_unescaped_and_interned() {
    let (toks, interner) = kinds(r#"a = "GET\n" + 'it\'s' + r"\d" + """multi
line""""#);
    let strings: Vec<&str> = toks
        .iter()
        .filter_map(|k| match k {
            T::Str(name) => Some(interner.lookup(*name)),
            _ => None,
        })
        .collect();
    assert_eq!(strings, vec!["GET\n", "it's", "\\d", "multi\nline"]);
}

#[test]
fn byte_strings_land_in_the_blob_table() {
    let interner = StringInterner::new();
    let out = lex(r#"b"\x00ok""#, &interner);
    let Some(T::Bytes(id)) = out.tokens.kinds().next() else {
        panic!("expected a byte string token");
    };
    assert_eq!(out.tokens.blob(id), b"\x00ok");
}

#[test]
fn keywords_versus_identifiers() {
    let (toks, interner) = kinds("None True False type match");
    assert_eq!(toks[0], T::None);
    assert_eq!(toks[1], T::True);
    assert_eq!(toks[2], T::False);
    assert_eq!(toks[3], T::Ident(interner.intern("type")));
    assert_eq!(toks[4], T::Ident(interner.intern("match")));
}

#[test_case("x = \"open\n" => vec![ErrorCode::E0001] ; "unterminated")]
#[test_case("x = \"\"\"never closed" => vec![ErrorCode::E0001] ; "unterminated triple")]
#[test_case("x = 1 $ 2" => vec![ErrorCode::E0002] ; "invalid char")]
#[test_case("x = 007" => vec![ErrorCode::E0003] ; "leading zero")]
#[test_case("x = 1__0" => vec![ErrorCode::E0003] ; "double underscore")]
#[test_case("x = \"\\xZZ\"" => vec![ErrorCode::E0005] ; "bad escape")]
#[test_case("if a:\n        x = 1\n    y = 2\n" => vec![ErrorCode::E0004] ; "bad dedent")]
fn lexer_errors(source: &str) -> Vec<ErrorCode> {
    codes(source)
}

#[test]
fn tabs_expand_to_multiples_of_eight() {
    let (toks, _) = kinds("if a:\n\tx = 1\n        y = 2\n");
    assert_eq!(toks.iter().filter(|k| **k == T::Indent).count(), 1);
}
