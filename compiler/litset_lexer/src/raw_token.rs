//! Raw Token Definition
//!
//! The logos-derived token enum, before interning, unescaping, and layout
//! processing.

use logos::Logos;

/// Whether a triple-quoted string found its closing quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Closed(pub(crate) bool);

/// Consume the rest of a triple-quoted string whose opening quotes were
/// just matched.
fn triple_quoted(lex: &mut logos::Lexer<'_, RawToken>, quote: u8) -> Closed {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == quote && rest.get(i..i + 3) == Some(&[quote; 3][..]) => {
                lex.bump(i + 3);
                return Closed(true);
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    Closed(false)
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\x0C]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"\\\r?\n")]
pub(crate) enum RawToken {
    #[token("\n")]
    Newline,

    #[token("class")]
    Class,
    #[token("def")]
    Def,
    #[token("return")]
    Return,
    #[token("pass")]
    Pass,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("in")]
    In,
    #[token("not")]
    Not,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("is")]
    Is,
    #[token("import")]
    Import,
    #[token("from")]
    From,
    #[token("as")]
    As,
    #[token("lambda")]
    Lambda,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    None,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("->")]
    Arrow,
    #[token("@")]
    At,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("~")]
    Tilde,

    #[regex(r"0[xX][0-9a-fA-F_]+")]
    HexInt,
    #[regex(r"0[oO][0-7_]+")]
    OctInt,
    #[regex(r"0[bB][01_]+")]
    BinInt,
    #[regex(r"[0-9][0-9_]*")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    Float,

    #[regex(r#"[rRbBfFuU]?[rRbBfFuU]?"([^"\\\n]|\\(.|\n))*""#)]
    #[regex(r#"[rRbBfFuU]?[rRbBfFuU]?'([^'\\\n]|\\(.|\n))*'"#)]
    Str,

    #[regex(r#"[rRbBfFuU]?[rRbBfFuU]?""""#, |lex| triple_quoted(lex, b'"'))]
    #[regex(r#"[rRbBfFuU]?[rRbBfFuU]?'''"#, |lex| triple_quoted(lex, b'\''))]
    TripleStr(Closed),

    #[regex(r#"[rRbBfFuU]?[rRbBfFuU]?"([^"\\\n]|\\(.|\n))*"#)]
    #[regex(r#"[rRbBfFuU]?[rRbBfFuU]?'([^'\\\n]|\\(.|\n))*"#)]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}
