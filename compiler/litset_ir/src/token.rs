//! Tokens produced by the lexer.
//!
//! Layout-sensitive: the lexer emits `Newline`, `Indent` and `Dedent` so the
//! parser never looks at whitespace.

use std::fmt;

use crate::{Name, Span};

/// A token with its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Token kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    /// Integer that fits in 64 bits (sign is a separate `Minus`).
    Int(u64),
    /// Integer literal too large for 64 bits.
    BigInt,
    /// Float stored as bits.
    Float(u64),
    /// String literal, unescaped and interned.
    Str(Name),
    /// Byte string literal, index into `TokenList::blobs`.
    Bytes(u32),
    /// Formatted string; its value is only known at run time.
    FString,

    Ident(Name),

    // Keywords
    Class,
    Def,
    Return,
    Pass,
    If,
    Elif,
    Else,
    For,
    While,
    In,
    Not,
    And,
    Or,
    Is,
    Import,
    From,
    As,
    Lambda,
    True,
    False,
    None,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Ellipsis,
    Arrow,
    At,
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Pipe,
    Amp,
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    Percent,
    Tilde,

    // Layout
    Newline,
    Indent,
    Dedent,

    /// Unlexable input; a diagnostic has already been recorded.
    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable form for "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) | TokenKind::BigInt => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::Str(_) => "string",
            TokenKind::Bytes(_) => "byte string",
            TokenKind::FString => "f-string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Class => "`class`",
            TokenKind::Def => "`def`",
            TokenKind::Return => "`return`",
            TokenKind::Pass => "`pass`",
            TokenKind::If => "`if`",
            TokenKind::Elif => "`elif`",
            TokenKind::Else => "`else`",
            TokenKind::For => "`for`",
            TokenKind::While => "`while`",
            TokenKind::In => "`in`",
            TokenKind::Not => "`not`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Is => "`is`",
            TokenKind::Import => "`import`",
            TokenKind::From => "`from`",
            TokenKind::As => "`as`",
            TokenKind::Lambda => "`lambda`",
            TokenKind::True => "`True`",
            TokenKind::False => "`False`",
            TokenKind::None => "`None`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::Arrow => "`->`",
            TokenKind::At => "`@`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Pipe => "`|`",
            TokenKind::Amp => "`&`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::DoubleStar => "`**`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Tilde => "`~`",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }

    /// Whether this token can begin an expression.
    pub fn can_start_expr(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::BigInt
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::Bytes(_)
                | TokenKind::FString
                | TokenKind::Ident(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::None
                | TokenKind::Ellipsis
                | TokenKind::Not
                | TokenKind::Lambda
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::Tilde
        )
    }
}

/// Lexer output: the token stream plus byte-string payloads.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
    blobs: Vec<Vec<u8>>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Store a byte-string payload and return its index for `TokenKind::Bytes`.
    pub fn push_blob(&mut self, bytes: Vec<u8>) -> u32 {
        let id = u32::try_from(self.blobs.len()).unwrap_or(u32::MAX);
        self.blobs.push(bytes);
        id
    }

    pub fn blob(&self, id: u32) -> &[u8] {
        self.blobs.get(id as usize).map_or(&[], Vec::as_slice)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|t| t.kind)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
