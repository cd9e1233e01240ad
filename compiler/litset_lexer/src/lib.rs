//! Tokenizer for literal-set definition files.
//!
//! logos does the character-level work; this crate then interns
//! identifiers and string contents, decodes numbers, and runs a layout pass
//! that turns leading whitespace into `Indent`/`Dedent` tokens. Newlines
//! inside brackets and after a backslash are insignificant.

mod raw_token;
mod unescape;

use litset_diagnostic::{Diagnostic, ErrorCode};
use litset_ir::{Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;

use raw_token::{Closed, RawToken};

/// Lexer output: tokens plus any E0xxx diagnostics.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<Diagnostic>,
}

/// Tokenize `source`.
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    Lexer::new(source, interner).lex_all()
}

/// Lexer that interns names and string contents as it goes.
pub struct Lexer<'src, 'i> {
    source: &'src str,
    interner: &'i StringInterner,
}

/// Layout state threaded through one `lex_all` run.
struct Layout {
    indents: Vec<u32>,
    depth: u32,
    at_line_start: bool,
}

impl<'src, 'i> Lexer<'src, 'i> {
    pub fn new(source: &'src str, interner: &'i StringInterner) -> Self {
        Lexer { source, interner }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(len = self.source.len()))]
    pub fn lex_all(&self) -> LexOutput {
        let mut out = LexOutput::default();

        if u32::try_from(self.source.len()).is_err() {
            out.errors.push(
                Diagnostic::error(ErrorCode::E9001)
                    .with_message("source file exceeds 4 GiB and cannot be analyzed"),
            );
            out.tokens.push(Token::new(TokenKind::Eof, Span::DUMMY));
            return out;
        }

        let mut layout = Layout {
            indents: vec![0],
            depth: 0,
            at_line_start: true,
        };
        let mut logos = RawToken::lexer(self.source);

        while let Some(result) = logos.next() {
            let span = Span::from_range(logos.span());
            let slice = logos.slice();

            if result == Ok(RawToken::Newline) {
                if layout.depth == 0 && !layout.at_line_start {
                    out.tokens.push(Token::new(TokenKind::Newline, span));
                    layout.at_line_start = true;
                }
                continue;
            }

            if layout.at_line_start && layout.depth == 0 {
                self.indent_to(span.start, &mut layout, &mut out);
            }
            layout.at_line_start = false;

            let kind = match result {
                Ok(raw) => self.convert_token(raw, slice, span, &mut out),
                Err(()) => {
                    out.errors.push(
                        Diagnostic::error(ErrorCode::E0002)
                            .with_message(format!("invalid character {slice:?}"))
                            .with_label(span, "not valid here"),
                    );
                    TokenKind::Error
                }
            };

            match kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => layout.depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    layout.depth = layout.depth.saturating_sub(1);
                }
                _ => {}
            }
            out.tokens.push(Token::new(kind, span));
        }

        let end = Span::point(u32::try_from(self.source.len()).unwrap_or(u32::MAX));
        if !layout.at_line_start {
            out.tokens.push(Token::new(TokenKind::Newline, end));
        }
        for _ in 1..layout.indents.len() {
            out.tokens.push(Token::new(TokenKind::Dedent, end));
        }
        out.tokens.push(Token::new(TokenKind::Eof, end));

        tracing::debug!(
            tokens = out.tokens.len(),
            errors = out.errors.len(),
            "lexed source"
        );
        out
    }

    /// Emit `Indent`/`Dedent` for the first token of a logical line.
    fn indent_to(&self, token_start: u32, layout: &mut Layout, out: &mut LexOutput) {
        let column = self.indent_width(token_start);
        let point = Span::point(token_start);
        let current = layout.indents.last().copied().unwrap_or(0);

        if column > current {
            layout.indents.push(column);
            out.tokens.push(Token::new(TokenKind::Indent, point));
            return;
        }
        while layout.indents.last().is_some_and(|&top| column < top) {
            layout.indents.pop();
            out.tokens.push(Token::new(TokenKind::Dedent, point));
        }
        if layout.indents.last().copied().unwrap_or(0) != column {
            out.errors.push(
                Diagnostic::error(ErrorCode::E0004)
                    .with_message("unindent does not match any outer indentation level")
                    .with_label(point, "inconsistent dedent"),
            );
            layout.indents.push(column);
        }
    }

    /// Indentation of the line containing `offset`; tabs advance to the
    /// next multiple of 8.
    fn indent_width(&self, offset: u32) -> u32 {
        let offset = offset as usize;
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        self.source.as_bytes()[line_start..offset]
            .iter()
            .fold(0u32, |col, &b| match b {
                b'\t' => (col / 8 + 1) * 8,
                b' ' => col + 1,
                _ => col,
            })
    }

    fn convert_token(
        &self,
        raw: RawToken,
        slice: &str,
        span: Span,
        out: &mut LexOutput,
    ) -> TokenKind {
        match raw {
            RawToken::Int => self.convert_int(slice, 10, span, out),
            RawToken::HexInt => self.convert_int(&slice[2..], 16, span, out),
            RawToken::OctInt => self.convert_int(&slice[2..], 8, span, out),
            RawToken::BinInt => self.convert_int(&slice[2..], 2, span, out),
            RawToken::Float => {
                let cleaned: String = slice.chars().filter(|&c| c != '_').collect();
                if let Ok(value) = cleaned.parse::<f64>() {
                    TokenKind::Float(value.to_bits())
                } else {
                    out.errors.push(invalid_number(span, slice));
                    TokenKind::Error
                }
            }
            RawToken::Str => self.convert_str(slice, 1, span, out),
            RawToken::TripleStr(Closed(true)) => self.convert_str(slice, 3, span, out),
            RawToken::TripleStr(Closed(false)) | RawToken::UnterminatedStr => {
                out.errors.push(
                    Diagnostic::error(ErrorCode::E0001)
                        .with_message("unterminated string literal")
                        .with_label(Span::new(span.start, span.start + 1), "string starts here"),
                );
                TokenKind::Error
            }
            RawToken::Ident => TokenKind::Ident(self.interner.intern(slice)),
            RawToken::Newline => TokenKind::Newline,
            RawToken::Class => TokenKind::Class,
            RawToken::Def => TokenKind::Def,
            RawToken::Return => TokenKind::Return,
            RawToken::Pass => TokenKind::Pass,
            RawToken::If => TokenKind::If,
            RawToken::Elif => TokenKind::Elif,
            RawToken::Else => TokenKind::Else,
            RawToken::For => TokenKind::For,
            RawToken::While => TokenKind::While,
            RawToken::In => TokenKind::In,
            RawToken::Not => TokenKind::Not,
            RawToken::And => TokenKind::And,
            RawToken::Or => TokenKind::Or,
            RawToken::Is => TokenKind::Is,
            RawToken::Import => TokenKind::Import,
            RawToken::From => TokenKind::From,
            RawToken::As => TokenKind::As,
            RawToken::Lambda => TokenKind::Lambda,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::None => TokenKind::None,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::At => TokenKind::At,
            RawToken::Eq => TokenKind::Eq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::DoubleStar => TokenKind::DoubleStar,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Tilde => TokenKind::Tilde,
        }
    }

    fn convert_int(&self, digits: &str, radix: u32, span: Span, out: &mut LexOutput) -> TokenKind {
        let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
        let malformed = cleaned.is_empty()
            || digits.ends_with('_')
            || digits.contains("__")
            || (radix == 10 && cleaned.len() > 1 && cleaned.starts_with('0')
                && cleaned.bytes().any(|b| b != b'0'));
        if malformed {
            out.errors.push(invalid_number(span, &self.source[span.to_range()]));
            return TokenKind::Error;
        }
        match u64::from_str_radix(&cleaned, radix) {
            Ok(value) => TokenKind::Int(value),
            // Only overflow is possible once the digits passed the regex.
            Err(_) => TokenKind::BigInt,
        }
    }

    /// Decode a quoted literal whose quotes are `quote_len` characters wide.
    fn convert_str(&self, slice: &str, quote_len: usize, span: Span, out: &mut LexOutput) -> TokenKind {
        let prefix_len = slice.find(['"', '\'']).unwrap_or(0);
        let prefix = slice[..prefix_len].to_ascii_lowercase();
        let content_start = prefix_len + quote_len;
        let content = slice
            .get(content_start..slice.len().saturating_sub(quote_len))
            .unwrap_or("");
        let raw = prefix.contains('r');

        if prefix.contains('f') {
            return TokenKind::FString;
        }

        let escape_error = |err: unescape::EscapeError, out: &mut LexOutput| {
            let at = span.start + u32::try_from(content_start + err.offset).unwrap_or(0);
            out.errors.push(
                Diagnostic::error(ErrorCode::E0005)
                    .with_message(err.message)
                    .with_label(Span::new(at, at + 2), "invalid escape"),
            );
            TokenKind::Error
        };

        if prefix.contains('b') {
            let decoded = if raw {
                unescape::raw_bytes(content)
            } else {
                unescape::unescape_bytes(content)
            };
            return match decoded {
                Ok(bytes) => TokenKind::Bytes(out.tokens.push_blob(bytes)),
                Err(err) => escape_error(err, out),
            };
        }

        if raw {
            return TokenKind::Str(self.interner.intern(content));
        }
        match unescape::unescape_str(content) {
            Ok(text) => TokenKind::Str(self.interner.intern_owned(text)),
            Err(err) => escape_error(err, out),
        }
    }
}

fn invalid_number(span: Span, text: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0003)
        .with_message(format!("invalid number literal `{text}`"))
        .with_label(span, "invalid number")
}

#[cfg(test)]
mod tests;
