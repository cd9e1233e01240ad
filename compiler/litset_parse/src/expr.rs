//! Expression parsing, lowest precedence first:
//! lambda, conditional, `or`, `and`, `not`, comparisons, `|`, `&`,
//! `+`/`-`, `*`/`/`/`%`, unary, `**`, then postfix access and primaries.

use litset_diagnostic::{expected_expression, unclosed_delimiter, Diagnostic, ErrorCode};
use litset_ir::stack::ensure_sufficient_stack;
use litset_ir::{BinaryOp, CallArg, ExprId, ExprKind, Span, TokenKind, UnaryOp};

use crate::Parser;

impl Parser<'_> {
    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let span = self.at(span);
        self.arena.alloc_kind(kind, span)
    }

    /// Raw (un-offset) span from `start` to the last consumed token.
    fn since(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    /// One expression, or a tuple when commas follow (`a, b`).
    pub(crate) fn parse_expr_list(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let first = self.parse_expr()?;
        if !self.cursor.check(TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if !self.cursor.kind().can_start_expr() {
                break;
            }
            items.push(self.parse_expr()?);
        }
        let range = self.arena.alloc_list(items);
        Ok(self.alloc(ExprKind::Tuple(range), self.since(start)))
    }

    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, Diagnostic> {
        ensure_sufficient_stack(|| {
            if self.cursor.check(TokenKind::Lambda) {
                self.parse_lambda()
            } else {
                self.parse_conditional()
            }
        })
    }

    fn parse_lambda(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.advance().span;
        // Parameters are irrelevant to analysis; skip to the colon.
        while !matches!(
            self.cursor.kind(),
            TokenKind::Colon | TokenKind::Newline | TokenKind::Eof
        ) {
            self.cursor.advance();
        }
        self.cursor.expect(TokenKind::Colon)?;
        let body = self.parse_expr()?;
        Ok(self.alloc(ExprKind::Lambda { body }, self.since(start)))
    }

    fn parse_conditional(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let then_expr = self.parse_or()?;
        if !self.cursor.eat(TokenKind::If) {
            return Ok(then_expr);
        }
        let cond = self.parse_or()?;
        self.cursor.expect(TokenKind::Else)?;
        let else_expr = self.parse_expr()?;
        Ok(self.alloc(
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            self.since(start),
        ))
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, start: Span) -> ExprId {
        self.alloc(ExprKind::Binary { op, left, right }, self.since(start))
    }

    fn parse_or(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut left = self.parse_and()?;
        while self.cursor.eat(TokenKind::Or) {
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right, start);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut left = self.parse_not()?;
        while self.cursor.eat(TokenKind::And) {
            let right = self.parse_not()?;
            left = self.binary(BinaryOp::And, left, right, start);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<ExprId, Diagnostic> {
        if self.cursor.check(TokenKind::Not) {
            let start = self.cursor.advance().span;
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            return Ok(self.alloc(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                self.since(start),
            ));
        }
        self.parse_comparison()
    }

    fn comparison_op(&mut self) -> Option<BinaryOp> {
        let op = match self.cursor.kind() {
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::In => BinaryOp::In,
            TokenKind::Not if self.cursor.peek(1) == TokenKind::In => {
                self.cursor.advance();
                BinaryOp::NotIn
            }
            TokenKind::Is if self.cursor.peek(1) == TokenKind::Not => {
                self.cursor.advance();
                BinaryOp::IsNot
            }
            TokenKind::Is => BinaryOp::Is,
            _ => return None,
        };
        self.cursor.advance();
        Some(op)
    }

    fn parse_comparison(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut left = self.parse_bitor()?;
        while let Some(op) = self.comparison_op() {
            let right = self.parse_bitor()?;
            left = self.binary(op, left, right, start);
        }
        Ok(left)
    }

    fn parse_bitor(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut left = self.parse_bitand()?;
        while self.cursor.eat(TokenKind::Pipe) {
            let right = self.parse_bitand()?;
            left = self.binary(BinaryOp::BitOr, left, right, start);
        }
        Ok(left)
    }

    fn parse_bitand(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut left = self.parse_arith()?;
        while self.cursor.eat(TokenKind::Amp) {
            let right = self.parse_arith()?;
            left = self.binary(BinaryOp::BitAnd, left, right, start);
        }
        Ok(left)
    }

    fn parse_arith(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut left = self.parse_term()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            // `x += 1` is handled by the statement parser.
            if self.cursor.peek(1) == TokenKind::Eq {
                return Ok(left);
            }
            self.cursor.advance();
            let right = self.parse_term()?;
            left = self.binary(op, left, right, start);
        }
    }

    fn parse_term(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            if self.cursor.peek(1) == TokenKind::Eq {
                return Ok(left);
            }
            self.cursor.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right, start);
        }
    }

    fn parse_unary(&mut self) -> Result<ExprId, Diagnostic> {
        let op = match self.cursor.kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Tilde => UnaryOp::Invert,
            _ => return self.parse_power(),
        };
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        Ok(self.alloc(ExprKind::Unary { op, operand }, self.since(start)))
    }

    fn parse_power(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let base = self.parse_postfix()?;
        if self.cursor.eat(TokenKind::DoubleStar) {
            let exponent = self.parse_unary()?;
            return Ok(self.binary(BinaryOp::Pow, base, exponent, start));
        }
        Ok(base)
    }

    pub(crate) fn parse_postfix(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (attr, attr_span) = self.cursor.expect_ident()?;
                    let attr_span = self.at(attr_span);
                    expr = self.alloc(
                        ExprKind::Attribute {
                            receiver: expr,
                            attr,
                            attr_span,
                        },
                        self.since(start),
                    );
                }
                TokenKind::LParen => {
                    let open = self.cursor.advance().span;
                    let args = self.parse_call_args(open)?;
                    let args = self.arena.alloc_args(args);
                    expr = self.alloc(ExprKind::Call { func: expr, args }, self.since(start));
                }
                TokenKind::LBracket => {
                    let open = self.cursor.advance().span;
                    let index = self.parse_subscript_items()?;
                    self.close(TokenKind::RBracket, open, ']')?;
                    expr = self.alloc(ExprKind::Subscript { value: expr, index }, self.since(start));
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_subscript_items(&mut self) -> Result<ExprId, Diagnostic> {
        let start = self.cursor.span();
        let mut items = vec![self.parse_expr()?];
        let mut trailing_comma = false;
        while self.cursor.eat(TokenKind::Comma) {
            trailing_comma = true;
            if self.cursor.check(TokenKind::RBracket) {
                break;
            }
            trailing_comma = false;
            items.push(self.parse_expr()?);
        }
        if items.len() == 1 && !trailing_comma {
            return Ok(items[0]);
        }
        let range = self.arena.alloc_list(items);
        Ok(self.alloc(ExprKind::Tuple(range), self.since(start)))
    }

    /// Call arguments after the opening parenthesis, through the closing one.
    pub(crate) fn parse_call_args(&mut self, open: Span) -> Result<Vec<CallArg>, Diagnostic> {
        let mut args = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            let start = self.cursor.span();
            if matches!(self.cursor.kind(), TokenKind::Star | TokenKind::DoubleStar) {
                return Err(Diagnostic::error(ErrorCode::E1001)
                    .with_message("argument unpacking is not supported")
                    .with_label(start, "unpacked argument"));
            }
            let name = match (self.cursor.kind(), self.cursor.peek(1)) {
                (TokenKind::Ident(name), TokenKind::Eq) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    Some(name)
                }
                _ => None,
            };
            let value = self.parse_expr()?;
            let span = self.at(self.since(start));
            args.push(CallArg { name, value, span });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.close(TokenKind::RParen, open, ')')?;
        Ok(args)
    }

    /// Expect a closing delimiter; report the opener when it is missing.
    fn close(&mut self, kind: TokenKind, open: Span, symbol: char) -> Result<Span, Diagnostic> {
        if self.cursor.check(kind) {
            return Ok(self.cursor.advance().span);
        }
        Err(unclosed_delimiter(open, symbol).with_secondary_label(
            self.cursor.span(),
            format!("found {} instead", self.cursor.kind().display_name()),
        ))
    }

    fn parse_primary(&mut self) -> Result<ExprId, Diagnostic> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::BigInt => ExprKind::BigInt,
            TokenKind::Float(bits) => ExprKind::Float(bits),
            TokenKind::Str(_) | TokenKind::Bytes(_) | TokenKind::FString => {
                return Ok(self.parse_strings());
            }
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::None => ExprKind::None,
            TokenKind::Ellipsis => ExprKind::Ellipsis,
            TokenKind::Ident(name) => ExprKind::Name(name),
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBracket => return self.parse_list(),
            TokenKind::LBrace => return self.parse_brace(),
            other => return Err(expected_expression(token.span, other.display_name())),
        };
        self.cursor.advance();
        Ok(self.alloc(kind, token.span))
    }

    /// Adjacent string literals concatenate, as do adjacent byte strings.
    /// Any f-string in the run makes the whole run an f-string.
    fn parse_strings(&mut self) -> ExprId {
        let start = self.cursor.span();
        let mut text = String::new();
        let mut bytes: Vec<u8> = Vec::new();
        let (mut saw_str, mut saw_bytes, mut saw_fstring) = (false, false, false);
        loop {
            match self.cursor.kind() {
                TokenKind::Str(name) => {
                    saw_str = true;
                    text.push_str(self.interner.lookup(name));
                }
                TokenKind::Bytes(blob) => {
                    saw_bytes = true;
                    bytes.extend_from_slice(self.tokens.blob(blob));
                }
                TokenKind::FString => saw_fstring = true,
                _ => break,
            }
            self.cursor.advance();
        }
        let span = self.since(start);
        let kind = if saw_fstring {
            ExprKind::FString
        } else if saw_bytes && saw_str {
            // Mixing the two is a runtime error; nothing static survives.
            ExprKind::Error
        } else if saw_bytes {
            ExprKind::Bytes(self.arena.alloc_bytes(bytes))
        } else {
            ExprKind::Str(self.interner.intern_owned(text))
        };
        if kind == ExprKind::Error {
            self.errors.push(
                Diagnostic::error(ErrorCode::E1001)
                    .with_message("cannot mix bytes and non-bytes literals")
                    .with_label(self.at(span), "mixed literal"),
            );
        }
        self.alloc(kind, span)
    }

    fn parse_paren(&mut self) -> Result<ExprId, Diagnostic> {
        let open = self.cursor.advance().span;
        if self.cursor.check(TokenKind::RParen) {
            self.cursor.advance();
            let range = self.arena.alloc_list([]);
            return Ok(self.alloc(ExprKind::Tuple(range), self.since(open)));
        }
        let first = self.parse_expr()?;
        if !self.cursor.check(TokenKind::Comma) {
            self.close(TokenKind::RParen, open, ')')?;
            return Ok(first);
        }
        let mut items = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if self.cursor.check(TokenKind::RParen) {
                break;
            }
            items.push(self.parse_expr()?);
        }
        self.close(TokenKind::RParen, open, ')')?;
        let range = self.arena.alloc_list(items);
        Ok(self.alloc(ExprKind::Tuple(range), self.since(open)))
    }

    fn parse_list(&mut self) -> Result<ExprId, Diagnostic> {
        let open = self.cursor.advance().span;
        let mut items = Vec::new();
        while !self.cursor.check(TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.close(TokenKind::RBracket, open, ']')?;
        let range = self.arena.alloc_list(items);
        Ok(self.alloc(ExprKind::List(range), self.since(open)))
    }

    fn parse_brace(&mut self) -> Result<ExprId, Diagnostic> {
        let open = self.cursor.advance().span;
        if self.cursor.check(TokenKind::RBrace) {
            self.cursor.advance();
            let range = self.arena.alloc_list([]);
            return Ok(self.alloc(ExprKind::Dict(range), self.since(open)));
        }
        let first = self.parse_expr()?;
        let is_dict = self.cursor.eat(TokenKind::Colon);
        let mut items = vec![first];
        if is_dict {
            items.push(self.parse_expr()?);
        }
        while self.cursor.eat(TokenKind::Comma) {
            if self.cursor.check(TokenKind::RBrace) {
                break;
            }
            items.push(self.parse_expr()?);
            if is_dict {
                self.cursor.expect(TokenKind::Colon)?;
                items.push(self.parse_expr()?);
            }
        }
        self.close(TokenKind::RBrace, open, '}')?;
        let range = self.arena.alloc_list(items);
        let kind = if is_dict {
            ExprKind::Dict(range)
        } else {
            ExprKind::Set(range)
        };
        Ok(self.alloc(kind, self.since(open)))
    }
}
