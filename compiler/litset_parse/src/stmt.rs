//! Statement parsing and error recovery.

use litset_diagnostic::{Diagnostic, ErrorCode};
use litset_ir::{
    BinaryOp, ClassDef, ExprId, ExprKind, Function, ImportDef, Name, Param, ParamKind, Span,
    Stmt, StmtKind, TokenKind,
};

use crate::Parser;

impl Parser<'_> {
    pub(crate) fn parse_module(&mut self) -> Vec<Stmt> {
        let mut body = Vec::new();
        while !self.cursor.is_at_end() {
            match self.cursor.kind() {
                TokenKind::Newline | TokenKind::Dedent => {
                    self.cursor.advance();
                }
                TokenKind::Indent => {
                    self.errors.push(
                        Diagnostic::error(ErrorCode::E1005)
                            .with_message("unexpected indent")
                            .with_label(self.at(self.cursor.span()), "unexpected indent"),
                    );
                    self.skip_block();
                }
                _ => body.push(self.parse_stmt_recovering()),
            }
        }
        body
    }

    fn parse_stmt_recovering(&mut self) -> Stmt {
        let start = self.cursor.span();
        match self.parse_stmt() {
            Ok(stmt) => stmt,
            Err(diagnostic) => {
                self.errors.push(diagnostic);
                self.recover();
                Stmt::new(StmtKind::Error, self.at(start.merge(self.cursor.previous_span())))
            }
        }
    }

    /// Skip the rest of the line and any block nested under it.
    fn recover(&mut self) {
        while !matches!(
            self.cursor.kind(),
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof
        ) {
            self.cursor.advance();
        }
        if self.cursor.eat(TokenKind::Newline) && self.cursor.check(TokenKind::Indent) {
            self.skip_block();
        }
    }

    /// Skip a balanced `Indent ... Dedent` run.
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.cursor.kind() {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.cursor.advance();
                        return;
                    }
                }
                TokenKind::Eof => return,
                _ => {}
            }
            self.cursor.advance();
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.cursor.span();
        let kind = match self.cursor.kind() {
            TokenKind::At => return self.parse_decorated(),
            TokenKind::Class => StmtKind::Class(self.parse_class(Vec::new())?),
            TokenKind::Def => StmtKind::Function(self.parse_function(Vec::new())?),
            TokenKind::If => return self.parse_if(),
            TokenKind::For => self.parse_for()?,
            TokenKind::While => {
                self.cursor.advance();
                let cond = self.parse_expr()?;
                self.cursor.expect(TokenKind::Colon)?;
                let body = self.parse_block()?;
                StmtKind::While { cond, body }
            }
            _ => return self.parse_simple_stmt(),
        };
        Ok(Stmt::new(kind, self.at(start.merge(self.cursor.previous_span()))))
    }

    /// A simple statement and its terminator (`;` or end of line).
    fn parse_simple_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        let stmt = self.parse_simple_stmt_inner()?;
        self.expect_stmt_end()?;
        Ok(stmt)
    }

    fn parse_simple_stmt_inner(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.cursor.span();
        let kind = match self.cursor.kind() {
            TokenKind::Pass => {
                self.cursor.advance();
                StmtKind::Pass
            }
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.cursor.kind().can_start_expr() {
                    Some(self.parse_expr_list()?)
                } else {
                    None
                };
                StmtKind::Return(value)
            }
            TokenKind::Import => self.parse_import()?,
            TokenKind::From => self.parse_from_import()?,
            TokenKind::Ident(name) if self.is_type_alias(name) => {
                self.cursor.advance();
                let (name, name_span) = self.cursor.expect_ident()?;
                self.cursor.expect(TokenKind::Eq)?;
                let value = self.parse_expr()?;
                StmtKind::TypeAlias {
                    name,
                    name_span: self.at(name_span),
                    value,
                }
            }
            _ => self.parse_expr_stmt()?,
        };
        Ok(Stmt::new(kind, self.at(start.merge(self.cursor.previous_span()))))
    }

    /// `type Name = ...`; `type` is only a keyword in this position.
    fn is_type_alias(&self, name: Name) -> bool {
        self.interner.lookup(name) == "type"
            && matches!(self.cursor.peek(1), TokenKind::Ident(_))
            && self.cursor.peek(2) == TokenKind::Eq
    }

    fn expect_stmt_end(&mut self) -> Result<(), Diagnostic> {
        if self.cursor.eat(TokenKind::Semicolon) {
            self.cursor.eat(TokenKind::Newline);
            return Ok(());
        }
        if matches!(self.cursor.kind(), TokenKind::Eof | TokenKind::Dedent) {
            return Ok(());
        }
        self.cursor.expect(TokenKind::Newline).map(|_| ())
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtKind, Diagnostic> {
        let first = self.parse_expr_list()?;

        if self.cursor.eat(TokenKind::Colon) {
            let annotation = self.parse_expr()?;
            let value = if self.cursor.eat(TokenKind::Eq) {
                Some(self.parse_expr_list()?)
            } else {
                None
            };
            return Ok(StmtKind::AnnAssign {
                target: first,
                annotation,
                value,
            });
        }

        if let Some(op) = self.augmented_op() {
            self.cursor.advance();
            self.cursor.advance();
            let rhs = self.parse_expr_list()?;
            let span = self.arena.span(first).merge(self.arena.span(rhs));
            let value = self.arena.alloc_kind(
                ExprKind::Binary {
                    op,
                    left: first,
                    right: rhs,
                },
                span,
            );
            return Ok(StmtKind::Assign {
                targets: vec![first],
                value,
            });
        }

        if !self.cursor.eat(TokenKind::Eq) {
            return Ok(StmtKind::Expr(first));
        }
        let mut targets = vec![first];
        let mut value = self.parse_expr_list()?;
        while self.cursor.eat(TokenKind::Eq) {
            targets.push(value);
            value = self.parse_expr_list()?;
        }
        Ok(StmtKind::Assign { targets, value })
    }

    /// `x += 1` and friends, lexed as an operator followed by `=`.
    fn augmented_op(&self) -> Option<BinaryOp> {
        if self.cursor.peek(1) != TokenKind::Eq {
            return None;
        }
        Some(match self.cursor.kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Amp => BinaryOp::BitAnd,
            _ => return None,
        })
    }

    /// Body after a `:`: either simple statements on the same line or an
    /// indented block.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        if !self.cursor.check(TokenKind::Newline) {
            let mut body = vec![self.parse_simple_stmt_inner()?];
            while self.cursor.eat(TokenKind::Semicolon)
                && !matches!(self.cursor.kind(), TokenKind::Newline | TokenKind::Eof)
            {
                body.push(self.parse_simple_stmt_inner()?);
            }
            if !self.cursor.is_at_end() {
                self.cursor.expect(TokenKind::Newline)?;
            }
            return Ok(body);
        }

        self.cursor.advance();
        if !self.cursor.check(TokenKind::Indent) {
            return Err(Diagnostic::error(ErrorCode::E1005)
                .with_message("expected an indented block")
                .with_label(self.at(self.cursor.span()), "expected an indented block"));
        }
        self.cursor.advance();
        let mut body = Vec::new();
        while !matches!(self.cursor.kind(), TokenKind::Dedent | TokenKind::Eof) {
            if self.cursor.eat(TokenKind::Newline) {
                continue;
            }
            body.push(self.parse_stmt_recovering());
        }
        self.cursor.eat(TokenKind::Dedent);
        Ok(body)
    }

    fn parse_decorated(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.cursor.span();
        let mut decorators = Vec::new();
        while self.cursor.eat(TokenKind::At) {
            decorators.push(self.parse_expr()?);
            self.cursor.expect(TokenKind::Newline)?;
        }
        let kind = match self.cursor.kind() {
            TokenKind::Class => StmtKind::Class(self.parse_class(decorators)?),
            TokenKind::Def => StmtKind::Function(self.parse_function(decorators)?),
            other => {
                return Err(litset_diagnostic::unexpected_token(
                    self.cursor.span(),
                    "`class` or `def` after decorator",
                    other.display_name(),
                ))
            }
        };
        Ok(Stmt::new(kind, self.at(start.merge(self.cursor.previous_span()))))
    }

    fn parse_class(&mut self, decorators: Vec<ExprId>) -> Result<ClassDef, Diagnostic> {
        self.cursor.expect(TokenKind::Class)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        let mut bases = Vec::new();
        let mut keywords = Vec::new();
        if self.cursor.check(TokenKind::LParen) {
            let open = self.cursor.advance().span;
            for arg in self.parse_call_args(open)? {
                if arg.name.is_some() {
                    keywords.push(arg);
                } else if keywords.is_empty() {
                    bases.push(arg.value);
                } else {
                    return Err(Diagnostic::error(ErrorCode::E1001)
                        .with_message("positional base follows keyword argument")
                        .with_label(arg.span, "move this base before the keywords"));
                }
            }
        }
        self.cursor.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(ClassDef {
            name,
            name_span: self.at(name_span),
            decorators,
            bases,
            keywords,
            body,
        })
    }

    fn parse_function(&mut self, decorators: Vec<ExprId>) -> Result<Function, Diagnostic> {
        self.cursor.expect(TokenKind::Def)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        let open = self.cursor.expect(TokenKind::LParen)?;
        let params = self.parse_params(open)?;
        let returns = if self.cursor.eat(TokenKind::Arrow) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.cursor.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(Function {
            name,
            name_span: self.at(name_span),
            decorators,
            params,
            returns,
            body,
        })
    }

    fn parse_params(&mut self, open: Span) -> Result<Vec<Param>, Diagnostic> {
        let mut params = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            let kind = match self.cursor.kind() {
                TokenKind::Star => {
                    self.cursor.advance();
                    ParamKind::VarArgs
                }
                TokenKind::DoubleStar => {
                    self.cursor.advance();
                    ParamKind::KwArgs
                }
                _ => ParamKind::Regular,
            };
            // Bare `*` and `/` are markers, not parameters.
            if (kind == ParamKind::VarArgs && self.cursor.check(TokenKind::Comma))
                || self.cursor.check(TokenKind::Slash)
            {
                self.cursor.eat(TokenKind::Slash);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
                continue;
            }
            let (name, span) = self.cursor.expect_ident()?;
            let annotation = if self.cursor.eat(TokenKind::Colon) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let default = if self.cursor.eat(TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            params.push(Param {
                name,
                span: self.at(span),
                kind,
                annotation,
                default,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        if !self.cursor.eat(TokenKind::RParen) {
            return Err(litset_diagnostic::unclosed_delimiter(open, ')'));
        }
        Ok(params)
    }

    /// `if` / `elif` / `else`; an `elif` chain nests in `else_body`.
    fn parse_if(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.cursor.advance().span;
        let cond = self.parse_expr()?;
        self.cursor.expect(TokenKind::Colon)?;
        let then_body = self.parse_block()?;
        let else_body = match self.cursor.kind() {
            TokenKind::Elif => vec![self.parse_if()?],
            TokenKind::Else => {
                self.cursor.advance();
                self.cursor.expect(TokenKind::Colon)?;
                self.parse_block()?
            }
            _ => Vec::new(),
        };
        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            self.at(start.merge(self.cursor.previous_span())),
        ))
    }

    fn parse_for(&mut self) -> Result<StmtKind, Diagnostic> {
        let start = self.cursor.advance().span;
        let mut targets = Vec::new();
        loop {
            targets.push(self.parse_target()?);
            if !self.cursor.eat(TokenKind::Comma) || self.cursor.check(TokenKind::In) {
                break;
            }
        }
        let target = if targets.len() == 1 {
            targets[0]
        } else {
            let range = self.arena.alloc_list(targets);
            let span = self.at(start.merge(self.cursor.previous_span()));
            self.arena.alloc_kind(ExprKind::Tuple(range), span)
        };
        self.cursor.expect(TokenKind::In)?;
        let iter = self.parse_expr_list()?;
        self.cursor.expect(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(StmtKind::For { target, iter, body })
    }

    /// A loop target stops short of `in`, which would otherwise parse as a
    /// comparison.
    fn parse_target(&mut self) -> Result<ExprId, Diagnostic> {
        self.parse_postfix()
    }

    fn parse_dotted(&mut self) -> Result<Vec<Name>, Diagnostic> {
        let mut path = vec![self.cursor.expect_ident()?.0];
        while self.cursor.eat(TokenKind::Dot) {
            path.push(self.cursor.expect_ident()?.0);
        }
        Ok(path)
    }

    fn parse_import(&mut self) -> Result<StmtKind, Diagnostic> {
        self.cursor.expect(TokenKind::Import)?;
        let module = self.parse_dotted()?;
        let alias = if self.cursor.eat(TokenKind::As) {
            Some(self.cursor.expect_ident()?.0)
        } else {
            None
        };
        if self.cursor.check(TokenKind::Comma) {
            return Err(Diagnostic::error(ErrorCode::E1001)
                .with_message("import one module per statement")
                .with_label(self.at(self.cursor.span()), "split this import"));
        }
        Ok(StmtKind::Import(ImportDef {
            module,
            names: Vec::new(),
            alias,
        }))
    }

    fn parse_from_import(&mut self) -> Result<StmtKind, Diagnostic> {
        self.cursor.expect(TokenKind::From)?;
        // Relative imports: leading dots carry no name.
        while matches!(self.cursor.kind(), TokenKind::Dot | TokenKind::Ellipsis) {
            self.cursor.advance();
        }
        let module = if self.cursor.check_ident() {
            self.parse_dotted()?
        } else {
            Vec::new()
        };
        self.cursor.expect(TokenKind::Import)?;

        let mut names = Vec::new();
        if self.cursor.eat(TokenKind::Star) {
            return Ok(StmtKind::Import(ImportDef {
                module,
                names,
                alias: None,
            }));
        }
        let open = self.cursor.check(TokenKind::LParen).then(|| self.cursor.advance().span);
        loop {
            if open.is_some() {
                while self.cursor.eat(TokenKind::Newline) {}
                if self.cursor.check(TokenKind::RParen) {
                    break;
                }
            }
            let (name, _) = self.cursor.expect_ident()?;
            let alias = if self.cursor.eat(TokenKind::As) {
                Some(self.cursor.expect_ident()?.0)
            } else {
                None
            };
            names.push((name, alias));
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        if let Some(open) = open {
            if !self.cursor.eat(TokenKind::RParen) {
                return Err(litset_diagnostic::unclosed_delimiter(open, ')'));
            }
        }
        Ok(StmtKind::Import(ImportDef {
            module,
            names,
            alias: None,
        }))
    }
}
