pub mod ast;

use crate::diagnostics::Error;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

/// Rewrite an import path as written to the candidate file the resolver
/// probes first. Bare names live in the bundled standard library tree.
pub fn rewrite_import_path(raw: &str) -> String {
    if !raw.contains('/') {
        let base = raw.strip_suffix(".bn").unwrap_or(raw);
        format!("src/lib/std/{base}.bn")
    } else if raw.ends_with(".bn") {
        raw.to_string()
    } else {
        format!("{raw}.bn")
    }
}

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
    restrict_struct_lit: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0, restrict_struct_lit: false }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_is(&self, tok: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(tok))
    }

    fn advance(&mut self) -> Option<&Spanned<Token>> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<&Spanned<Token>, Error> {
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(&self.tokens[self.pos - 1])
            }
            Some(tok) => Err(Error::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(Error::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, Error> {
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                self.pos += 1;
                Ok(Spanned::new(name, tok.span))
            }
            Some(tok) => Err(Error::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(Error::syntax("expected identifier, found end of file", self.eof_span())),
        }
    }

    fn eof_span(&self) -> Span {
        match self.tokens.last() {
            Some(last) => Span::new(last.span.end, last.span.end),
            None => Span::dummy(),
        }
    }

    fn consume_semicolons(&mut self) {
        while self.peek_is(&Token::Semicolon) {
            self.advance();
        }
    }

    /// Optional statement terminator: at most one `;`.
    fn consume_semicolon(&mut self) {
        if self.peek_is(&Token::Semicolon) {
            self.advance();
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let mut decls = Vec::new();
        self.consume_semicolons();
        while self.peek().is_some() {
            decls.push(self.parse_declaration()?);
            self.consume_semicolons();
        }
        Ok(Program { decls })
    }

    pub fn parse_declaration(&mut self) -> Result<Spanned<Decl>, Error> {
        let tok = self
            .peek()
            .ok_or_else(|| Error::syntax("unexpected end of file", self.eof_span()))?;
        match &tok.node {
            Token::Import => self.parse_import(),
            Token::Type | Token::Def => self.parse_typedef(),
            Token::Class => self.parse_class(),
            Token::Fun => {
                let start = tok.span.start;
                self.advance();
                let func = self.parse_function_rest()?;
                let end = func.body.span.end;
                Ok(Spanned::new(Decl::Function(func), Span::new(start, end)))
            }
            Token::Var => self.parse_var(false),
            Token::Const => self.parse_var(true),
            _ => {
                let stmt = self.parse_statement()?;
                let span = stmt.span;
                Ok(Spanned::new(Decl::Stmt(stmt.node), span))
            }
        }
    }

    fn parse_import(&mut self) -> Result<Spanned<Decl>, Error> {
        let start = self.expect(&Token::Import)?.span.start;
        let mut paths = Vec::new();

        if self.peek_is(&Token::LParen) {
            self.advance();
            while !self.peek_is(&Token::RParen) {
                paths.push(self.parse_import_path()?);
            }
            let close = self.expect(&Token::RParen)?;
            let end = close.span.end;
            self.consume_semicolon();
            return Ok(Spanned::new(Decl::Import(paths), Span::new(start, end)));
        }

        let path = self.parse_import_path()?;
        let end = path.span.end;
        paths.push(path);
        self.consume_semicolon();
        Ok(Spanned::new(Decl::Import(paths), Span::new(start, end)))
    }

    fn parse_import_path(&mut self) -> Result<Spanned<ImportPath>, Error> {
        let tok = self.expect(&Token::StringLit(String::new()))?;
        let Token::StringLit(raw) = &tok.node else { unreachable!() };
        let import = ImportPath { raw: raw.clone(), path: rewrite_import_path(raw) };
        Ok(Spanned::new(import, tok.span))
    }

    fn parse_typedef(&mut self) -> Result<Spanned<Decl>, Error> {
        // `type` and `def` are interchangeable
        let start = self.advance().unwrap().span.start;
        let name = self.expect_ident()?;
        self.expect(&Token::LBrace)?;

        let mut fields = Vec::new();
        while !self.peek_is(&Token::RBrace) {
            if !fields.is_empty() {
                self.expect(&Token::Comma)?;
                if self.peek_is(&Token::RBrace) {
                    break;
                }
            }
            let fname = self.expect_ident()?;
            self.expect(&Token::Colon)?;
            let fty = self.parse_type()?;
            fields.push(TypeField { name: fname, ty: fty });
        }
        let close = self.expect(&Token::RBrace)?;
        let end = close.span.end;

        Ok(Spanned::new(
            Decl::TypeDef(TypeDef { name, fields }),
            Span::new(start, end),
        ))
    }

    fn parse_class(&mut self) -> Result<Spanned<Decl>, Error> {
        let start = self.expect(&Token::Class)?.span.start;
        let name = self.expect_ident()?;
        self.expect(&Token::LBrace)?;

        let mut methods = Vec::new();
        let mut statics = Vec::new();
        while !self.peek_is(&Token::RBrace) {
            let is_static = if self.peek_is(&Token::Static) {
                self.advance();
                true
            } else {
                false
            };
            let fn_start = self.expect(&Token::Fun)?.span.start;
            let func = self.parse_function_rest()?;
            let fn_end = func.body.span.end;
            let spanned = Spanned::new(func, Span::new(fn_start, fn_end));
            if is_static {
                statics.push(spanned);
            } else {
                methods.push(spanned);
            }
        }
        let close = self.expect(&Token::RBrace)?;
        let end = close.span.end;

        Ok(Spanned::new(
            Decl::Class(ClassDecl { name, methods, statics }),
            Span::new(start, end),
        ))
    }

    /// Parse the rest of a function after the `fun` keyword.
    fn parse_function_rest(&mut self) -> Result<Function, Error> {
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;

        let mut params = Vec::new();
        while !self.peek_is(&Token::RParen) {
            if !params.is_empty() {
                self.expect(&Token::Comma)?;
            }
            let pname = self.expect_ident()?;
            self.expect(&Token::Colon)?;
            let pty = self.parse_type()?;
            params.push(Param { name: pname, ty: pty });
        }
        self.expect(&Token::RParen)?;

        let return_type = if self.peek_is(&Token::Colon) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        Ok(Function { name, params, return_type, body })
    }

    fn parse_var(&mut self, is_const: bool) -> Result<Spanned<Decl>, Error> {
        let start = self.advance().unwrap().span.start;
        let name = self.expect_ident()?;

        let ty = if self.peek_is(&Token::Colon) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };

        let init = if self.peek_is(&Token::Eq) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };

        let end = init
            .as_ref()
            .map(|e| e.span.end)
            .or_else(|| ty.as_ref().map(|t| t.span.end))
            .unwrap_or(name.span.end);
        self.consume_semicolon();

        Ok(Spanned::new(
            Decl::Var(VarDecl { name, ty, init, is_const }),
            Span::new(start, end),
        ))
    }

    fn parse_type(&mut self) -> Result<Spanned<String>, Error> {
        let tok = self
            .peek()
            .ok_or_else(|| Error::syntax("expected type, found end of file", self.eof_span()))?;
        let span = tok.span;
        let name = match &tok.node {
            Token::TyInt => "int".to_string(),
            Token::TyFloat => "float".to_string(),
            Token::TyString => "string".to_string(),
            Token::TyBool => "bool".to_string(),
            Token::TyVoid => "void".to_string(),
            Token::Ident => self.source[span.start..span.end].to_string(),
            other => {
                return Err(Error::syntax(format!("expected type, found {other}"), span));
            }
        };
        self.advance();
        Ok(Spanned::new(name, span))
    }

    fn parse_block(&mut self) -> Result<Spanned<Block>, Error> {
        let start = self.expect(&Token::LBrace)?.span.start;
        let mut decls = Vec::new();
        self.consume_semicolons();
        while self.peek().is_some() && !self.peek_is(&Token::RBrace) {
            decls.push(self.parse_declaration()?);
            self.consume_semicolons();
        }
        let close = self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Block { decls }, Span::new(start, close.span.end)))
    }

    fn parse_statement(&mut self) -> Result<Spanned<Stmt>, Error> {
        let tok = self
            .peek()
            .ok_or_else(|| Error::syntax("unexpected end of file", self.eof_span()))?;
        match &tok.node {
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            Token::For => self.parse_for(),
            Token::Return => self.parse_return(),
            Token::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Spanned::new(Stmt::Block(block.node), span))
            }
            _ => {
                let expr = self.parse_expr()?;
                let span = expr.span;
                self.consume_semicolon();
                Ok(Spanned::new(Stmt::Expr(expr), span))
            }
        }
    }

    fn parse_if(&mut self) -> Result<Spanned<Stmt>, Error> {
        let start = self.expect(&Token::If)?.span.start;
        let cond = self.parse_condition()?;
        let then = self.parse_block()?;

        let els = if self.peek_is(&Token::Else) {
            self.advance();
            if self.peek_is(&Token::If) {
                // `else if` desugars into an else block holding the nested if
                let nested = self.parse_if()?;
                let span = nested.span;
                Some(Spanned::new(
                    Block { decls: vec![Spanned::new(Decl::Stmt(nested.node), span)] },
                    span,
                ))
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        let end = els.as_ref().map_or(then.span.end, |b| b.span.end);
        Ok(Spanned::new(Stmt::If { cond, then, els }, Span::new(start, end)))
    }

    fn parse_while(&mut self) -> Result<Spanned<Stmt>, Error> {
        let start = self.expect(&Token::While)?.span.start;
        let cond = self.parse_condition()?;
        let body = self.parse_block()?;
        let end = body.span.end;
        Ok(Spanned::new(Stmt::While { cond, body }, Span::new(start, end)))
    }

    fn parse_for(&mut self) -> Result<Spanned<Stmt>, Error> {
        let start = self.expect(&Token::For)?.span.start;
        self.expect(&Token::LParen)?;

        let init = if self.peek_is(&Token::Semicolon) {
            None
        } else if self.peek_is(&Token::Var) {
            Some(Box::new(self.parse_var(false)?))
        } else {
            let expr = self.parse_expr()?;
            let span = expr.span;
            Some(Box::new(Spanned::new(Decl::Stmt(Stmt::Expr(expr)), span)))
        };
        // parse_var consumes its trailing semicolon; a bare init does not
        if !matches!(init.as_deref(), Some(Spanned { node: Decl::Var(_), .. })) {
            self.expect(&Token::Semicolon)?;
        }

        let cond = if self.peek_is(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&Token::Semicolon)?;

        let incr = if self.peek_is(&Token::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&Token::RParen)?;

        let body = self.parse_block()?;
        let end = body.span.end;
        Ok(Spanned::new(Stmt::For { init, cond, incr, body }, Span::new(start, end)))
    }

    fn parse_return(&mut self) -> Result<Spanned<Stmt>, Error> {
        let ret_span = self.expect(&Token::Return)?.span;
        let value = if self.peek_is(&Token::Semicolon)
            || self.peek_is(&Token::RBrace)
            || self.peek().is_none()
        {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let end = value.as_ref().map_or(ret_span.end, |v| v.span.end);
        self.consume_semicolon();
        Ok(Spanned::new(Stmt::Return(value), Span::new(ret_span.start, end)))
    }

    /// Condition position: a struct literal would swallow the statement's
    /// `{`-block, so the named/bare literal forms are disabled here.
    fn parse_condition(&mut self) -> Result<Spanned<Expr>, Error> {
        let old = self.restrict_struct_lit;
        self.restrict_struct_lit = true;
        let cond = self.parse_expr();
        self.restrict_struct_lit = old;
        cond
    }

    // Assignment is right-associative and the loosest expression form.
    pub fn parse_expr(&mut self) -> Result<Spanned<Expr>, Error> {
        let lhs = self.parse_binary(0)?;

        if self.peek_is(&Token::Eq) {
            self.advance();
            let value = self.parse_expr()?;
            let span = Span::new(lhs.span.start, value.span.end);
            return match lhs.node {
                Expr::Variable(name) => Ok(Spanned::new(
                    Expr::Assign {
                        name: Spanned::new(name, lhs.span),
                        value: Box::new(value),
                    },
                    span,
                )),
                Expr::Get { object, field } => Ok(Spanned::new(
                    Expr::Set { object, field, value: Box::new(value) },
                    span,
                )),
                _ => Err(Error::syntax("invalid assignment target", lhs.span)),
            };
        }

        Ok(lhs)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Spanned<Expr>, Error> {
        let mut lhs = self.parse_unary()?;

        while let Some(tok) = self.peek() {
            let op = match &tok.node {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                Token::EqEq => BinOp::Eq,
                Token::BangEq => BinOp::Neq,
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::LtEq => BinOp::LtEq,
                Token::GtEq => BinOp::GtEq,
                Token::AmpAmp => BinOp::And,
                Token::PipePipe => BinOp::Or,
                _ => break,
            };

            let (lbp, rbp) = infix_binding_power(op);
            if lbp < min_bp {
                break;
            }
            self.advance();

            let rhs = self.parse_binary(rbp)?;
            let span = Span::new(lhs.span.start, rhs.span.end);
            lhs = Spanned::new(
                Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            );
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Spanned<Expr>, Error> {
        let tok = self
            .peek()
            .ok_or_else(|| Error::syntax("unexpected end of file in expression", self.eof_span()))?;
        let op = match &tok.node {
            Token::Minus => Some(UnaryOp::Neg),
            Token::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let start = tok.span.start;
            self.advance();
            let operand = self.parse_unary()?;
            let span = Span::new(start, operand.span.end);
            return Ok(Spanned::new(Expr::Unary { op, operand: Box::new(operand) }, span));
        }
        self.parse_postfix()
    }

    /// Call `(...)`, member access `.ident`, and indexing `[...]` chain on
    /// any primary.
    fn parse_postfix(&mut self) -> Result<Spanned<Expr>, Error> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.peek_is(&Token::LParen) {
                self.advance();
                let mut args = Vec::new();
                let old = self.restrict_struct_lit;
                self.restrict_struct_lit = false;
                while !self.peek_is(&Token::RParen) {
                    if !args.is_empty() {
                        self.expect(&Token::Comma)?;
                    }
                    args.push(self.parse_expr()?);
                }
                self.restrict_struct_lit = old;
                let close = self.expect(&Token::RParen)?;
                let span = Span::new(expr.span.start, close.span.end);
                expr = Spanned::new(Expr::Call { callee: Box::new(expr), args }, span);
            } else if self.peek_is(&Token::Dot) {
                self.advance();
                let field = self.expect_ident()?;
                let span = Span::new(expr.span.start, field.span.end);
                expr = Spanned::new(Expr::Get { object: Box::new(expr), field }, span);
            } else if self.peek_is(&Token::LBracket) {
                self.advance();
                let old = self.restrict_struct_lit;
                self.restrict_struct_lit = false;
                let index = self.parse_expr()?;
                self.restrict_struct_lit = old;
                let close = self.expect(&Token::RBracket)?;
                let span = Span::new(expr.span.start, close.span.end);
                expr = Spanned::new(
                    Expr::Index { array: Box::new(expr), index: Box::new(index) },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Spanned<Expr>, Error> {
        let tok = self
            .peek()
            .ok_or_else(|| Error::syntax("unexpected end of file in expression", self.eof_span()))?;

        match &tok.node {
            Token::IntLit(n) => {
                let (n, span) = (*n, tok.span);
                self.advance();
                Ok(Spanned::new(Expr::Int(n), span))
            }
            Token::FloatLit(n) => {
                let (n, span) = (*n, tok.span);
                self.advance();
                Ok(Spanned::new(Expr::Float(n), span))
            }
            Token::StringLit(s) => {
                let (s, span) = (s.clone(), tok.span);
                self.advance();
                Ok(Spanned::new(Expr::Str(s), span))
            }
            Token::True => {
                let span = tok.span;
                self.advance();
                Ok(Spanned::new(Expr::Bool(true), span))
            }
            Token::False => {
                let span = tok.span;
                self.advance();
                Ok(Spanned::new(Expr::Bool(false), span))
            }
            Token::Ident => {
                let ident = self.expect_ident()?;
                if !self.restrict_struct_lit
                    && self.peek_is(&Token::LBrace)
                    && self.struct_lit_ahead()
                {
                    let (fields, end) = self.parse_struct_fields()?;
                    let span = Span::new(ident.span.start, end);
                    Ok(Spanned::new(Expr::StructLit { name: Some(ident), fields }, span))
                } else {
                    Ok(Spanned::new(Expr::Variable(ident.node.clone()), ident.span))
                }
            }
            Token::LParen => {
                self.advance();
                let old = self.restrict_struct_lit;
                self.restrict_struct_lit = false;
                let expr = self.parse_expr();
                self.restrict_struct_lit = old;
                let expr = expr?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Token::LBracket => {
                let start = tok.span.start;
                self.advance();
                let mut elements = Vec::new();
                while !self.peek_is(&Token::RBracket) {
                    if !elements.is_empty() {
                        self.expect(&Token::Comma)?;
                    }
                    elements.push(self.parse_expr()?);
                }
                let close = self.expect(&Token::RBracket)?;
                let span = Span::new(start, close.span.end);
                Ok(Spanned::new(Expr::ArrayLit(elements), span))
            }
            Token::LBrace if !self.restrict_struct_lit => {
                let start = tok.span.start;
                let (fields, end) = self.parse_struct_fields()?;
                let span = Span::new(start, end);
                Ok(Spanned::new(Expr::StructLit { name: None, fields }, span))
            }
            other => Err(Error::syntax(
                format!("unexpected token {other} in expression"),
                tok.span,
            )),
        }
    }

    /// Parse `{ field: expr, ... }`, returning the fields and the closing
    /// brace's end offset.
    fn parse_struct_fields(
        &mut self,
    ) -> Result<(Vec<(Spanned<String>, Spanned<Expr>)>, usize), Error> {
        self.expect(&Token::LBrace)?;
        let mut fields = Vec::new();
        while !self.peek_is(&Token::RBrace) {
            if !fields.is_empty() {
                self.expect(&Token::Comma)?;
                if self.peek_is(&Token::RBrace) {
                    break;
                }
            }
            let fname = self.expect_ident()?;
            self.expect(&Token::Colon)?;
            let old = self.restrict_struct_lit;
            self.restrict_struct_lit = false;
            let fval = self.parse_expr();
            self.restrict_struct_lit = old;
            fields.push((fname, fval?));
        }
        let close = self.expect(&Token::RBrace)?;
        Ok((fields, close.span.end))
    }

    /// Lookahead from a `{` to decide between a struct literal and a block:
    /// a literal starts with `ident :` or closes immediately.
    fn struct_lit_ahead(&self) -> bool {
        match self.tokens.get(self.pos + 1) {
            Some(t) if matches!(t.node, Token::RBrace) => true,
            Some(t) if matches!(t.node, Token::Ident) => self
                .tokens
                .get(self.pos + 2)
                .is_some_and(|t| matches!(t.node, Token::Colon)),
            _ => false,
        }
    }
}

fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::Eq | BinOp::Neq => (5, 6),
        BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => (7, 8),
        BinOp::Add | BinOp::Sub => (9, 10),
        BinOp::Mul | BinOp::Div | BinOp::Mod => (11, 12),
    }
}
