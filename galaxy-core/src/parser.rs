//! Recursive-descent parser for Galaxy.
//!
//! The parser walks the token array with an explicit cursor. Syntax
//! errors are recorded as diagnostics and parsing resumes at the next
//! token that can start a statement, so one run reports as many
//! independent errors as it can.

use tracing::{debug, trace};

use crate::ast::{BinaryOp, ElifClause, Node, NodeId, NodeKind, UnaryOp};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::reserve_or_abort;
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

/// Result of parsing one token sequence.
///
/// A non-empty `diagnostics` means `program` may be partial and must not
/// be handed to code generation.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Node,
    pub diagnostics: Diagnostics,
}

/// Parse a token sequence into a `Program` node.
///
/// The sequence is expected to end with an `Eof` token, as produced by
/// the lexer; one is synthesized if it is missing.
pub fn parse(tokens: &[Token<'_>]) -> ParseOutput {
    if tokens.last().is_some_and(|token| token.kind == TokenKind::Eof) {
        return Parser::new(tokens).parse_program();
    }
    let mut owned = tokens.to_vec();
    owned.push(synthetic_eof(tokens.last()));
    Parser::new(&owned).parse_program()
}

fn synthetic_eof<'a>(last: Option<&Token<'a>>) -> Token<'a> {
    let (span, source_name) = match last {
        Some(token) => (
            Span::point(token.span.line, token.span.column_end, token.span.end),
            token.source_name,
        ),
        None => (Span::point(1, 1, 0), ""),
    };
    Token {
        kind: TokenKind::Eof,
        lexeme: "EOF".to_owned(),
        span,
        source_name,
        message: None,
    }
}

/// The diagnostic for this failure has already been recorded.
#[derive(Debug)]
struct Reported;

type PResult<T> = Result<T, Reported>;

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    position: usize,
    next_id: u32,
    diagnostics: Diagnostics,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Parser {
            tokens,
            position: 0,
            next_id: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    fn parse_program(mut self) -> ParseOutput {
        let start = self.current().span;
        let mut body = Vec::new();

        while !self.check(TokenKind::Eof) {
            if is_block_terminator(self.peek_kind()) {
                // A closer with nothing open; drop it and keep going.
                let token = self.advance();
                let message = format!("unexpected {}", describe(token));
                self.report(token, message);
                continue;
            }
            self.statement_with_recovery(&mut body);
        }

        let span = start.to(self.current().span);
        let program = self.node(span, NodeKind::Program { body });
        debug!(
            nodes = self.next_id,
            diagnostics = self.diagnostics.len(),
            "parsed program"
        );
        ParseOutput {
            program,
            diagnostics: self.diagnostics,
        }
    }

    // -----------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------

    /// `Statement*` up to the next block terminator or EOF.
    fn parse_block(&mut self) -> Vec<Node> {
        let mut body = Vec::new();
        while !self.check(TokenKind::Eof) && !is_block_terminator(self.peek_kind()) {
            self.statement_with_recovery(&mut body);
        }
        body
    }

    fn statement_with_recovery(&mut self, body: &mut Vec<Node>) {
        let start = self.position;
        match self.parse_statement() {
            Ok(Some(statement)) => {
                reserve_or_abort(body, "nodes");
                body.push(statement);
            }
            Ok(None) => {}
            Err(Reported) => {
                let opener = is_block_opener(self.tokens[start].kind);
                self.synchronize(start);
                // The `end` we stopped at most likely closes the failed block.
                if opener && self.check(TokenKind::End) {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the next token that can begin a statement. Always makes
    /// progress: a statement that failed on its first token loses it.
    fn synchronize(&mut self, statement_start: usize) {
        let from = self.position;
        if self.position == statement_start {
            self.advance();
        }
        while !is_sync_token(self.peek_kind()) {
            self.advance();
        }
        trace!(from, to = self.position, "resynchronized");
    }

    fn parse_statement(&mut self) -> PResult<Option<Node>> {
        let statement = match self.peek_kind() {
            TokenKind::Semi => {
                self.advance();
                return Ok(None);
            }
            TokenKind::Import => self.parse_import()?,
            TokenKind::Package => self.parse_package()?,
            TokenKind::Def => self.parse_func_decl()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Switch => self.parse_switch()?,
            TokenKind::Return => self.parse_return()?,
            _ => self.parse_expr_stmt()?,
        };
        Ok(Some(statement))
    }

    fn parse_import(&mut self) -> PResult<Node> {
        let start = self.advance().span;
        let token = self.current();
        let path = match token.kind {
            TokenKind::String => {
                self.advance();
                self.node(
                    token.span,
                    NodeKind::StringLiteral {
                        value: token.lexeme.clone(),
                    },
                )
            }
            TokenKind::Identifier => {
                self.advance();
                self.node(
                    token.span,
                    NodeKind::Identifier {
                        name: token.lexeme.clone(),
                    },
                )
            }
            _ => return Err(self.error_expected(&[TokenKind::String, TokenKind::Identifier])),
        };
        let span = start.to(self.previous_span());
        Ok(self.node(
            span,
            NodeKind::Import {
                path: Box::new(path),
            },
        ))
    }

    fn parse_package(&mut self) -> PResult<Node> {
        let start = self.advance().span;
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
        let span = start.to(self.previous_span());
        Ok(self.node(span, NodeKind::PackageDecl { name }))
    }

    fn parse_func_decl(&mut self) -> PResult<Node> {
        let start = self.advance().span;
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let token = self.expect(TokenKind::Identifier)?;
                let param = self.node(
                    token.span,
                    NodeKind::Param {
                        name: token.lexeme.clone(),
                    },
                );
                params.push(param);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        // Type expressions are bare names for now.
        let return_type = match self.eat(TokenKind::Arrow) {
            Some(_) => {
                let token = self.expect(TokenKind::Identifier)?;
                Some(Box::new(self.node(
                    token.span,
                    NodeKind::Identifier {
                        name: token.lexeme.clone(),
                    },
                )))
            }
            None => None,
        };

        let body = self.parse_block();
        self.expect(TokenKind::End)?;

        let span = start.to(self.previous_span());
        Ok(self.node(
            span,
            NodeKind::FuncDecl {
                name,
                params,
                return_type,
                body,
            },
        ))
    }

    fn parse_if(&mut self) -> PResult<Node> {
        let start = self.advance().span;
        let condition = self.parse_expr()?;
        let then_block = self.parse_block();

        let mut elifs = Vec::new();
        while self.check(TokenKind::Elif) {
            let clause_start = self.advance().span;
            let condition = self.parse_expr()?;
            let body = self.parse_block();
            elifs.push(ElifClause {
                condition,
                body,
                span: clause_start.to(self.previous_span()),
            });
        }

        let else_block = match self.eat(TokenKind::Else) {
            Some(_) => Some(self.parse_block()),
            None => None,
        };

        if !self.check(TokenKind::End) {
            let expected: &[TokenKind] = if else_block.is_some() {
                &[TokenKind::End]
            } else {
                &[TokenKind::End, TokenKind::Elif, TokenKind::Else]
            };
            return Err(self.error_expected(expected));
        }
        self.advance();

        let span = start.to(self.previous_span());
        Ok(self.node(
            span,
            NodeKind::If {
                condition: Box::new(condition),
                then_block,
                elifs,
                else_block,
            },
        ))
    }

    fn parse_for(&mut self) -> PResult<Node> {
        let start = self.advance().span;
        let index = self.expect(TokenKind::Identifier)?.lexeme.clone();
        self.expect(TokenKind::Comma)?;
        let item = self.expect(TokenKind::Identifier)?.lexeme.clone();
        // `in` is not reserved; it only means something here.
        self.expect_contextual("in")?;
        let iterable = self.parse_expr()?;
        let body = self.parse_block();
        self.expect(TokenKind::End)?;

        let span = start.to(self.previous_span());
        Ok(self.node(
            span,
            NodeKind::For {
                index,
                item,
                iterable: Box::new(iterable),
                body,
            },
        ))
    }

    fn parse_switch(&mut self) -> PResult<Node> {
        let start = self.advance().span;
        let subject = self.parse_expr()?;

        if !self.check(TokenKind::Case) {
            return Err(self.error_expected(&[TokenKind::Case]));
        }
        let mut cases = Vec::new();
        while self.check(TokenKind::Case) {
            let case_start = self.advance().span;
            let pattern = self.parse_expr()?;
            self.expect(TokenKind::Colon)?;
            let body = self.parse_block();
            let span = case_start.to(self.previous_span());
            let case = self.node(
                span,
                NodeKind::Case {
                    pattern: Box::new(pattern),
                    body,
                },
            );
            cases.push(case);
        }

        let default = match self.eat(TokenKind::Default) {
            Some(_) => {
                self.expect(TokenKind::Colon)?;
                Some(self.parse_block())
            }
            None => None,
        };

        if !self.check(TokenKind::End) {
            let expected: &[TokenKind] = if default.is_some() {
                &[TokenKind::End]
            } else {
                &[TokenKind::Case, TokenKind::Default, TokenKind::End]
            };
            return Err(self.error_expected(expected));
        }
        self.advance();

        let span = start.to(self.previous_span());
        Ok(self.node(
            span,
            NodeKind::Switch {
                subject: Box::new(subject),
                cases,
                default,
            },
        ))
    }

    fn parse_return(&mut self) -> PResult<Node> {
        let start = self.advance().span;
        let value = if can_begin_expression(self.peek_kind()) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let span = start.to(self.previous_span());
        Ok(self.node(span, NodeKind::Return { value }))
    }

    fn parse_expr_stmt(&mut self) -> PResult<Node> {
        let expr = self.parse_expr()?;
        Ok(self.node(
            expr.span,
            NodeKind::ExprStmt {
                expr: Box::new(expr),
            },
        ))
    }

    // -----------------------------------------------------------------
    // Expressions, lowest precedence first
    // -----------------------------------------------------------------

    fn parse_expr(&mut self) -> PResult<Node> {
        self.parse_assignment()
    }

    /// Right-associative: `a := b := 1` is `a := (b := 1)`.
    fn parse_assignment(&mut self) -> PResult<Node> {
        let target = self.parse_range()?;
        if self.eat(TokenKind::Assign).is_none() {
            return Ok(target);
        }
        let value = self.parse_assignment()?;
        let span = target.span.to(value.span);
        Ok(self.node(
            span,
            NodeKind::Assignment {
                target: Box::new(target),
                value: Box::new(value),
            },
        ))
    }

    fn parse_range(&mut self) -> PResult<Node> {
        let start = self.parse_comparison()?;
        if self.eat(TokenKind::Range).is_none() {
            return Ok(start);
        }
        let end = self.parse_comparison()?;
        let span = start.span.to(end.span);
        Ok(self.node(
            span,
            NodeKind::RangeExpr {
                start: Box::new(start),
                end: Box::new(end),
            },
        ))
    }

    fn parse_comparison(&mut self) -> PResult<Node> {
        let mut left = self.parse_additive()?;
        while let Some(op) = comparison_op(self.peek_kind()) {
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> PResult<Node> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<Node> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    /// Right-associative: `2 ** 3 ** 2` is `2 ** (3 ** 2)`.
    fn parse_power(&mut self) -> PResult<Node> {
        let base = self.parse_unary()?;
        if self.eat(TokenKind::Power).is_none() {
            return Ok(base);
        }
        let exponent = self.parse_power()?;
        Ok(self.binary(BinaryOp::Pow, base, exponent))
    }

    fn parse_unary(&mut self) -> PResult<Node> {
        if !self.check(TokenKind::Minus) {
            return self.parse_postfix();
        }
        let start = self.advance().span;
        let operand = self.parse_unary()?;
        let span = start.to(operand.span);
        Ok(self.node(
            span,
            NodeKind::UnaryExpr {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            },
        ))
    }

    fn parse_postfix(&mut self) -> PResult<Node> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(TokenKind::LParen).is_some() {
                let mut args = Vec::new();
                if !self.check(TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expr()?);
                        if self.eat(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen)?;
                let span = expr.span.to(self.previous_span());
                expr = self.node(
                    span,
                    NodeKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                );
            } else if self.eat(TokenKind::Dot).is_some() {
                let member = self.expect(TokenKind::Identifier)?;
                let span = expr.span.to(member.span);
                expr = self.node(
                    span,
                    NodeKind::MemberAccess {
                        object: Box::new(expr),
                        member: member.lexeme.clone(),
                    },
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> PResult<Node> {
        let token = self.current();
        let kind = match token.kind {
            TokenKind::Number => NodeKind::NumberLiteral {
                text: token.lexeme.clone(),
            },
            TokenKind::String => NodeKind::StringLiteral {
                value: token.lexeme.clone(),
            },
            TokenKind::True => NodeKind::BoolLiteral { value: true },
            TokenKind::False => NodeKind::BoolLiteral { value: false },
            TokenKind::Identifier => NodeKind::Identifier {
                name: token.lexeme.clone(),
            },
            TokenKind::LParen => {
                let open = self.advance().span;
                let mut inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                // The grouped node covers its parentheses too.
                inner.span = open.to(self.previous_span());
                return Ok(inner);
            }
            _ => {
                let message = format!("expected expression, found {}", describe(token));
                self.report(token, message);
                return Err(Reported);
            }
        };
        self.advance();
        Ok(self.node(token.span, kind))
    }

    // -----------------------------------------------------------------
    // Cursor helpers
    // -----------------------------------------------------------------

    fn node(&mut self, span: Span, kind: NodeKind) -> Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Node::new(id, span, kind)
    }

    fn binary(&mut self, op: BinaryOp, left: Node, right: Node) -> Node {
        let span = left.span.to(right.span);
        self.node(
            span,
            NodeKind::BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    fn current(&self) -> &'t Token<'a> {
        let tokens = self.tokens;
        &tokens[self.position.min(tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Return the current token and move past it. Never moves past EOF.
    fn advance(&mut self) -> &'t Token<'a> {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'t Token<'a>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<&'t Token<'a>> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.error_expected(&[kind])),
        }
    }

    fn expect_contextual(&mut self, word: &str) -> PResult<&'t Token<'a>> {
        let token = self.current();
        if token.kind == TokenKind::Identifier && token.lexeme == word {
            return Ok(self.advance());
        }
        let message = format!("expected `{word}`, found {}", describe(token));
        self.report(token, message);
        Err(Reported)
    }

    fn previous_span(&self) -> Span {
        let index = self.position.saturating_sub(1);
        self.tokens[index.min(self.tokens.len() - 1)].span
    }

    fn error_expected(&mut self, expected: &[TokenKind]) -> Reported {
        let token = self.current();
        let message = format!(
            "expected {}, found {}",
            expected_list(expected),
            describe(token)
        );
        self.report(token, message);
        Reported
    }

    fn report(&mut self, token: &Token<'a>, message: String) {
        self.diagnostics.push(Diagnostic::error(
            token.source_name,
            token.span,
            token.lexeme.as_str(),
            message,
        ));
    }
}

/// Tokens that close the current block.
fn is_block_terminator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::End | TokenKind::Elif | TokenKind::Else | TokenKind::Case | TokenKind::Default
    )
}

fn is_block_opener(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Def | TokenKind::If | TokenKind::For | TokenKind::Switch
    )
}

/// Where error recovery stops skipping.
fn is_sync_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::If
            | TokenKind::For
            | TokenKind::Switch
            | TokenKind::Def
            | TokenKind::Return
            | TokenKind::Package
            | TokenKind::Import
            | TokenKind::End
            | TokenKind::Eof
    )
}

fn can_begin_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Identifier
            | TokenKind::LParen
            | TokenKind::Minus
    )
}

fn comparison_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Less => BinaryOp::Lt,
        TokenKind::Greater => BinaryOp::Gt,
        TokenKind::LessEqual => BinaryOp::Le,
        TokenKind::GreaterEqual => BinaryOp::Ge,
        TokenKind::EqualEqual => BinaryOp::Eq,
        _ => return None,
    };
    Some(op)
}

/// `EOF`, `` `)` ``, or `identifier 'foo'`.
fn describe(token: &Token<'_>) -> String {
    match (token.kind, token.kind.as_str()) {
        (TokenKind::Eof, _) | (_, Some(_)) => token.kind.to_string(),
        (kind, None) => format!("{kind} '{}'", token.lexeme),
    }
}

/// "`end`", "`end` or `else`", "`end`, `elif` or `else`".
fn expected_list(kinds: &[TokenKind]) -> String {
    let names: Vec<String> = kinds.iter().map(ToString::to_string).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}
