//! Precedence-climbing parser for precondition expressions.
//!
//! Grammar, from lowest to highest priority:
//!
//! ```text
//! precond  := '(' or* ')'
//! or       := and ('|' and)*
//! and      := not ('&' not)*
//! not      := '~' not | rel
//! rel      := add (('==' | '!=' | '<' | '<=' | '>' | '>=') add)*
//! add      := mul (('+' | '-') mul)*
//! mul      := primary (('*' | '/') primary)*
//! primary  := ident '(' (or (',' or)*)? ')' | ident | literal | '(' or ')'
//! ```
//!
//! `&` and `|` chains build a single n-ary node, the binary operators are left-associative.

use std::time::Instant;

use smallvec::SmallVec;

use super::Parser;
use crate::{
    ast::{ExprId, ExprKind, Literal, Span},
    lexer::{Token, TokenKind},
};

type SubParser<'src> = fn(&mut Parser<'src>) -> Option<ExprId>;

fn relational_kind(token: TokenKind) -> Option<ExprKind> {
    match token {
        TokenKind::Equal => Some(ExprKind::Equal),
        TokenKind::NotEqual => Some(ExprKind::NotEqual),
        TokenKind::Less => Some(ExprKind::Less),
        TokenKind::LessEqual => Some(ExprKind::LessEqual),
        TokenKind::Greater => Some(ExprKind::Greater),
        TokenKind::GreaterEqual => Some(ExprKind::GreaterEqual),
        _ => None,
    }
}

fn additive_kind(token: TokenKind) -> Option<ExprKind> {
    match token {
        TokenKind::Plus => Some(ExprKind::Plus),
        TokenKind::Minus => Some(ExprKind::Minus),
        _ => None,
    }
}

fn multiplicative_kind(token: TokenKind) -> Option<ExprKind> {
    match token {
        TokenKind::Multiply => Some(ExprKind::Multiply),
        TokenKind::Divide => Some(ExprKind::Divide),
        _ => None,
    }
}

impl<'src> Parser<'src> {
    /// Parses a parenthesized precondition.
    /// The empty precondition `()` is the empty conjunction,
    /// several juxtaposed expressions are conjoined.
    pub fn parse_precond(&mut self) -> ExprId {
        let t = Instant::now();
        let open = self.current();
        if !self.eat(TokenKind::LParen) {
            self.report_unexpected("'(' to start a precondition");
            return self.tree.alloc(ExprKind::And);
        }

        let mut conjuncts: SmallVec<[ExprId; 4]> = SmallVec::new();
        while !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            if let Some(e) = self.parse_expr() {
                conjuncts.push(e);
            }
        }
        self.close_group(open.span);

        let root = if conjuncts.len() == 1 {
            conjuncts[0]
        } else {
            let and = self.tree.alloc(ExprKind::And);
            for c in conjuncts {
                self.tree.append_child(and, c);
            }
            and
        };
        log::debug!("Parsed precondition ({:?})", t.elapsed());
        log::trace!("Precondition: {}", self.tree.display(root));
        root
    }

    /// Parses a single expression. Returns `None` if no operand could be parsed at all.
    pub(crate) fn parse_expr(&mut self) -> Option<ExprId> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Option<ExprId> {
        self.parse_nary(ExprKind::Or, TokenKind::Or, Self::parse_and)
    }

    fn parse_and(&mut self) -> Option<ExprId> {
        self.parse_nary(ExprKind::And, TokenKind::And, Self::parse_not)
    }

    fn parse_not(&mut self) -> Option<ExprId> {
        if self.eat(TokenKind::Not) {
            let not = self.tree.alloc(ExprKind::Not);
            if let Some(operand) = self.parse_not() {
                self.tree.append_child(not, operand);
            }
            Some(not)
        } else {
            self.parse_relational()
        }
    }

    fn parse_relational(&mut self) -> Option<ExprId> {
        self.parse_binary(relational_kind, Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Option<ExprId> {
        self.parse_binary(additive_kind, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Option<ExprId> {
        self.parse_binary(multiplicative_kind, Self::parse_primary)
    }

    /// Parses `operand (op operand)*` into one node with all operands as children.
    fn parse_nary(
        &mut self,
        kind: ExprKind,
        op: TokenKind,
        operand: SubParser<'src>,
    ) -> Option<ExprId> {
        let first = operand(self);
        if !self.at(op) {
            return first;
        }
        let node = self.tree.alloc(kind);
        if let Some(first) = first {
            self.tree.append_child(node, first);
        }
        while self.eat(op) {
            if let Some(next) = operand(self) {
                self.tree.append_child(node, next);
            }
        }
        Some(node)
    }

    /// Parses a left-associative chain of binary operators.
    /// A missing operand leaves a partial node with fewer than two children.
    fn parse_binary(
        &mut self,
        op: fn(TokenKind) -> Option<ExprKind>,
        operand: SubParser<'src>,
    ) -> Option<ExprId> {
        let mut left = operand(self);
        while let Some(kind) = op(self.current().kind) {
            self.advance();
            let node = self.tree.alloc(kind);
            if let Some(l) = left {
                self.tree.append_child(node, l);
            }
            if let Some(r) = operand(self) {
                self.tree.append_child(node, r);
            }
            left = Some(node);
        }
        left
    }

    fn parse_primary(&mut self) -> Option<ExprId> {
        let token = self.current();
        match token.kind {
            TokenKind::Identifier if self.peek(1).is(TokenKind::LParen) => {
                Some(self.parse_func(token))
            }
            TokenKind::Identifier => {
                self.advance();
                Some(self.tree.alloc(ExprKind::Var(token.span)))
            }
            TokenKind::IntLiteral => {
                self.advance();
                let value = match self.text(token.span).parse::<i64>() {
                    Ok(v) => v,
                    Err(_) => {
                        self.report(token.span, "integer literal out of range");
                        0
                    }
                };
                Some(self.literal(Literal::Int(value)))
            }
            TokenKind::FloatLiteral => {
                self.advance();
                let value = match self.text(token.span).parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => {
                        self.report(token.span, "malformed float literal");
                        0.0
                    }
                };
                Some(self.literal(Literal::Float(value)))
            }
            TokenKind::StrLiteral => {
                self.advance();
                let inner = Span::new(token.span.start + 1, token.span.end - 1);
                Some(self.literal(Literal::Str(inner)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.close_group(token.span);
                inner
            }
            _ => {
                self.report_unexpected("operand");
                self.recover();
                None
            }
        }
    }

    fn literal(&mut self, value: Literal) -> ExprId {
        self.tree.alloc(ExprKind::Literal(value))
    }

    /// Parses `name(arg, ...)`, the current token being `name`.
    fn parse_func(&mut self, name: Token) -> ExprId {
        self.advance();
        let open = self.advance();
        debug_assert!(open.is(TokenKind::LParen));
        let func = self.tree.alloc(ExprKind::Func(name.span));
        let mut args = 0usize;

        if !self.eat(TokenKind::RParen) {
            loop {
                if self.at(TokenKind::Comma) || self.at(TokenKind::RParen) {
                    let slot = self.current().span;
                    self.report(slot, "empty function argument");
                } else if let Some(arg) = self.parse_expr() {
                    self.tree.append_child(func, arg);
                    args += 1;
                }
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                self.close_group(open.span);
                break;
            }
        }

        self.validate_func(name.span, args);
        func
    }

    /// Checks a call against the declared fact types, if a world was declared.
    fn validate_func(&mut self, name: Span, args: usize) {
        if !self.options.validate_facts || self.world.is_empty() {
            return;
        }
        let text = self.text(name);
        let expected = self.world.get_fact(text).map(|f| f.arity());
        match expected {
            None => self.report(name, format!("unknown fact '{}'", text)),
            Some(arity) if arity != args => self.report(
                name,
                format!(
                    "fact '{}' expects {} argument(s), found {}",
                    text, arity, args
                ),
            ),
            Some(_) => {}
        }
    }
}
