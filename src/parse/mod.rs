//! Parsing of planning-domain sources into an [`Ast`].
//!
//! The parser never aborts on malformed input. Every error is reported to the
//! collected [`Diagnostics`] and parsing resumes at the end of the enclosing
//! parenthesis group, so a single run surfaces as many errors as possible.

use std::collections::VecDeque;

use crate::{
    ast::{Ast, DataType, Fact, Span, Tree, World},
    error::Diagnostics,
    lexer::{Lexer, Token, TokenKind},
    options::{Options, MIN_LOOK_AHEAD},
};

mod expr;

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    /// Lookahead window, `buffer[0]` is the current token
    buffer: VecDeque<Token>,
    options: Options,
    tree: Tree,
    world: World,
    diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: Options) -> Self {
        let look_ahead = options.look_ahead.max(MIN_LOOK_AHEAD);
        let mut lexer = Lexer::new(source);
        let buffer = (0..look_ahead).map(|_| lexer.next_token()).collect();
        Self {
            lexer,
            buffer,
            options,
            tree: Tree::new(source),
            world: World::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    /* Token stream */

    pub(crate) fn current(&self) -> Token {
        self.buffer[0]
    }

    /// Returns the token `k` positions ahead of the current one.
    /// Panics if `k` exceeds the lookahead window.
    pub(crate) fn peek(&self, k: usize) -> Token {
        assert!(
            k < self.buffer.len(),
            "lookahead of {} exceeds window of {} tokens",
            k,
            self.buffer.len()
        );
        self.buffer[k]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        self.buffer.push_back(next);
        self.buffer
            .pop_front()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: next.span,
            })
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current().is(kind)
    }

    /// Consumes the current token if it is of the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn text(&self, span: Span) -> &'src str {
        &self.lexer.source()[span.start..span.end]
    }

    /* Errors */

    pub(crate) fn report(&mut self, span: Span, message: impl Into<String>) {
        let source = self.lexer.source();
        self.diagnostics.report(source, span, message);
    }

    pub(crate) fn report_unexpected(&mut self, expected: &str) {
        let token = self.current();
        self.report(
            token.span,
            format!("expected {}, found {}", expected, token.kind),
        );
    }

    /// Skips tokens up to the `)` closing the current group, or the end of input.
    /// The closing parenthesis is not consumed.
    pub(crate) fn recover(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current().kind {
                TokenKind::Eof => return,
                TokenKind::RParen if depth == 0 => return,
                TokenKind::RParen => depth -= 1,
                TokenKind::LParen => depth += 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// Consumes the `)` matching the `(` at `open`, recovering if something else is found first.
    pub(crate) fn close_group(&mut self, open: Span) {
        if !self.at(TokenKind::RParen) && !self.at(TokenKind::Eof) {
            self.report_unexpected("')'");
            self.recover();
        }
        if !self.eat(TokenKind::RParen) {
            self.report(open, "unbalanced parenthesis, missing ')'");
        }
    }

    /* Accessors */

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Looks up a declared fact type by name.
    pub fn get_fact(&self, name: &str) -> Option<&Fact> {
        self.world.get_fact(name)
    }

    /* Declarations */

    /// Parses a complete source:
    /// an optional world declaration followed by any number of preconditions.
    pub fn parse(mut self) -> (Ast, Diagnostics) {
        let mut preconds = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Eof => break,
                TokenKind::Fact => self.parse_world(),
                TokenKind::LParen => preconds.push(self.parse_precond()),
                _ => {
                    self.report_unexpected("'fact' block or precondition");
                    self.advance();
                }
            }
        }
        log::debug!(
            "Parsed {} fact type(s) and {} precondition(s) into {} nodes",
            self.world.len(),
            preconds.len(),
            self.tree.len()
        );
        let ast = Ast {
            tree: self.tree,
            world: self.world,
            preconds,
        };
        (ast, self.diagnostics)
    }

    /// Parses a `fact { name(type, ...) ... }` block and declares its fact types.
    pub fn parse_world(&mut self) {
        if !self.eat(TokenKind::Fact) {
            self.report_unexpected("'fact'");
            return;
        }
        let open = self.current().span;
        if !self.eat(TokenKind::LBrace) {
            self.report_unexpected("'{'");
            return;
        }
        loop {
            match self.current().kind {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => {
                    self.report(open, "unterminated fact block, missing '}'");
                    break;
                }
                TokenKind::Identifier => self.parse_fact_decl(),
                _ => {
                    self.report_unexpected("fact declaration");
                    self.advance();
                }
            }
        }
    }

    fn parse_fact_decl(&mut self) {
        let name = self.advance();
        let mut params = Vec::new();
        let open = self.current().span;
        if self.eat(TokenKind::LParen) {
            if !self.eat(TokenKind::RParen) {
                loop {
                    let param = self.current();
                    if param.is(TokenKind::Identifier) {
                        self.advance();
                        match DataType::from_keyword(self.text(param.span)) {
                            Some(t) => params.push(t),
                            None => {
                                let msg = format!("unknown type '{}'", self.text(param.span));
                                self.report(param.span, msg)
                            }
                        }
                    } else {
                        self.report_unexpected("parameter type");
                    }
                    if self.eat(TokenKind::Comma) {
                        continue;
                    }
                    self.close_group(open);
                    break;
                }
            }
        } else {
            self.report_unexpected("'('");
        }

        let fact = Fact::new(self.text(name.span).to_string(), name.span, params);
        let redeclared = self.world.declare(fact).is_err();
        if redeclared {
            let msg = format!("fact '{}' already declared", self.text(name.span));
            self.report(name.span, msg);
        }
    }
}
