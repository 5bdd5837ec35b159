//! Parser state and the parsing entry point.
//!
//! The parser walks the token sequence with one token of lookahead. Each
//! declaration is parsed inside its own recovery boundary: a missing token
//! or a missing expression abandons the declaration, reports the error,
//! discards tokens up to a likely statement boundary and leaves a
//! `Stmt::Invalid` in its place.

use std::{collections::HashMap, rc::Rc};

use log::{debug, info};

use crate::{
    ast::statements::Stmt,
    errors::errors::{DiagnosticSink, Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MAX_NESTING, MK_SPAN, MK_TOKEN,
};

use super::{
    lookups::{create_token_lookups, StmtHandler, StmtLookup},
    stmt::parse_declaration,
};

/// The main parser structure that maintains parsing state.
pub struct Parser<'s> {
    /// The tokens to parse, always ending in `EOF`
    tokens: Vec<Token>,
    /// Index of the next unconsumed token
    pos: usize,
    /// Statements and expressions currently open
    depth: usize,
    /// Handlers for `fun` and `var`
    decl_lookup: StmtLookup,
    /// Handlers for keyword-led statements
    stmt_lookup: StmtLookup,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> Parser<'s> {
    pub fn new(mut tokens: Vec<Token>, sink: &'s mut dyn DiagnosticSink) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map(|token| token.line).unwrap_or(1);
            let file = tokens
                .last()
                .map(|token| Rc::clone(&token.span.end.1))
                .unwrap_or_else(|| Rc::new(String::from("shell")));
            let offset = tokens.last().map(|token| token.span.end.0).unwrap_or(0);
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::new(),
                None,
                line,
                MK_SPAN!(offset, offset, file)
            ));
        }

        info!("Parser created with {} tokens", tokens.len());

        Parser {
            tokens,
            pos: 0,
            depth: 0,
            decl_lookup: HashMap::new(),
            stmt_lookup: HashMap::new(),
            sink,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the most recently consumed token.
    pub fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advances to the next token and returns the consumed one. Never moves
    /// past `EOF`.
    pub fn advance(&mut self) -> &Token {
        if self.has_tokens() {
            self.pos += 1;
        }
        self.previous()
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.has_tokens() && self.current_token_kind() == kind
    }

    /// Consumes the current token if it is of `kind`.
    pub fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }

        false
    }

    pub fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.match_kind(*kind))
    }

    /// Consumes a token of `expected_kind` or fails the current declaration.
    pub fn expect(&mut self, expected_kind: TokenKind, message: &str) -> Result<Token, Error> {
        if self.check(expected_kind) {
            return Ok(self.advance().clone());
        }

        Err(Error::at_token(
            ErrorImpl::ExpectedToken {
                expected: expected_kind,
                message: String::from(message),
            },
            self.current_token(),
        ))
    }

    /// Reports a diagnostic without unwinding.
    pub fn report(&mut self, error: Error) {
        debug!("reporting {}", error);
        self.sink.report(error);
    }

    /// Discards tokens until just past a `;` or until the next token starts a
    /// new statement.
    pub fn synchronize(&mut self) {
        let from_line = self.current_token().line;
        self.advance();

        while self.has_tokens() {
            if self.previous().kind == TokenKind::Semicolon {
                break;
            }

            if self.current_token_kind().begins_statement() {
                break;
            }

            self.advance();
        }

        debug!(
            "synchronized from line {} to line {}",
            from_line,
            self.current_token().line
        );
    }

    /// Runs `parse_fn` one nesting level deeper, failing the current
    /// declaration once `MAX_NESTING` levels are open.
    pub fn nested<T>(
        &mut self,
        parse_fn: impl FnOnce(&mut Parser<'s>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.depth >= MAX_NESTING {
            return Err(Error::at_token(
                ErrorImpl::TooDeeplyNested,
                self.current_token(),
            ));
        }

        self.depth += 1;
        let result = parse_fn(self);
        self.depth -= 1;

        result
    }

    pub fn get_decl_lookup(&self) -> &StmtLookup {
        &self.decl_lookup
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Registers a declaration handler for a leading keyword.
    pub fn decl(&mut self, kind: TokenKind, decl_fn: StmtHandler) {
        self.decl_lookup.insert(kind, decl_fn);
    }

    /// Registers a statement handler for a leading token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses a token sequence into a program.
///
/// Statements abandoned during error recovery appear as `Stmt::Invalid`;
/// every diagnostic goes to `sink`. Parsing always runs to the end of the
/// tokens.
pub fn parse(tokens: Vec<Token>, sink: &mut dyn DiagnosticSink) -> Vec<Stmt> {
    let mut parser = Parser::new(tokens, sink);
    create_token_lookups(&mut parser);

    info!("Beginning parse phase");

    let mut body = vec![];
    while parser.has_tokens() {
        body.push(parse_declaration(&mut parser));
    }

    info!("Parsed {} top-level statements", body.len());
    body
}
