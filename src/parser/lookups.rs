use std::collections::HashMap;

use crate::{ast::statements::Stmt, errors::errors::Error, lexer::tokens::TokenKind};

use super::{parser::Parser, stmt::*};

/// Precedence layers, loosest first. Every binary layer parses the
/// next-tighter layer on each side of its operators.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Equality,
    Comparison,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Primary,
}

impl BindingPower {
    /// The layer that binds one step tighter.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::Default => BindingPower::Assignment,
            BindingPower::Assignment => BindingPower::LogicalOr,
            BindingPower::LogicalOr => BindingPower::LogicalAnd,
            BindingPower::LogicalAnd => BindingPower::Equality,
            BindingPower::Equality => BindingPower::Comparison,
            BindingPower::Comparison => BindingPower::Additive,
            BindingPower::Additive => BindingPower::Multiplicative,
            BindingPower::Multiplicative => BindingPower::Unary,
            BindingPower::Unary => BindingPower::Call,
            BindingPower::Call | BindingPower::Primary => BindingPower::Primary,
        }
    }

    /// Infix operators handled by a left-associative layer.
    pub fn operators(self) -> &'static [TokenKind] {
        match self {
            BindingPower::LogicalOr => &[TokenKind::Or],
            BindingPower::LogicalAnd => &[TokenKind::And],
            BindingPower::Equality => &[TokenKind::BangEqual, TokenKind::EqualEqual],
            BindingPower::Comparison => &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            BindingPower::Additive => &[TokenKind::Minus, TokenKind::Plus],
            BindingPower::Multiplicative => &[TokenKind::Slash, TokenKind::Star],
            BindingPower::Unary => &[TokenKind::Bang, TokenKind::Minus],
            _ => &[],
        }
    }

    /// `and` / `or` build short-circuiting nodes instead of plain binaries.
    pub fn is_logical(self) -> bool {
        matches!(self, BindingPower::LogicalOr | BindingPower::LogicalAnd)
    }
}

pub type StmtHandler = fn(&mut Parser<'_>) -> Result<Stmt, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Declarations
    parser.decl(TokenKind::Fun, parse_fn_decl_stmt);
    parser.decl(TokenKind::Var, parse_var_decl_stmt);

    // Statements
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Print, parse_print_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::LeftBrace, parse_block_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
