use std::fmt::Display;

use crate::lexer::tokens::Token;

// LITERALS

/// A decoded literal value. Number and string tokens carry one; the parser
/// also builds them for `true`, `false` and `nil`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(value) => write!(f, "{}", value),
            Literal::String(value) => write!(f, "{}", value),
            Literal::Bool(value) => write!(f, "{}", value),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

/// Expression nodes. Built bottom-up by the parser and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Parenthesized sub-expression.
    Grouping(Box<Expr>),
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// `and` / `or`; the right operand is evaluated only when needed.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Variable(Token),
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        /// Closing `)`, kept so runtime errors can point at the call site.
        paren: Token,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn boolean(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    /// Line of the token most closely associated with this expression, if any.
    pub fn line(&self) -> Option<u32> {
        match self {
            Expr::Literal(_) => None,
            Expr::Grouping(inner) => inner.line(),
            Expr::Unary { operator, .. }
            | Expr::Binary { operator, .. }
            | Expr::Logical { operator, .. } => Some(operator.line),
            Expr::Variable(name) | Expr::Assign { name, .. } => Some(name.line),
            Expr::Call { paren, .. } => Some(paren.line),
        }
    }
}

#[cfg(test)]
impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Literal(Literal::Number(value))
    }
}
