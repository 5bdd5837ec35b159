use crate::lexer::tokens::Token;

use super::expressions::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Print(Expr),
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Function {
        name: Token,
        params: Vec<Token>,
        body: Vec<Stmt>,
    },
    Return {
        /// The `return` keyword, for attributing runtime errors.
        keyword: Token,
        value: Option<Expr>,
    },
    /// Placeholder for a statement abandoned during error recovery.
    Invalid,
}

impl Stmt {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Stmt::Invalid)
    }
}

/// Number of statements lost to error recovery, including those nested in
/// blocks, branches and function bodies.
pub fn count_invalid(program: &[Stmt]) -> usize {
    program.iter().map(invalid_in).sum()
}

fn invalid_in(stmt: &Stmt) -> usize {
    match stmt {
        Stmt::Invalid => 1,
        Stmt::Block(body) | Stmt::Function { body, .. } => count_invalid(body),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => invalid_in(then_branch) + else_branch.as_deref().map_or(0, invalid_in),
        Stmt::While { body, .. } => invalid_in(body),
        Stmt::Expression(_) | Stmt::Print(_) | Stmt::Var { .. } | Stmt::Return { .. } => 0,
    }
}
