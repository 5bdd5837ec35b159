use log::debug;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::expr::parse_expr,
    MAX_ARITY,
};

use super::parser::Parser;

/// Parses one declaration inside its own recovery boundary.
///
/// A failed declaration is reported, the parser resynchronizes and the
/// declaration becomes `Stmt::Invalid`.
pub fn parse_declaration(parser: &mut Parser) -> Stmt {
    debug!(
        "Entering declaration at {} on line {}",
        parser.current_token_kind(),
        parser.current_token().line
    );

    let handler = parser.get_decl_lookup().get(&parser.current_token_kind()).copied();
    let result = match handler {
        Some(handler) => handler(parser),
        None => parse_stmt(parser),
    };

    match result {
        Ok(stmt) => stmt,
        Err(error) => {
            parser.report(error);
            parser.synchronize();
            Stmt::Invalid
        }
    }
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

/// The body of an `if`, `while` or `for`, one nesting level down.
fn parse_body_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.nested(parse_stmt)
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expr = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon, "Expect ';' after expression.")?;

    Ok(Stmt::Expression(expr))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier, "Expect variable name.")?;

    let initializer = if parser.match_kind(TokenKind::Equal) {
        Some(parse_expr(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;

    Ok(Stmt::Var { name, initializer })
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let name = parser.expect(TokenKind::Identifier, "Expect function name.")?;
    parser.expect(TokenKind::LeftParen, "Expect '(' after function name.")?;

    let mut params = Vec::new();
    if !parser.check(TokenKind::RightParen) {
        loop {
            if params.len() >= MAX_ARITY {
                let error = Error::at_token(ErrorImpl::TooManyParameters, parser.current_token());
                parser.report(error);
            }

            params.push(parser.expect(TokenKind::Identifier, "Expect parameter name.")?);

            if !parser.match_kind(TokenKind::Comma) {
                break;
            }
        }
    }

    parser.expect(TokenKind::RightParen, "Expect ')' after parameters.")?;
    parser.expect(TokenKind::LeftBrace, "Expect '{' before function body.")?;
    let body = parse_block_body(parser)?;

    Ok(Stmt::Function { name, params, body })
}

/// `for` has no node of its own: it becomes an optional initializer and a
/// `while` loop whose body runs the increment after the loop body.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

    let initializer = if parser.match_kind(TokenKind::Semicolon) {
        None
    } else if parser.check(TokenKind::Var) {
        Some(parse_var_decl_stmt(parser)?)
    } else {
        Some(parse_expression_stmt(parser)?)
    };

    let condition = if !parser.check(TokenKind::Semicolon) {
        Some(parse_expr(parser)?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

    let increment = if !parser.check(TokenKind::RightParen) {
        Some(parse_expr(parser)?)
    } else {
        None
    };
    parser.expect(TokenKind::RightParen, "Expect ')' after for clauses.")?;

    let mut body = parse_body_stmt(parser)?;

    if let Some(increment) = increment {
        body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
    }

    body = Stmt::While {
        condition: condition.unwrap_or_else(|| Expr::boolean(true)),
        body: Box::new(body),
    };

    if let Some(initializer) = initializer {
        body = Stmt::Block(vec![initializer, body]);
    }

    Ok(body)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::RightParen, "Expect ')' after if condition.")?;

    let then_branch = Box::new(parse_body_stmt(parser)?);
    // A dangling `else` binds to the nearest `if`.
    let else_branch = if parser.match_kind(TokenKind::Else) {
        Some(Box::new(parse_body_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If {
        condition,
        then_branch,
        else_branch,
    })
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let value = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon, "Expect ';' after value.")?;

    Ok(Stmt::Print(value))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let keyword = parser.advance().clone();

    let value = if !parser.check(TokenKind::Semicolon) {
        Some(parse_expr(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon, "Expect ';' after return value.")?;

    Ok(Stmt::Return { keyword, value })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::RightParen, "Expect ')' after condition.")?;

    let body = Box::new(parse_body_stmt(parser)?);

    Ok(Stmt::While { condition, body })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    Ok(Stmt::Block(parse_block_body(parser)?))
}

/// Declarations up to the closing `}`, which is consumed. The opening `{`
/// must already be consumed.
pub fn parse_block_body(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.nested(|parser| {
        let mut statements = Vec::new();
        while !parser.check(TokenKind::RightBrace) && parser.has_tokens() {
            statements.push(parse_declaration(parser));
        }

        parser.expect(TokenKind::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    })
}
