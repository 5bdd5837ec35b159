use crate::{
    ast::expressions::{Expr, Literal},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    MAX_ARITY,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.nested(parse_assignment_expr)
}

/// Right-associative: the value side recurses into assignment again.
///
/// A left side that is not a bare variable is reported, and the left side
/// itself is returned so the statement still parses.
pub fn parse_assignment_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let expr = parse_binary_expr(parser, BindingPower::LogicalOr)?;

    if !parser.match_kind(TokenKind::Equal) {
        return Ok(expr);
    }

    let equals = parser.previous().clone();
    let value = parse_assignment_expr(parser)?;

    match expr {
        Expr::Variable(name) => Ok(Expr::Assign {
            name,
            value: Box::new(value),
        }),
        other => {
            parser.report(Error::at_token(ErrorImpl::InvalidAssignmentTarget, &equals));
            Ok(other)
        }
    }
}

/// One left-associative precedence layer.
pub fn parse_binary_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    let mut left = parse_operand(parser, bp.next())?;

    while parser.match_any(bp.operators()) {
        let operator = parser.previous().clone();
        let right = parse_operand(parser, bp.next())?;

        left = if bp.is_logical() {
            Expr::Logical {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }
        } else {
            Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }
        };
    }

    Ok(left)
}

fn parse_operand(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    if bp >= BindingPower::Unary {
        parse_prefix_expr(parser)
    } else {
        parse_binary_expr(parser, bp)
    }
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if !parser.match_any(BindingPower::Unary.operators()) {
        return parse_call_expr(parser);
    }

    let operator = parser.previous().clone();
    let right = parser.nested(parse_prefix_expr)?;

    Ok(Expr::Unary {
        operator,
        right: Box::new(right),
    })
}

/// A primary followed by any number of `(...)` argument lists, so `f()()`
/// calls the result of `f()`.
pub fn parse_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut expr = parse_primary_expr(parser)?;

    while parser.match_kind(TokenKind::LeftParen) {
        expr = finish_call_expr(parser, expr)?;
    }

    Ok(expr)
}

fn finish_call_expr(parser: &mut Parser, callee: Expr) -> Result<Expr, Error> {
    let mut arguments = vec![];

    if !parser.check(TokenKind::RightParen) {
        loop {
            if arguments.len() >= MAX_ARITY {
                let error = Error::at_token(ErrorImpl::TooManyArguments, parser.current_token());
                parser.report(error);
            }

            arguments.push(parse_expr(parser)?);

            if !parser.match_kind(TokenKind::Comma) {
                break;
            }
        }
    }

    let paren = parser.expect(TokenKind::RightParen, "Expect ')' after arguments.")?;

    Ok(Expr::Call {
        callee: Box::new(callee),
        paren,
        arguments,
    })
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::False => {
            parser.advance();
            Ok(Expr::boolean(false))
        }
        TokenKind::True => {
            parser.advance();
            Ok(Expr::boolean(true))
        }
        TokenKind::Nil => {
            parser.advance();
            Ok(Expr::Literal(Literal::Nil))
        }
        TokenKind::Number | TokenKind::String => {
            let literal = parser.advance().literal.clone().unwrap_or(Literal::Nil);
            Ok(Expr::Literal(literal))
        }
        TokenKind::Identifier => Ok(Expr::Variable(parser.advance().clone())),
        TokenKind::LeftParen => {
            parser.advance();
            let expr = parse_expr(parser)?;
            parser.expect(TokenKind::RightParen, "Expect ')' after expression.")?;

            Ok(Expr::Grouping(Box::new(expr)))
        }
        _ => Err(Error::at_token(ErrorImpl::ExpectedExpression, parser.current_token())),
    }
}
