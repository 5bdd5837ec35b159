//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs including:
//! - Variable and function declarations
//! - Expression precedence and associativity
//! - Control flow statements and `for` desugaring
//! - Calls and assignment targets
//! - Error reporting and recovery

use std::rc::Rc;

use crate::{
    ast::{
        expressions::{Expr, Literal},
        printer::to_sexpr,
        statements::{count_invalid, Stmt},
    },
    errors::errors::{DiagnosticBag, Error, ErrorImpl, ErrorLocation},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position, Span, MAX_NESTING,
};

use super::parser::parse;

fn parse_with_errors(source: &str) -> (Vec<Stmt>, Vec<Error>) {
    let mut diagnostics = DiagnosticBag::new();
    let tokens = tokenize(source, Some("test.lox".to_string()), &mut diagnostics);
    let program = parse(tokens, &mut diagnostics);
    (program, diagnostics.into_vec())
}

fn parse_ok(source: &str) -> Vec<Stmt> {
    let (program, errors) = parse_with_errors(source);
    assert!(errors.is_empty(), "unexpected diagnostics: {:?}", errors);
    program
}

/// The single expression of a one-statement program like `1 + 2;`.
fn parse_expression(source: &str) -> Expr {
    match parse_ok(source).remove(0) {
        Stmt::Expression(expr) => expr,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn tok(kind: TokenKind, value: &str) -> Token {
    let file = Rc::new("expected".to_string());
    let literal = match kind {
        TokenKind::Number => value.parse().ok().map(Literal::Number),
        _ => None,
    };
    Token {
        kind,
        value: value.to_string(),
        literal,
        line: 0,
        span: Span {
            start: Position(0, Rc::clone(&file)),
            end: Position(0, file),
        },
    }
}

fn var(name: &str) -> Expr {
    Expr::Variable(tok(TokenKind::Identifier, name))
}

fn binary(left: Expr, kind: TokenKind, op: &str, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator: tok(kind, op),
        right: Box::new(right),
    }
}

#[test]
fn test_parse_precedence() {
    let expr = parse_expression("1 + 2 * 3;");

    assert_eq!(
        expr,
        binary(
            Expr::number(1.0),
            TokenKind::Plus,
            "+",
            binary(Expr::number(2.0), TokenKind::Star, "*", Expr::number(3.0)),
        )
    );
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_ok("var x = 1;");

    assert_eq!(
        program,
        vec![Stmt::Var {
            name: tok(TokenKind::Identifier, "x"),
            initializer: Some(Expr::number(1.0)),
        }]
    );

    let program = parse_ok("var y;");
    assert!(matches!(&program[0], Stmt::Var { initializer: None, .. }));
}

#[test]
fn test_parse_left_associativity() {
    assert_eq!(to_sexpr(&parse_expression("1 - 2 - 3;")), "(- (- 1 2) 3)");
    assert_eq!(to_sexpr(&parse_expression("8 / 4 * 2;")), "(* (/ 8 4) 2)");
    assert_eq!(
        to_sexpr(&parse_expression("1 < 2 == 3 >= 4 != true;")),
        "(!= (== (< 1 2) (>= 3 4)) true)"
    );
}

#[test]
fn test_parse_grouping() {
    assert_eq!(to_sexpr(&parse_expression("(1 + 2) * 3;")), "(* (group (+ 1 2)) 3)");
}

#[test]
fn test_parse_unary() {
    assert_eq!(to_sexpr(&parse_expression("!-x;")), "(! (- x))");
    assert_eq!(to_sexpr(&parse_expression("-a * -b;")), "(* (- a) (- b))");
}

#[test]
fn test_parse_logical_expression() {
    let expr = parse_expression("a or b and c;");
    assert_eq!(to_sexpr(&expr), "(or a (and b c))");

    match expr {
        Expr::Logical { operator, right, .. } => {
            assert_eq!(operator.kind, TokenKind::Or);
            assert!(matches!(*right, Expr::Logical { .. }));
        }
        other => panic!("expected a logical expression, got {:?}", other),
    }

    // Equality binds tighter than `and`.
    assert_eq!(to_sexpr(&parse_expression("a == b and c;")), "(and (== a b) c)");
}

#[test]
fn test_parse_literals() {
    assert_eq!(parse_expression("nil;"), Expr::Literal(Literal::Nil));
    assert_eq!(parse_expression("true;"), Expr::boolean(true));
    assert_eq!(parse_expression("false;"), Expr::boolean(false));
    assert_eq!(
        parse_expression("\"hi\";"),
        Expr::Literal(Literal::String("hi".to_string()))
    );
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let expr = parse_expression("a = b = c;");

    assert_eq!(
        expr,
        Expr::Assign {
            name: tok(TokenKind::Identifier, "a"),
            value: Box::new(Expr::Assign {
                name: tok(TokenKind::Identifier, "b"),
                value: Box::new(var("c")),
            }),
        }
    );
}

#[test]
fn test_invalid_assignment_target_degrades_to_left_side() {
    let (program, errors) = parse_with_errors("a + b = c;\nprint 1;");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_impl(), &ErrorImpl::InvalidAssignmentTarget);
    assert_eq!(errors[0].to_string(), "[line 1] Error at '=': Invalid assignment target.");

    assert_eq!(program.len(), 2);
    assert_eq!(
        program[0],
        Stmt::Expression(binary(var("a"), TokenKind::Plus, "+", var("b")))
    );
    assert!(matches!(program[1], Stmt::Print(_)));
}

#[test]
fn test_parse_function_call() {
    let expr = parse_expression("f(1)(2, 3)();");
    assert_eq!(to_sexpr(&expr), "(call (call (call f 1) 2 3))");

    let expr = parse_expression("g(\n1,\n2\n);");
    match expr {
        Expr::Call { paren, arguments, .. } => {
            assert_eq!(paren.kind, TokenKind::RightParen);
            assert_eq!(paren.line, 4);
            assert_eq!(arguments.len(), 2);
        }
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_ok("fun add(a, b) { return a + b; }");

    match &program[0] {
        Stmt::Function { name, params, body } => {
            assert_eq!(name.value, "add");
            let names: Vec<&str> = params.iter().map(|param| param.value.as_str()).collect();
            assert_eq!(names, vec!["a", "b"]);
            assert_eq!(body.len(), 1);
            match &body[0] {
                Stmt::Return { keyword, value } => {
                    assert_eq!(keyword.kind, TokenKind::Return);
                    assert_eq!(to_sexpr(value.as_ref().unwrap()), "(+ a b)");
                }
                other => panic!("expected a return, got {:?}", other),
            }
        }
        other => panic!("expected a function, got {:?}", other),
    }

    let program = parse_ok("fun noop() { return; }");
    match &program[0] {
        Stmt::Function { params, body, .. } => {
            assert!(params.is_empty());
            assert!(matches!(&body[0], Stmt::Return { value: None, .. }));
        }
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_too_many_parameters_is_reported_once() {
    let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
    let source = format!("fun f({}) {{}}", params.join(", "));
    let (program, errors) = parse_with_errors(&source);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_impl(), &ErrorImpl::TooManyParameters);
    assert_eq!(errors[0].get_location(), &ErrorLocation::AtToken("p255".to_string()));

    match &program[0] {
        Stmt::Function { params, .. } => assert_eq!(params.len(), 256),
        other => panic!("expected a function, got {:?}", other),
    }
}

#[test]
fn test_too_many_arguments_is_reported() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("f({});", args.join(", "));
    let (program, errors) = parse_with_errors(&source);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_impl(), &ErrorImpl::TooManyArguments);

    match &program[0] {
        Stmt::Expression(Expr::Call { arguments, .. }) => assert_eq!(arguments.len(), 256),
        other => panic!("expected a call, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else() {
    let program = parse_ok("if (a) print 1; else print 2;");

    match &program[0] {
        Stmt::If { condition, then_branch, else_branch } => {
            assert_eq!(condition, &var("a"));
            assert_eq!(**then_branch, Stmt::Print(Expr::number(1.0)));
            assert_eq!(else_branch.as_deref(), Some(&Stmt::Print(Expr::number(2.0))));
        }
        other => panic!("expected an if, got {:?}", other),
    }
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let program = parse_ok("if (a) if (b) print 1; else print 2;");

    match &program[0] {
        Stmt::If { then_branch, else_branch, .. } => {
            assert!(else_branch.is_none());
            assert!(matches!(**then_branch, Stmt::If { else_branch: Some(_), .. }));
        }
        other => panic!("expected an if, got {:?}", other),
    }
}

#[test]
fn test_parse_while_loop() {
    let program = parse_ok("while (x < 10) { x = x + 1; }");

    match &program[0] {
        Stmt::While { condition, body } => {
            assert_eq!(to_sexpr(condition), "(< x 10)");
            assert!(matches!(**body, Stmt::Block(ref stmts) if stmts.len() == 1));
        }
        other => panic!("expected a while, got {:?}", other),
    }
}

#[test]
fn test_for_loop_desugars_to_while() {
    let program = parse_ok("for (var i = 0; i < 3; i = i + 1) print i;");

    let expected = Stmt::Block(vec![
        Stmt::Var {
            name: tok(TokenKind::Identifier, "i"),
            initializer: Some(Expr::number(0.0)),
        },
        Stmt::While {
            condition: binary(var("i"), TokenKind::Less, "<", Expr::number(3.0)),
            body: Box::new(Stmt::Block(vec![
                Stmt::Print(var("i")),
                Stmt::Expression(Expr::Assign {
                    name: tok(TokenKind::Identifier, "i"),
                    value: Box::new(binary(var("i"), TokenKind::Plus, "+", Expr::number(1.0))),
                }),
            ])),
        },
    ]);

    assert_eq!(program, vec![expected]);
}

#[test]
fn test_for_loop_with_empty_clauses() {
    let program = parse_ok("for (;;) print 1;");

    assert_eq!(
        program,
        vec![Stmt::While {
            condition: Expr::boolean(true),
            body: Box::new(Stmt::Print(Expr::number(1.0))),
        }]
    );

    let program = parse_ok("for (i = 0; i < 1;) x;");
    match &program[0] {
        Stmt::Block(stmts) => {
            assert_eq!(stmts.len(), 2);
            assert!(matches!(&stmts[0], Stmt::Expression(Expr::Assign { .. })));
            assert!(matches!(&stmts[1], Stmt::While { .. }));
        }
        other => panic!("expected a block, got {:?}", other),
    }
}

#[test]
fn test_parse_nested_blocks() {
    let program = parse_ok("{ var a = 1; { print a; } }");

    match &program[0] {
        Stmt::Block(outer) => {
            assert_eq!(outer.len(), 2);
            assert!(matches!(&outer[1], Stmt::Block(inner) if inner.len() == 1));
        }
        other => panic!("expected a block, got {:?}", other),
    }
}

#[test]
fn test_recovery_keeps_independent_statements() {
    let source = "print 1;\nvar = 2;\nprint 3;\nprint (4;\nprint 5;";
    let (program, errors) = parse_with_errors(source);

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].get_line(), 2);
    assert_eq!(errors[0].to_string(), "[line 2] Error at '=': Expect variable name.");
    assert_eq!(errors[1].get_line(), 4);
    assert_eq!(errors[1].to_string(), "[line 4] Error at ';': Expect ')' after expression.");

    assert_eq!(
        program,
        vec![
            Stmt::Print(Expr::number(1.0)),
            Stmt::Invalid,
            Stmt::Print(Expr::number(3.0)),
            Stmt::Invalid,
            Stmt::Print(Expr::number(5.0)),
        ]
    );
    assert_eq!(count_invalid(&program), 2);
}

#[test]
fn test_synchronize_stops_before_statement_keyword() {
    let (program, errors) = parse_with_errors("print ) 1 2 while (true) print 3;");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_impl(), &ErrorImpl::ExpectedExpression);
    assert_eq!(program.len(), 2);
    assert!(program[0].is_invalid());
    assert!(matches!(program[1], Stmt::While { .. }));
}

#[test]
fn test_error_inside_block_is_contained() {
    let (program, errors) = parse_with_errors("{ print ; print 2; }");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        program,
        vec![Stmt::Block(vec![Stmt::Invalid, Stmt::Print(Expr::number(2.0))])]
    );
}

#[test]
fn test_errors_at_end_of_input() {
    let (program, errors) = parse_with_errors("print 1");
    assert_eq!(program, vec![Stmt::Invalid]);
    assert_eq!(errors[0].to_string(), "[line 1] Error at end: Expect ';' after value.");

    let (program, errors) = parse_with_errors("{ print 1;");
    assert_eq!(program, vec![Stmt::Invalid]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "[line 1] Error at end: Expect '}' after block.");
}

#[test]
fn test_declaration_in_statement_position() {
    let (program, errors) = parse_with_errors("if (true) fun f() {}");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_impl(), &ErrorImpl::ExpectedExpression);
    assert!(program[0].is_invalid());
}

#[test]
fn test_parse_without_eof_token() {
    let mut diagnostics = DiagnosticBag::new();
    let mut tokens = tokenize("print 1;", None, &mut diagnostics);
    tokens.pop();

    let program = parse(tokens, &mut diagnostics);
    assert_eq!(program, vec![Stmt::Print(Expr::number(1.0))]);
    assert!(!diagnostics.had_error());

    let program = parse(vec![], &mut diagnostics);
    assert!(program.is_empty());
}

#[test]
fn test_deeply_nested_grouping_is_reported() {
    let depth = MAX_NESTING * 8;
    let source = format!("print {}1{};\nprint 2;", "(".repeat(depth), ")".repeat(depth));
    let (program, errors) = parse_with_errors(&source);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_impl(), &ErrorImpl::TooDeeplyNested);
    assert_eq!(errors[0].get_location(), &ErrorLocation::AtToken("(".to_string()));
    assert_eq!(program, vec![Stmt::Invalid, Stmt::Print(Expr::number(2.0))]);
}

#[test]
fn test_deeply_nested_unary_is_reported() {
    let source = format!("{}x;", "!".repeat(MAX_NESTING * 8));
    let (program, errors) = parse_with_errors(&source);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_impl(), &ErrorImpl::TooDeeplyNested);
    assert_eq!(program, vec![Stmt::Invalid]);
}

#[test]
fn test_deeply_nested_blocks_recover() {
    let depth = MAX_NESTING * 8;
    let source = format!("{}print 1;{}", "{".repeat(depth), "}".repeat(depth));
    let (program, errors) = parse_with_errors(&source);

    // The innermost open block gives up on the nested blocks and on the
    // `print`, which is still too deep. The unmatched closing braces then
    // fail as a single expression statement.
    let kinds: Vec<&ErrorImpl> = errors.iter().map(|error| error.get_impl()).collect();
    assert_eq!(
        kinds,
        vec![
            &ErrorImpl::TooDeeplyNested,
            &ErrorImpl::TooDeeplyNested,
            &ErrorImpl::ExpectedExpression
        ]
    );
    assert!(matches!(program[0], Stmt::Block(_)));
    assert_eq!(program[1], Stmt::Invalid);
}

#[test]
fn test_deeply_nested_control_flow_does_not_overflow() {
    let depth = MAX_NESTING * 8;
    let source = format!("{}print 1;", "if (true) while (false) ".repeat(depth));
    let (program, errors) = parse_with_errors(&source);

    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .all(|error| error.get_impl() == &ErrorImpl::TooDeeplyNested));
    assert!(count_invalid(&program) > 0);
}

#[test]
fn test_moderate_nesting_is_accepted() {
    let source = format!(
        "{}if (a) print {}1{};{}",
        "{".repeat(8),
        "(".repeat(16),
        ")".repeat(16),
        "}".repeat(8)
    );
    let program = parse_ok(&source);

    assert_eq!(program.len(), 1);
}
