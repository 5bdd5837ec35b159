//! Renders trees back to text.
//!
//! `to_source` produces canonical source that parses back into an equal
//! program; `to_sexpr` is a compact prefix form for debugging.

use super::{
    expressions::{Expr, Literal},
    statements::Stmt,
};

const INDENT: &str = "    ";

/// Serializes a program to source text, one statement per line.
pub fn to_source(program: &[Stmt]) -> String {
    let mut printer = SourcePrinter::default();
    for stmt in program {
        printer.stmt(stmt);
    }
    printer.out
}

/// Serializes a single expression to source text.
pub fn expr_to_source(expr: &Expr) -> String {
    let mut printer = SourcePrinter::default();
    printer.expr(expr);
    printer.out
}

/// Prefix rendering, e.g. `(+ 1 (* 2 3))`.
pub fn to_sexpr(expr: &Expr) -> String {
    match expr {
        Expr::Literal(Literal::String(value)) => format!("\"{}\"", value),
        Expr::Literal(literal) => literal.to_string(),
        Expr::Grouping(inner) => format!("(group {})", to_sexpr(inner)),
        Expr::Unary { operator, right } => format!("({} {})", operator.value, to_sexpr(right)),
        Expr::Binary { left, operator, right } | Expr::Logical { left, operator, right } => {
            format!("({} {} {})", operator.value, to_sexpr(left), to_sexpr(right))
        }
        Expr::Variable(name) => name.value.clone(),
        Expr::Assign { name, value } => format!("(= {} {})", name.value, to_sexpr(value)),
        Expr::Call { callee, arguments, .. } => {
            let mut out = format!("(call {}", to_sexpr(callee));
            for argument in arguments {
                out.push(' ');
                out.push_str(&to_sexpr(argument));
            }
            out.push(')');
            out
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\0' => result.push_str("\\0"),
            _ => result.push(ch),
        }
    }
    result
}

#[derive(Default)]
struct SourcePrinter {
    out: String,
    indent: usize,
}

impl SourcePrinter {
    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.pad();
        self.stmt_inline(stmt);
        self.out.push('\n');
    }

    fn block(&mut self, body: &[Stmt]) {
        self.out.push('{');
        self.out.push('\n');
        self.indent += 1;
        for stmt in body {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.pad();
        self.out.push('}');
    }

    /// Body of an `if`/`while`: blocks stay on the header line, anything
    /// else goes on its own indented line.
    fn branch(&mut self, stmt: &Stmt) {
        if let Stmt::Block(body) = stmt {
            self.out.push(' ');
            self.block(body);
        } else {
            self.out.push('\n');
            self.indent += 1;
            self.pad();
            self.stmt_inline(stmt);
            self.indent -= 1;
        }
    }

    fn stmt_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(expr) => {
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::Print(expr) => {
                self.out.push_str("print ");
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::Var { name, initializer } => {
                self.out.push_str("var ");
                self.out.push_str(&name.value);
                if let Some(initializer) = initializer {
                    self.out.push_str(" = ");
                    self.expr(initializer);
                }
                self.out.push(';');
            }
            Stmt::Block(body) => self.block(body),
            Stmt::If { condition, then_branch, else_branch } => {
                self.out.push_str("if (");
                self.expr(condition);
                self.out.push(')');
                self.branch(then_branch);
                if let Some(else_branch) = else_branch {
                    if matches!(**then_branch, Stmt::Block(_)) {
                        self.out.push(' ');
                    } else {
                        self.out.push('\n');
                        self.pad();
                    }
                    self.out.push_str("else");
                    self.branch(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.out.push_str("while (");
                self.expr(condition);
                self.out.push(')');
                self.branch(body);
            }
            Stmt::Function { name, params, body } => {
                self.out.push_str("fun ");
                self.out.push_str(&name.value);
                self.out.push('(');
                let names: Vec<&str> = params.iter().map(|param| param.value.as_str()).collect();
                self.out.push_str(&names.join(", "));
                self.out.push_str(") ");
                self.block(body);
            }
            Stmt::Return { value, .. } => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value);
                }
                self.out.push(';');
            }
            Stmt::Invalid => self.out.push_str("// invalid statement"),
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(Literal::Number(value)) => self.out.push_str(&value.to_string()),
            Expr::Literal(Literal::String(value)) => {
                self.out.push('"');
                self.out.push_str(&escape_string(value));
                self.out.push('"');
            }
            Expr::Literal(literal) => self.out.push_str(&literal.to_string()),
            Expr::Grouping(inner) => {
                self.out.push('(');
                self.expr(inner);
                self.out.push(')');
            }
            Expr::Unary { operator, right } => {
                self.out.push_str(&operator.value);
                self.expr(right);
            }
            Expr::Binary { left, operator, right } | Expr::Logical { left, operator, right } => {
                self.expr(left);
                self.out.push(' ');
                self.out.push_str(&operator.value);
                self.out.push(' ');
                self.expr(right);
            }
            Expr::Variable(name) => self.out.push_str(&name.value),
            Expr::Assign { name, value } => {
                self.out.push_str(&name.value);
                self.out.push_str(" = ");
                self.expr(value);
            }
            Expr::Call { callee, arguments, .. } => {
                self.expr(callee);
                self.out.push('(');
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(argument);
                }
                self.out.push(')');
            }
        }
    }
}
