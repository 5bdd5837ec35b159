#![allow(clippy::module_inception)]

use std::rc::Rc;

use log::info;

use crate::{
    ast::statements::{count_invalid, Stmt},
    errors::errors::{DiagnosticBag, Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

/// Upper bound on function parameters and call arguments.
pub const MAX_ARITY: usize = 255;

/// Upper bound on how deeply statements and expressions may nest.
pub const MAX_NESTING: usize = 32;

/// Character offset into a source, plus the source's name.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Result of running the whole front end over one source.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Vec<Stmt>,
    pub tokens_scanned: usize,
    pub diagnostics: Vec<Error>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// A program is only safe to hand to an evaluator when neither stage
    /// reported anything, including the non-unwinding diagnostics whose
    /// nodes were kept in a degraded form.
    pub fn is_executable(&self) -> bool {
        !self.has_errors() && count_invalid(&self.program) == 0
    }
}

/// Lexes and parses `source`, collecting diagnostics from both stages.
pub fn parse_source(source: &str, file: Option<String>) -> ParseOutput {
    let mut diagnostics = DiagnosticBag::new();

    let tokens = tokenize(source, file, &mut diagnostics);
    let tokens_scanned = tokens.len();
    let program = parse(tokens, &mut diagnostics);

    info!(
        "Front end finished: {} statements, {} diagnostics",
        program.len(),
        diagnostics.len()
    );

    ParseOutput {
        program,
        tokens_scanned,
        diagnostics: diagnostics.into_vec(),
    }
}

/// Finds the line holding the character at `position`.
///
/// Returns the 1-based line number, the line's text and the column of the
/// character inside it, or `None` when `position` is past the end.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    let mut start = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let end = start + line.chars().count();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        start = end;
    }

    None
}


/// Renders an error with the offending source line and a caret under it.
pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: message
        -> script.lox
           |
        20 | var a = #;
           | --------^
    */

    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error));
    } else {
        out.push_str(&format!(
            "Error: {} ({}; {})\n",
            error.get_error_name(),
            error,
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", position.1));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return out.trim_end().to_string();
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (string.chars().skip(start).collect(), start)
}
