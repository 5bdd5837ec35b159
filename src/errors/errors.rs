use std::fmt::Display;

use log::error;
use thiserror::Error;

use crate::{
    lexer::tokens::{Token, TokenKind},
    Position,
};

/// Where a diagnostic points at inside the source.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorLocation {
    /// Lexical errors only know their line.
    Lexical,
    /// Parse error attributed to a concrete token.
    AtToken(String),
    /// Parse error raised while looking at the end-of-input sentinel.
    AtEnd,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    line: u32,
    location: ErrorLocation,
}

impl Error {
    pub fn new(
        error_impl: ErrorImpl,
        position: Position,
        line: u32,
        location: ErrorLocation,
    ) -> Self {
        Error {
            internal_error: error_impl,
            position,
            line,
            location,
        }
    }

    pub fn lexical(error_impl: ErrorImpl, position: Position, line: u32) -> Self {
        Error::new(error_impl, position, line, ErrorLocation::Lexical)
    }

    pub fn at_token(error_impl: ErrorImpl, token: &Token) -> Self {
        let location = if token.kind == TokenKind::EOF {
            ErrorLocation::AtEnd
        } else {
            ErrorLocation::AtToken(token.value.clone())
        };

        Error::new(error_impl, token.span.start.clone(), token.line, location)
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_line(&self) -> u32 {
        self.line
    }

    pub fn get_location(&self) -> &ErrorLocation {
        &self.location
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Missing tokens and missing expressions abandon the statement being
    /// parsed. Everything else is reported and parsing carries on.
    pub fn is_fatal_to_statement(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::ExpectedToken { .. }
                | ErrorImpl::ExpectedExpression
                | ErrorImpl::TooDeeplyNested
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::ExpectedExpression => "ExpectedExpression",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::TooManyParameters => "TooManyParameters",
            ErrorImpl::TooManyArguments => "TooManyArguments",
            ErrorImpl::TooDeeplyNested => "TooDeeplyNested",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("add a closing `\"` to the string literal"))
            }
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("every `/*` needs a matching `*/`"))
            }
            ErrorImpl::ExpectedToken { expected, .. } => {
                ErrorTip::Suggestion(format!("expected `{}` here", expected))
            }
            ErrorImpl::ExpectedExpression => ErrorTip::None,
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "only a bare variable name can appear on the left of `=`",
            )),
            ErrorImpl::TooManyParameters => ErrorTip::Suggestion(format!(
                "functions take at most {} parameters",
                crate::MAX_ARITY
            )),
            ErrorImpl::TooManyArguments => ErrorTip::Suggestion(format!(
                "calls pass at most {} arguments",
                crate::MAX_ARITY
            )),
            ErrorImpl::TooDeeplyNested => ErrorTip::Suggestion(format!(
                "nesting is limited to {} levels",
                crate::MAX_NESTING
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            ErrorLocation::Lexical => {
                write!(f, "[line {}] Error: {}", self.line, self.internal_error)
            }
            ErrorLocation::AtToken(lexeme) => write!(
                f,
                "[line {}] Error at '{}': {}",
                self.line, lexeme, self.internal_error
            ),
            ErrorLocation::AtEnd => {
                write!(f, "[line {}] Error at end: {}", self.line, self.internal_error)
            }
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("Unexpected character: {character}")]
    UnexpectedCharacter { character: char },
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated block comment.")]
    UnterminatedComment,
    #[error("{message}")]
    ExpectedToken { expected: TokenKind, message: String },
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("Can't have more than 255 parameters.")]
    TooManyParameters,
    #[error("Can't have more than 255 arguments.")]
    TooManyArguments,
    #[error("Too much nesting.")]
    TooDeeplyNested,
}

/// Receives every diagnostic produced by the lexer and the parser.
///
/// Reporting never stops either stage; the caller decides afterwards what to
/// do with a run that produced diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, error: Error);
}

/// Collects diagnostics in the order they were reported.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    errors: Vec<Error>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.errors
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn report(&mut self, error: Error) {
        self.errors.push(error);
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink {
    reported: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, err: Error) {
        self.reported += 1;
        error!("{}", err);
    }
}
