use std::rc::Rc;

use log::{debug, info, trace};

use crate::{
    ast::expressions::Literal,
    errors::errors::{DiagnosticSink, Error, ErrorImpl},
    Position, Span, MK_SPAN, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Single-use scanner over one source text.
///
/// `start` marks the first character of the lexeme being scanned and
/// `current` the next character to read. Both are character offsets.
pub struct Lexer<'s> {
    chars: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: u32,
    file: Rc<String>,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &str, file: Option<String>, sink: &'s mut dyn DiagnosticSink) -> Lexer<'s> {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            chars: source.chars().collect(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
            file: file_name,
            sink,
        }
    }

    pub fn advance(&mut self) -> char {
        let ch = self.chars[self.current];
        self.current += 1;
        ch
    }

    /// Consumes the next character only if it is `expected`.
    pub fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() != Some(expected) {
            return false;
        }

        self.current += 1;
        true
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    pub fn at_eof(&self) -> bool {
        self.current >= self.chars.len()
    }

    pub fn lexeme(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    pub fn push(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let token = MK_TOKEN!(
            kind,
            self.lexeme(),
            literal,
            self.line,
            MK_SPAN!(self.start, self.current, self.file)
        );
        trace!("scanned {}", token.debug());
        self.tokens.push(token);
    }

    fn error(&mut self, error_impl: ErrorImpl, offset: usize, line: u32) {
        debug!("lexical error on line {}: {}", line, error_impl);
        let position = Position(offset as u32, Rc::clone(&self.file));
        self.sink.report(Error::lexical(error_impl, position, line));
    }

    fn scan_token(&mut self) {
        let ch = self.advance();
        match ch {
            '(' => self.push(TokenKind::LeftParen, None),
            ')' => self.push(TokenKind::RightParen, None),
            '{' => self.push(TokenKind::LeftBrace, None),
            '}' => self.push(TokenKind::RightBrace, None),
            ',' => self.push(TokenKind::Comma, None),
            '.' => self.push(TokenKind::Dot, None),
            '-' => self.push(TokenKind::Minus, None),
            '+' => self.push(TokenKind::Plus, None),
            ';' => self.push(TokenKind::Semicolon, None),
            '*' => self.push(TokenKind::Star, None),
            '!' => {
                let kind = if self.advance_if('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.push(kind, None);
            }
            '=' => {
                let kind = if self.advance_if('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.push(kind, None);
            }
            '<' => {
                let kind = if self.advance_if('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.push(kind, None);
            }
            '>' => {
                let kind = if self.advance_if('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.push(kind, None);
            }
            '/' => {
                if self.advance_if('/') {
                    line_comment_handler(self);
                } else if self.advance_if('*') {
                    block_comment_handler(self);
                } else {
                    self.push(TokenKind::Slash, None);
                }
            }
            ' ' | '\t' | '\r' => {}
            '\n' => self.line += 1,
            '"' => string_handler(self),
            c if c.is_ascii_digit() => number_handler(self),
            c if is_alpha(c) => symbol_handler(self),
            c => self.error(ErrorImpl::UnexpectedCharacter { character: c }, self.start, self.line),
        }
    }
}

fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_alphanumeric(ch: char) -> bool {
    is_alpha(ch) || ch.is_ascii_digit()
}

fn line_comment_handler(lexer: &mut Lexer) {
    while let Some(ch) = lexer.peek() {
        if ch == '\n' {
            break;
        }
        lexer.advance();
    }
}

// Block comments nest: `/* a /* b */ c */` is a single comment.
fn block_comment_handler(lexer: &mut Lexer) {
    let start_line = lexer.line;
    let mut depth = 1;

    while depth > 0 {
        let Some(ch) = lexer.peek() else {
            lexer.error(ErrorImpl::UnterminatedComment, lexer.start, start_line);
            return;
        };
        lexer.advance();

        match ch {
            '\n' => lexer.line += 1,
            '/' if lexer.peek() == Some('*') => {
                lexer.advance();
                depth += 1;
            }
            '*' if lexer.peek() == Some('/') => {
                lexer.advance();
                depth -= 1;
            }
            _ => {}
        }
    }
}

fn number_handler(lexer: &mut Lexer) {
    while lexer.peek().is_some_and(|ch| ch.is_ascii_digit()) {
        lexer.advance();
    }

    // A trailing '.' only belongs to the number when a digit follows it.
    if lexer.peek() == Some('.') && lexer.peek_next().is_some_and(|ch| ch.is_ascii_digit()) {
        lexer.advance();
        while lexer.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            lexer.advance();
        }
    }

    let literal = lexer.lexeme().parse::<f64>().ok().map(Literal::Number);
    lexer.push(TokenKind::Number, literal);
}

fn string_handler(lexer: &mut Lexer) {
    while let Some(ch) = lexer.peek() {
        if ch == '"' {
            break;
        }

        if ch == '\n' {
            lexer.line += 1;
        }
        lexer.advance();

        // An escaped character never closes the literal.
        if ch == '\\' {
            if let Some(escaped) = lexer.peek() {
                if escaped == '\n' {
                    lexer.line += 1;
                }
                lexer.advance();
            }
        }
    }

    if lexer.at_eof() {
        lexer.error(ErrorImpl::UnterminatedString, lexer.start, lexer.line);
        return;
    }

    // The closing quote
    lexer.advance();

    let raw: String = lexer.chars[(lexer.start + 1)..(lexer.current - 1)].iter().collect();
    let value = unescape(&raw);
    lexer.push(TokenKind::String, Some(Literal::String(value)));
}

fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            _ => {
                result.push(ch); // Keep the backslash
                continue;
            }
        }
        chars.next();
    }

    result
}

fn symbol_handler(lexer: &mut Lexer) {
    while lexer.peek().is_some_and(is_alphanumeric) {
        lexer.advance();
    }

    let kind = RESERVED_LOOKUP
        .get(lexer.lexeme().as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);
    lexer.push(kind, None);
}

/// Scans `source` into tokens, reporting lexical errors to `sink`.
///
/// Always returns a sequence ending in exactly one `EOF` token, even when
/// errors were reported.
pub fn tokenize(source: &str, file: Option<String>, sink: &mut dyn DiagnosticSink) -> Vec<Token> {
    let mut lex = Lexer::new(source, file, sink);
    info!("Tokenizing {} ({} chars)", lex.file, lex.chars.len());

    while !lex.at_eof() {
        lex.start = lex.current;
        lex.scan_token();
    }

    lex.start = lex.current;
    let eof = MK_TOKEN!(
        TokenKind::EOF,
        String::new(),
        None,
        lex.line,
        MK_SPAN!(lex.current, lex.current, lex.file)
    );
    lex.tokens.push(eof);

    info!("Scanned {} tokens", lex.tokens.len());
    lex.tokens
}
