//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_SPAN!` - Creates a Span between two offsets of one source

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's lexeme
/// * `$literal` - The decoded literal, if any
/// * `$line` - The source line
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let literal = Some(Literal::Number(42.0));
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), literal, 1, span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $literal:expr, $line:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            literal: $literal,
            line: $line,
            span: $span,
        }
    };
}

/// Creates a Span covering `$start..$end` in `$file`.
#[macro_export]
macro_rules! MK_SPAN {
    ($start:expr, $end:expr, $file:expr) => {
        Span {
            start: Position($start as u32, Rc::clone(&$file)),
            end: Position($end as u32, Rc::clone(&$file)),
        }
    };
}
