//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a sequence of tokens for parsing. It handles:
//!
//! - A single left-to-right pass with maximal munch for two-character operators
//! - Recognition of keywords, identifiers, number and string literals
//! - Line tracking for error reporting
//! - Line comments, nested block comments and whitespace

pub mod lexer;
pub mod tokens;
