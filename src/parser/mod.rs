//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the recursive-descent parser that transforms a
//! token sequence into a list of statements. It handles:
//!
//! - Declaration and statement parsing, dispatched on the leading token
//! - Expression parsing through layered precedence rules
//! - Desugaring of `for` loops into blocks and `while` loops
//! - Error reporting and panic-mode recovery
//!
//! Statement handlers and operator layers are described by the tables in
//! `lookups`.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
