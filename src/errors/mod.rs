//! Error types and diagnostic reporting for the front end.
//!
//! This module defines the diagnostics produced while lexing and parsing.
//! It includes:
//!
//! - Error structures carrying the source position and line
//! - The closed set of lexical and syntactic error causes
//! - The `DiagnosticSink` seam and two bundled sinks
//! - Helpful tips for each error cause

pub mod errors;
