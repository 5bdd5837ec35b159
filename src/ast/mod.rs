/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - expressions: The expression variants and literal values
/// - statements: The statement variants, including the recovery placeholder
/// - printer: Source and prefix renderings of trees
pub mod expressions;
pub mod printer;
pub mod statements;
