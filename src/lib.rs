//! # Introduction
//!
//! minic is the front end for a minimal C-like language with a single
//! integer type. It turns source text into a validated AST for a downstream
//! code generator.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → TranslationUnit
//! ```
//!
//! 1. [`parser::lex`] — tokenises the whole input eagerly. Unknown
//!    characters and unterminated comments are fatal.
//! 2. [`parser::parse`] — recursive descent with backtracking. Declaration
//!    before use, call arity and redefinitions are checked while parsing.
//!
//! ```
//! let unit = minic::parse_source("int main() { printnum(42); return 0; }").unwrap();
//! assert_eq!(unit.functions[0].name(), "main");
//! ```

pub mod error;
pub mod parser;

pub use error::Error;
pub use parser::ast::TranslationUnit;

/// Lex and parse `source` with the default intrinsics.
pub fn parse_source(source: &str) -> Result<TranslationUnit, Error> {
    let tokens = parser::lex(source)?;
    Ok(parser::parse(tokens)?)
}
