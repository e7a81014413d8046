//! minic source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`cursor`]: Positional view over the tokens with mark/reset
//! - [`symbols`]: Prototype, function and variable tables with rollback
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Language
//!
//! - One type: `int`
//! - Top level: function declarations and function definitions
//! - Bodies: `int` locals, then assignment, call, `return` and empty statements
//! - Expressions: `+ - * /`, calls, variables, integer literals
//! - `/* ... */` comments
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with ordered alternatives and
//! backtracking. Name resolution, arity checks and redefinition checks run
//! during parsing.

pub mod ast;
pub mod cursor;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod symbols;

use ast::TranslationUnit;
use lexer::{LexError, Lexer, Token};
use parse::{ParseError, Parser};

/// Tokenize `source`. Fails without returning any tokens on the first
/// lexical error.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Parse a token sequence with the default intrinsics.
pub fn parse(tokens: Vec<Token>) -> Result<TranslationUnit, ParseError> {
    Parser::new(tokens).parse()
}
