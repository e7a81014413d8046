//! Crate-level error type for callers going straight from text to AST.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn location(&self) -> SourceLocation {
        match self {
            Error::Lex(err) => err.location(),
            Error::Parse(err) => err.location,
        }
    }
}
