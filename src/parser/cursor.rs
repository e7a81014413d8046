//! Positional view over a token sequence.
//!
//! [`TokenCursor::mark`] and [`TokenCursor::reset`] are the backtracking
//! primitive the parser builds on: every rule that can fail after consuming
//! tokens marks on entry and resets on failure.

use super::lexer::{Token, TokenKind};

/// Saved cursor position. Only meaningful for the cursor that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

impl Mark {
    pub fn index(&self) -> usize {
        self.0
    }
}

pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenCursor {
    /// Wrap a token sequence. An `EndOfInput` token is appended if the
    /// sequence does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfInput) {
            let location = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token::new(TokenKind::EndOfInput, "", location));
        }
        Self { tokens, index: 0 }
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// Move forward by one token; never past `EndOfInput`.
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.index += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::EndOfInput
    }

    pub fn mark(&self) -> Mark {
        Mark(self.index)
    }

    pub fn reset(&mut self, mark: Mark) {
        debug_assert!(mark.0 < self.tokens.len());
        self.index = mark.0.min(self.tokens.len() - 1);
    }

    /// Back to the first token.
    pub fn rewind(&mut self) {
        self.index = 0;
    }
}
