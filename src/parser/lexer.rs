//! Lexer (tokenizer) for minic source code
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the
//! parser. The sequence always ends with exactly one
//! [`TokenKind::EndOfInput`]. Lexing is all-or-nothing: an unrecognised
//! character or an unterminated `/* ... */` comment aborts with a
//! [`LexError`] and no tokens are returned.

use super::ast::SourceLocation;
use std::fmt;
use tracing::debug;

/// Token categories produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    IntegerLiteral,
    /// One of `* + - / = ; , ( ) { }`
    Symbol,
    KeywordInt,
    KeywordReturn,
    EndOfInput,
}

/// One lexical unit.
///
/// `text` is the exact source slice; `value` is only present for
/// [`TokenKind::IntegerLiteral`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub value: Option<i64>,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            value: None,
            location,
        }
    }

    fn integer(text: String, value: i64, location: SourceLocation) -> Self {
        Self {
            kind: TokenKind::IntegerLiteral,
            text,
            value: Some(value),
            location,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    /// True if this is the symbol token spelled `sym`.
    pub fn is_symbol(&self, sym: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == sym
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::IntegerLiteral => write!(f, "int literal {}", self.text),
            TokenKind::Symbol => write!(f, "'{}'", self.text),
            TokenKind::KeywordInt => write!(f, "'int'"),
            TokenKind::KeywordReturn => write!(f, "'return'"),
            TokenKind::EndOfInput => write!(f, "end of file"),
        }
    }
}

/// Fatal lexing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Lexer error at line {}, column {}: Unexpected character: '{ch}'", .location.line, .location.column)]
    UnexpectedCharacter { ch: char, location: SourceLocation },
    #[error("Lexer error at line {}, column {}: Unterminated block comment", .location.line, .location.column)]
    UnterminatedComment { location: SourceLocation },
    #[error("Lexer error at line {}, column {}: Integer literal out of range: {text}", .location.line, .location.column)]
    IntegerOverflow {
        text: String,
        location: SourceLocation,
    },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnexpectedCharacter { location, .. }
            | LexError::UnterminatedComment { location }
            | LexError::IntegerOverflow { location, .. } => *location,
        }
    }
}

const SYMBOLS: &str = "*+-/=;,(){}";

/// Lexer for minic source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::new(
                    TokenKind::EndOfInput,
                    "",
                    self.current_location(),
                ));
                break;
            }

            tokens.push(self.next_token()?);
        }

        debug!(count = tokens.len(), "lexed source");
        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::EndOfInput, "", loc)),
        };

        match ch {
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' => Ok(self.identifier_or_keyword(ch, loc)),
            _ if SYMBOLS.contains(ch) => Ok(Token::new(TokenKind::Symbol, ch, loc)),
            _ => Err(LexError::UnexpectedCharacter { ch, location: loc }),
        }
    }

    /// Parse numeric literal. A leading `-` is never part of it.
    fn number_literal(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match num_str.parse::<i64>() {
            Ok(value) => Ok(Token::integer(num_str, value, loc)),
            Err(_) => Err(LexError::IntegerOverflow {
                text: num_str,
                location: loc,
            }),
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match ident.as_str() {
            "int" => TokenKind::KeywordInt,
            "return" => TokenKind::KeywordReturn,
            _ => TokenKind::Identifier,
        };

        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    self.skip_block_comment()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::UnterminatedComment {
            location: start_loc,
        })
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("int main() { return 0; }");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::KeywordInt);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "main");
        assert!(tokens[2].is_symbol("("));
        assert!(tokens[3].is_symbol(")"));
        assert!(tokens[4].is_symbol("{"));
        assert_eq!(tokens[5].kind, TokenKind::KeywordReturn);
        assert_eq!(tokens[6].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[6].value, Some(0));
        assert!(tokens[7].is_symbol(";"));
        assert!(tokens[8].is_symbol("}"));
        assert_eq!(tokens[9].kind, TokenKind::EndOfInput);
        assert_eq!(tokens.len(), 10);
    }

    #[test]
    fn test_comments_are_dropped() {
        let tokens = Lexer::new("int /* a\nmulti-line comment */ x;")
            .tokenize()
            .unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = Lexer::new("int\n\nx\n;").tokenize().unwrap();
        let lines: Vec<usize> = tokens.iter().map(Token::line).collect();

        assert_eq!(lines, vec![1, 3, 4, 4]);
    }

    #[test]
    fn test_minus_is_never_part_of_literal() {
        let tokens = Lexer::new("-42").tokenize().unwrap();

        assert!(tokens[0].is_symbol("-"));
        assert_eq!(tokens[1].value, Some(42));
        assert_eq!(tokens[1].text, "42");
    }

    #[test]
    fn test_non_literal_tokens_have_no_value() {
        let tokens = Lexer::new("x int ;").tokenize().unwrap();

        assert!(tokens.iter().all(|t| t.value.is_none()));
    }

    #[test_case("int", TokenKind::KeywordInt; "int keyword")]
    #[test_case("return", TokenKind::KeywordReturn; "return keyword")]
    #[test_case("integer", TokenKind::Identifier; "keyword prefix")]
    #[test_case("int2", TokenKind::Identifier; "keyword with digits")]
    #[test_case("returns", TokenKind::Identifier; "keyword with suffix")]
    #[test_case("Int", TokenKind::Identifier; "case sensitive")]
    #[test_case("x1y2", TokenKind::Identifier; "mixed letters and digits")]
    fn test_words(source: &str, kind: TokenKind) {
        assert_eq!(kinds(source), vec![kind, TokenKind::EndOfInput]);
    }

    #[test]
    fn test_digits_then_letters_split() {
        assert_eq!(
            kinds("12ab"),
            vec![
                TokenKind::IntegerLiteral,
                TokenKind::Identifier,
                TokenKind::EndOfInput
            ]
        );
    }

    #[test]
    fn test_every_symbol() {
        let tokens = Lexer::new("* + - / = ; , ( ) { }").tokenize().unwrap();

        assert_eq!(tokens.len(), 12);
        assert!(tokens[..11].iter().all(|t| t.kind == TokenKind::Symbol));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfInput]);
        assert_eq!(kinds("  \t\r\n "), vec![TokenKind::EndOfInput]);
    }

    #[test_case("int x = 1 % 2;", '%'; "percent")]
    #[test_case("int _x;", '_'; "underscore")]
    #[test_case("x < y", '<'; "less than")]
    fn test_unexpected_character(source: &str, expected: char) {
        match Lexer::new(source).tokenize() {
            Err(LexError::UnexpectedCharacter { ch, .. }) => assert_eq!(ch, expected),
            other => panic!("Expected unexpected character error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Lexer::new("int x;\n/* never closed").tokenize().unwrap_err();

        assert_eq!(
            err,
            LexError::UnterminatedComment {
                location: SourceLocation::new(2, 1)
            }
        );
    }

    #[test]
    fn test_integer_overflow() {
        let err = Lexer::new("99999999999999999999").tokenize().unwrap_err();

        assert!(matches!(err, LexError::IntegerOverflow { .. }));
    }

    #[test]
    fn test_deterministic() {
        let source = "int f(int a) { /* c */ return a * 2; }";

        assert_eq!(
            Lexer::new(source).tokenize().unwrap(),
            Lexer::new(source).tokenize().unwrap()
        );
    }
}
