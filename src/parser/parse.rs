//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, options, backtracking helpers and the main parse
//! entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent engine with ordered-alternative
//! backtracking:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: prototypes, function definitions, variable declarations
//! - `statements`: expression statements and `return`
//! - `expressions`: layered precedence (assignment, additive,
//!   multiplicative, postfix, primary)
//!
//! # Backtracking
//!
//! Every grammar rule returns `Option<T>`. `None` means "no match" and is
//! never fatal: the rule has already restored the cursor *and* the symbol
//! tables to the [`Snapshot`] it took on entry, so the caller can try the
//! next alternative from the same position. Only the top-level loop turns a
//! no-match into a [`ParseError`], reporting the furthest diagnostic seen.

use crate::parser::ast::*;
use crate::parser::cursor::{Mark, TokenCursor};
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use crate::parser::symbols::{Checkpoint, SymbolTables};
use tracing::{debug, trace};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

/// Parser configuration
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Runtime-provided functions seeded into the prototype table
    pub intrinsics: Vec<Prototype>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::without_intrinsics().with_intrinsic("printnum", &["i"])
    }
}

impl ParserOptions {
    pub fn without_intrinsics() -> Self {
        Self {
            intrinsics: Vec::new(),
        }
    }

    pub fn with_intrinsic(mut self, name: &str, params: &[&str]) -> Self {
        let params = params.iter().map(|p| p.to_string()).collect();
        self.intrinsics
            .push(Prototype::new(name, params, SourceLocation::default()));
        self
    }
}

/// Cursor position plus symbol-table journal position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snapshot {
    mark: Mark,
    checkpoint: Checkpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Severity {
    Syntax,
    /// Well-formed pieces that do not add up (e.g. no trailing `return`)
    Structure,
    Semantic,
}

#[derive(Debug)]
struct Diagnostic {
    index: usize,
    severity: Severity,
    message: String,
    location: SourceLocation,
}

/// Recursive descent parser for minic
pub struct Parser {
    pub(crate) cursor: TokenCursor,
    pub(crate) symbols: SymbolTables,
    options: ParserOptions,
    diagnostic: Option<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ParserOptions::default())
    }

    pub fn with_options(tokens: Vec<Token>, options: ParserOptions) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            symbols: SymbolTables::new(),
            options,
            diagnostic: None,
        }
    }

    /// Lex `source` and build a parser over the resulting tokens.
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::new(tokens))
    }

    /// Parse the whole token sequence into a [`TranslationUnit`].
    ///
    /// The intrinsics from [`ParserOptions`] are seeded first and appear at
    /// the front of `prototypes`. Any external declaration that fails to
    /// parse aborts the whole parse.
    pub fn parse(&mut self) -> Result<TranslationUnit, ParseError> {
        self.cursor.rewind();
        self.symbols = SymbolTables::new();
        self.diagnostic = None;

        let mut unit = TranslationUnit::new();
        for intrinsic in &self.options.intrinsics {
            self.symbols
                .declare_prototype(&intrinsic.name, intrinsic.arity());
            unit.prototypes.push(intrinsic.clone());
        }
        self.symbols.commit();

        while !self.cursor.is_at_end() {
            if !self.parse_external_declaration(&mut unit) {
                let err = self.take_error();
                debug!(%err, "parse failed");
                return Err(err);
            }
            self.symbols.commit();
            self.diagnostic = None;
        }

        debug!(
            prototypes = unit.prototypes.len(),
            functions = unit.functions.len(),
            "parsed translation unit"
        );
        Ok(unit)
    }

    fn take_error(&mut self) -> ParseError {
        match self.diagnostic.take() {
            Some(diag) => ParseError {
                message: diag.message,
                location: diag.location,
            },
            None => ParseError {
                message: format!(
                    "Expected function declaration or definition, found {}",
                    self.cursor.current()
                ),
                location: self.current_location(),
            },
        }
    }

    // ===== Backtracking =====

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            mark: self.cursor.mark(),
            checkpoint: self.symbols.checkpoint(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.cursor.reset(snapshot.mark);
        self.symbols.rollback(snapshot.checkpoint);
    }

    /// Restore `snapshot` and report no match.
    pub(crate) fn backtrack<T>(&mut self, snapshot: Snapshot) -> Option<T> {
        self.restore(snapshot);
        None
    }

    // ===== Diagnostics =====

    /// Record a syntax failure at the current token.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.record(Severity::Syntax, message.into());
    }

    /// Record a failure that outranks syntax failures at the same token.
    pub(crate) fn fail_structure(&mut self, message: impl Into<String>) {
        self.record(Severity::Structure, message.into());
    }

    /// Record a semantic failure (redefinition, undeclared name, arity).
    pub(crate) fn reject(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(location = %self.current_location(), "{message}");
        self.record(Severity::Semantic, message);
    }

    fn record(&mut self, severity: Severity, message: String) {
        let index = self.cursor.mark().index();
        let replace = match &self.diagnostic {
            None => true,
            Some(old) => (index, severity) > (old.index, old.severity),
        };
        if replace {
            self.diagnostic = Some(Diagnostic {
                index,
                severity,
                message,
                location: self.current_location(),
            });
        }
    }

    pub(crate) fn visit(&self, rule: &'static str) {
        let token = self.cursor.current();
        trace!(rule, token = %token, line = token.line(), "visit");
    }

    // ===== Token helpers =====

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.cursor.current().kind == kind
    }

    pub(crate) fn check_symbol(&self, sym: &str) -> bool {
        self.cursor.current().is_symbol(sym)
    }

    pub(crate) fn eat_kind(&mut self, kind: TokenKind) -> bool {
        if self.check_kind(kind) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_symbol(&mut self, sym: &str) -> bool {
        if self.check_symbol(sym) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_identifier(&mut self) -> Option<String> {
        if self.check_kind(TokenKind::Identifier) {
            let name = self.cursor.current().text.clone();
            self.cursor.advance();
            Some(name)
        } else {
            None
        }
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.cursor.current().location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<TranslationUnit, ParseError> {
        Parser::from_source(source).unwrap().parse()
    }

    #[test]
    fn test_parse_simple_function() {
        let unit = parse("int main() { return 0; }").unwrap();

        assert_eq!(unit.functions.len(), 1);
        let main = &unit.functions[0];
        assert_eq!(main.name(), "main");
        assert_eq!(main.arity(), 0);
        assert_eq!(
            main.body.statements,
            vec![Statement::Return(Expression::IntegerLiteral(0))]
        );
    }

    #[test]
    fn test_intrinsic_is_seeded() {
        let unit = parse("").unwrap();

        assert_eq!(unit.prototypes.len(), 1);
        assert_eq!(unit.prototypes[0].name, "printnum");
        assert_eq!(unit.prototypes[0].params, vec!["i".to_string()]);
        assert!(unit.functions.is_empty());
    }

    #[test]
    fn test_custom_intrinsics() {
        let options = ParserOptions::without_intrinsics().with_intrinsic("putpair", &["a", "b"]);
        let tokens = Lexer::new("int main() { putpair(1, 2); return 0; }")
            .tokenize()
            .unwrap();
        let unit = Parser::with_options(tokens, options).parse().unwrap();

        assert_eq!(unit.prototypes.len(), 1);
        assert_eq!(unit.prototypes[0].name, "putpair");

        let err = parse("int main() { putpair(1, 2); return 0; }").unwrap_err();
        assert!(err.message.contains("putpair"), "{}", err.message);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let mut parser = Parser::from_source("int f(int a) { return a; }").unwrap();
        let first = parser.parse().unwrap();
        let second = parser.parse().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_error_reports_semantic_failure() {
        let err = parse("int f(int a){return a;} int f(int a){return a;}").unwrap_err();

        assert_eq!(err.message, "Function 'f' is redefined");
        assert_eq!(err.location.line, 1);
    }

    #[test]
    fn test_error_reports_furthest_syntax_failure() {
        let err = parse("int main() {\n  return 1\n}").unwrap_err();

        assert_eq!(err.message, "Expected ';' after return value, found '}'");
        assert_eq!(err.location, SourceLocation::new(3, 1));
    }

    #[test]
    fn test_error_reports_missing_trailing_return() {
        let err = parse("int f(int a){ a = 1; }").unwrap_err();

        assert_eq!(err.message, "Function 'f' must end with a return statement");
        assert_eq!(err.location, SourceLocation::new(1, 22));
    }

    #[test]
    fn test_failed_rule_restores_symbols() {
        let mut parser = Parser::from_source("int f(int a) { int b; return c; }").unwrap();
        let before = parser.snapshot();

        assert!(parser.parse_function_definition().is_none());
        assert_eq!(parser.cursor.mark(), before.mark);
        assert_eq!(parser.symbols.function_arity("f"), None);
        assert!(parser.symbols.variables().is_empty());
    }
}
