//! Statement parsing implementation
//!
//! ```text
//! statement      ::= expr_statement | jump_statement
//! expr_statement ::= ";" | expression ";"
//! jump_statement ::= "return" expression ";"
//! ```
//!
//! A statement that matches neither alternative stops the statement loop;
//! the enclosing function body decides whether what came before is valid.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        self.visit("statement");
        let snapshot = self.snapshot();

        if let Some(stmt) = self.parse_expression_statement() {
            return Some(stmt);
        }

        if let Some(stmt) = self.parse_jump_statement() {
            return Some(stmt);
        }

        self.backtrack(snapshot)
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        self.visit("expression_statement");
        let snapshot = self.snapshot();

        if self.eat_symbol(";") {
            return Some(Statement::Null);
        }

        let expr = self.parse_expression()?;

        if !self.eat_symbol(";") {
            self.fail(format!(
                "Expected ';' after expression, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        Some(Statement::Expression(expr))
    }

    fn parse_jump_statement(&mut self) -> Option<Statement> {
        self.visit("jump_statement");
        let snapshot = self.snapshot();

        if !self.eat_kind(TokenKind::KeywordReturn) {
            return None;
        }

        let Some(expr) = self.parse_expression() else {
            return self.backtrack(snapshot);
        };

        if !self.eat_symbol(";") {
            self.fail(format!(
                "Expected ';' after return value, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        Some(Statement::Return(expr))
    }
}
