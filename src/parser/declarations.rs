//! Declaration parsing implementation
//!
//! This module handles the top level of a translation unit:
//!
//! - Function declarations: `int name(int a, int b);`
//! - Function definitions: `int name(int a) { ... }`
//! - Function bodies: variable declarations followed by statements
//!
//! # Grammar
//!
//! ```text
//! external_decl ::= function_decl | function_def
//! function_decl ::= prototype ";"
//! function_def  ::= prototype body
//! prototype     ::= "int" identifier "(" [ "int" identifier { "," "int" identifier } ] ")"
//! body          ::= "{" { var_decl } { statement } "}"
//! var_decl      ::= "int" identifier ";"
//! ```
//!
//! Alternatives are tried in order; a declaration is attempted before a
//! definition. Redefinitions and arity conflicts are rejected here, where
//! the second occurrence of a name is parsed.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse one external declaration and append it to `unit`.
    pub(crate) fn parse_external_declaration(&mut self, unit: &mut TranslationUnit) -> bool {
        self.visit("external_declaration");

        if let Some(proto) = self.parse_function_declaration() {
            unit.prototypes.push(proto);
            return true;
        }

        if let Some(func) = self.parse_function_definition() {
            unit.functions.push(func);
            return true;
        }

        false
    }

    /// Parse a function declaration: prototype ";"
    pub(crate) fn parse_function_declaration(&mut self) -> Option<Prototype> {
        self.visit("function_declaration");
        let snapshot = self.snapshot();
        let proto = self.parse_prototype()?;

        if !self.check_symbol(";") {
            self.fail(format!(
                "Expected ';' after prototype of '{}', found {}",
                proto.name,
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        if self.symbols.prototype_arity(&proto.name).is_some() {
            self.reject(format!("Function '{}' is redeclared", proto.name));
            return self.backtrack(snapshot);
        }

        if let Some(arity) = self.symbols.function_arity(&proto.name) {
            if arity != proto.arity() {
                self.reject(arity_conflict(&proto, arity));
                return self.backtrack(snapshot);
            }
        }

        self.cursor.advance();
        self.symbols
            .declare_prototype(&proto.name, proto.arity());
        Some(proto)
    }

    /// Parse a function definition: prototype body
    pub(crate) fn parse_function_definition(&mut self) -> Option<FunctionDef> {
        self.visit("function_definition");
        let snapshot = self.snapshot();
        let proto = self.parse_prototype()?;

        if self.symbols.function_arity(&proto.name).is_some() {
            self.reject(format!("Function '{}' is redefined", proto.name));
            return self.backtrack(snapshot);
        }

        if let Some(arity) = self.symbols.prototype_arity(&proto.name) {
            if arity != proto.arity() {
                self.reject(arity_conflict(&proto, arity));
                return self.backtrack(snapshot);
            }
        }

        let Some(body) = self.parse_function_body(&proto) else {
            return self.backtrack(snapshot);
        };

        self.symbols
            .define_function(&proto.name, proto.arity());
        Some(FunctionDef { proto, body })
    }

    /// Parse a prototype: "int" name "(" params ")"
    pub(crate) fn parse_prototype(&mut self) -> Option<Prototype> {
        self.visit("prototype");
        let snapshot = self.snapshot();

        if !self.eat_kind(TokenKind::KeywordInt) {
            self.fail(format!("Expected 'int', found {}", self.cursor.current()));
            return self.backtrack(snapshot);
        }

        let location = self.current_location();
        let Some(name) = self.eat_identifier() else {
            self.fail(format!(
                "Expected function name, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        };

        if !self.eat_symbol("(") {
            self.fail(format!(
                "Expected '(' after function name, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        let mut params: Vec<String> = Vec::new();
        if self.check_kind(TokenKind::KeywordInt) {
            loop {
                if !self.eat_kind(TokenKind::KeywordInt) {
                    self.fail(format!(
                        "Expected 'int' before parameter name, found {}",
                        self.cursor.current()
                    ));
                    return self.backtrack(snapshot);
                }

                let Some(param) = self.eat_identifier() else {
                    self.fail(format!(
                        "Expected parameter name, found {}",
                        self.cursor.current()
                    ));
                    return self.backtrack(snapshot);
                };

                if params.contains(&param) {
                    self.reject(format!(
                        "Duplicate parameter '{param}' in function '{name}'"
                    ));
                    return self.backtrack(snapshot);
                }
                params.push(param);

                if !self.eat_symbol(",") {
                    break;
                }
            }
        }

        if !self.eat_symbol(")") {
            self.fail(format!(
                "Expected ')' after parameters, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        Some(Prototype::new(name, params, location))
    }

    /// Parse a function body. Parameters of `proto` are declared first so
    /// they clash with same-named locals.
    pub(crate) fn parse_function_body(&mut self, proto: &Prototype) -> Option<FunctionBody> {
        self.visit("function_body");
        let snapshot = self.snapshot();

        if !self.eat_symbol("{") {
            self.fail(format!(
                "Expected '{{' before function body, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        self.symbols.clear_variables();
        let mut body = FunctionBody::default();

        for param in &proto.params {
            self.symbols.declare_variable(param);
            body.declarations.push(VariableDecl {
                name: param.clone(),
                kind: DeclKind::Parameter,
                location: proto.location,
            });
        }

        while let Some(decl) = self.parse_variable_declaration() {
            if !self.symbols.declare_variable(&decl.name) {
                self.reject(format!(
                    "Variable '{}' is already declared in function '{}'",
                    decl.name, proto.name
                ));
                return self.backtrack(snapshot);
            }
            body.declarations.push(decl);
        }

        while let Some(stmt) = self.parse_statement() {
            body.statements.push(stmt);
        }

        if body.statements.last().is_some_and(|s| !s.is_return()) {
            self.fail_structure(format!(
                "Function '{}' must end with a return statement",
                proto.name
            ));
            return self.backtrack(snapshot);
        }

        if !self.eat_symbol("}") {
            self.fail(format!(
                "Expected '}}' after function body, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        Some(body)
    }

    /// Parse a local variable declaration: "int" name ";"
    pub(crate) fn parse_variable_declaration(&mut self) -> Option<VariableDecl> {
        self.visit("variable_declaration");
        let snapshot = self.snapshot();
        let location = self.current_location();

        if !self.eat_kind(TokenKind::KeywordInt) {
            return None;
        }

        let Some(name) = self.eat_identifier() else {
            self.fail(format!(
                "Expected variable name, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        };

        if !self.eat_symbol(";") {
            self.fail(format!(
                "Expected ';' after variable declaration, found {}",
                self.cursor.current()
            ));
            return self.backtrack(snapshot);
        }

        Some(VariableDecl {
            name,
            kind: DeclKind::Local,
            location,
        })
    }
}

fn arity_conflict(proto: &Prototype, declared: usize) -> String {
    format!(
        "Function '{}' conflicts with an earlier declaration: expected {} parameter(s), found {}",
        proto.name,
        declared,
        proto.arity()
    )
}
