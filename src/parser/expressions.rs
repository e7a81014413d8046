//! Expression parsing implementation
//!
//! Precedence is layered, lowest first, and every binary layer folds to the
//! left:
//!
//! ```text
//! expression     ::= assignment
//! assignment     ::= variable "=" additive | additive
//! additive       ::= multiplicative { ("+" | "-") multiplicative }
//! multiplicative ::= postfix { ("*" | "/") postfix }
//! postfix        ::= callee "(" [ expression { "," expression } ] ")" | primary
//! primary        ::= variable | integer | "-" integer
//! ```
//!
//! Names are resolved while parsing: a variable must be visible in the
//! current function body and a callee must be declared or defined with a
//! matching arity. A failed resolution is a no-match, so the parser backs
//! up and tries the next alternative.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_assignment()
    }

    /// `x = expr` when `x` is a visible variable, otherwise an additive
    /// expression
    fn parse_assignment(&mut self) -> Option<Expression> {
        self.visit("assignment");
        let snapshot = self.snapshot();

        if let Some(name) = self.visible_variable() {
            self.cursor.advance();

            if self.eat_symbol("=") {
                if let Some(rhs) = self.parse_additive() {
                    return Some(Expression::binary(
                        BinOp::Assign,
                        Expression::Variable(name),
                        rhs,
                    ));
                }
            }

            self.restore(snapshot);
        }

        self.parse_additive()
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Option<Expression> {
        self.visit("additive");
        let snapshot = self.snapshot();
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = if self.eat_symbol("+") {
                BinOp::Add
            } else if self.eat_symbol("-") {
                BinOp::Sub
            } else {
                break;
            };

            let Some(right) = self.parse_multiplicative() else {
                self.fail(format!(
                    "Expected operand after '{op}', found {}",
                    self.cursor.current()
                ));
                return self.backtrack(snapshot);
            };
            left = Expression::binary(op, left, right);
        }

        Some(left)
    }

    /// Parse multiplicative (* /)
    fn parse_multiplicative(&mut self) -> Option<Expression> {
        self.visit("multiplicative");
        let snapshot = self.snapshot();
        let mut left = self.parse_postfix()?;

        loop {
            let op = if self.eat_symbol("*") {
                BinOp::Mul
            } else if self.eat_symbol("/") {
                BinOp::Div
            } else {
                break;
            };

            let Some(right) = self.parse_postfix() else {
                self.fail(format!(
                    "Expected operand after '{op}', found {}",
                    self.cursor.current()
                ));
                return self.backtrack(snapshot);
            };
            left = Expression::binary(op, left, right);
        }

        Some(left)
    }

    /// Parse a call, falling back to a primary expression
    fn parse_postfix(&mut self) -> Option<Expression> {
        self.visit("postfix");
        let snapshot = self.snapshot();

        if let Some(callee) = self.eat_identifier() {
            if self.check_symbol("(") {
                if let Some(call) = self.parse_call(callee) {
                    return Some(call);
                }
            }
            self.restore(snapshot);
        }

        self.parse_primary()
    }

    /// Parse the argument list of a call to `callee`; the cursor is on `(`.
    fn parse_call(&mut self, callee: String) -> Option<Expression> {
        let Some(arity) = self.symbols.callable_arity(&callee) else {
            self.reject(format!("Call to undeclared function '{callee}'"));
            return None;
        };

        self.cursor.advance();
        let mut args = Vec::new();

        if !self.check_symbol(")") {
            loop {
                args.push(self.parse_expression()?);

                if !self.eat_symbol(",") {
                    break;
                }
            }
        }

        if args.len() != arity {
            self.reject(format!(
                "Function '{callee}' expects {arity} argument(s), found {}",
                args.len()
            ));
            return None;
        }

        if !self.eat_symbol(")") {
            self.fail(format!(
                "Expected ')' after arguments, found {}",
                self.cursor.current()
            ));
            return None;
        }

        Some(Expression::Call { callee, args })
    }

    /// Parse a variable, an integer literal or a negated integer literal
    fn parse_primary(&mut self) -> Option<Expression> {
        self.visit("primary");
        let snapshot = self.snapshot();
        let token = self.cursor.current().clone();

        match (token.kind, token.value) {
            (TokenKind::Identifier, _) => {
                if !self.symbols.has_variable(&token.text) {
                    self.reject(format!("Use of undeclared identifier '{}'", token.text));
                    return None;
                }
                self.cursor.advance();
                Some(Expression::Variable(token.text))
            }
            (TokenKind::IntegerLiteral, Some(value)) => {
                self.cursor.advance();
                Some(Expression::IntegerLiteral(value))
            }
            (TokenKind::Symbol, _) if token.text == "-" => {
                self.cursor.advance();
                let next = self.cursor.current();
                match (next.kind, next.value) {
                    (TokenKind::IntegerLiteral, Some(value)) => {
                        self.cursor.advance();
                        Some(Expression::IntegerLiteral(-value))
                    }
                    _ => {
                        self.fail(format!(
                            "Unary '-' must be followed by an integer literal, found {}",
                            self.cursor.current()
                        ));
                        self.backtrack(snapshot)
                    }
                }
            }
            _ => {
                self.fail(format!("Expected expression, found {token}"));
                None
            }
        }
    }

    /// Name of the current token if it is a variable visible in this body.
    fn visible_variable(&self) -> Option<String> {
        let token = self.cursor.current();
        if token.kind == TokenKind::Identifier && self.symbols.has_variable(&token.text) {
            Some(token.text.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;
    use test_case::test_case;

    fn var(name: &str) -> Expression {
        Expression::Variable(name.to_string())
    }

    fn lit(value: i64) -> Expression {
        Expression::IntegerLiteral(value)
    }

    /// Parser with `a`, `b`, `c` in scope, `g(x, y)` declared and `h()` defined.
    fn in_scope(source: &str) -> Parser {
        let mut parser = Parser::from_source(source).unwrap();
        parser.symbols.declare_prototype("g", 2);
        parser.symbols.define_function("h", 0);
        parser.symbols.clear_variables();
        for name in ["a", "b", "c"] {
            parser.symbols.declare_variable(name);
        }
        parser
    }

    fn expr(source: &str) -> Option<Expression> {
        let mut parser = in_scope(source);
        let expr = parser.parse_expression();
        if expr.is_none() {
            assert_eq!(parser.cursor.mark().index(), 0, "cursor moved on failure");
        }
        expr
    }

    #[test]
    fn test_left_associative_additive() {
        assert_eq!(
            expr("a - b + c"),
            Some(Expression::binary(
                BinOp::Add,
                Expression::binary(BinOp::Sub, var("a"), var("b")),
                var("c")
            ))
        );
    }

    #[test]
    fn test_left_associative_multiplicative() {
        assert_eq!(
            expr("a / b * 2"),
            Some(Expression::binary(
                BinOp::Mul,
                Expression::binary(BinOp::Div, var("a"), var("b")),
                lit(2)
            ))
        );
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        assert_eq!(
            expr("1 + 2 * 3"),
            Some(Expression::binary(
                BinOp::Add,
                lit(1),
                Expression::binary(BinOp::Mul, lit(2), lit(3))
            ))
        );
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            expr("a = b + 1"),
            Some(Expression::binary(
                BinOp::Assign,
                var("a"),
                Expression::binary(BinOp::Add, var("b"), lit(1))
            ))
        );
    }

    #[test]
    fn test_variable_alone_is_not_assignment() {
        assert_eq!(expr("a"), Some(var("a")));
    }

    #[test]
    fn test_negative_literal() {
        assert_eq!(expr("-5"), Some(lit(-5)));
        assert_eq!(
            expr("a - -5"),
            Some(Expression::binary(BinOp::Sub, var("a"), lit(-5)))
        );
    }

    #[test]
    fn test_calls() {
        assert_eq!(
            expr("g(1, a * 2)"),
            Some(Expression::Call {
                callee: "g".to_string(),
                args: vec![lit(1), Expression::binary(BinOp::Mul, var("a"), lit(2))],
            })
        );
        assert_eq!(
            expr("h() + 1"),
            Some(Expression::binary(
                BinOp::Add,
                Expression::Call {
                    callee: "h".to_string(),
                    args: vec![],
                },
                lit(1)
            ))
        );
    }

    #[test_case("-a"; "unary minus on variable")]
    #[test_case("x"; "undeclared variable")]
    #[test_case("x = 1"; "assignment to undeclared variable")]
    #[test_case("g(1)"; "too few arguments")]
    #[test_case("g(1, 2, 3)"; "too many arguments")]
    #[test_case("h(1)"; "argument to nullary function")]
    #[test_case("k(1)"; "undeclared function")]
    #[test_case("a +"; "missing right operand")]
    #[test_case("a * "; "missing right factor")]
    #[test_case(""; "empty")]
    fn test_rejected(source: &str) {
        assert_eq!(expr(source), None);
    }

    #[test]
    fn test_partial_match_leaves_rest() {
        let mut parser = in_scope("a b");

        assert_eq!(parser.parse_expression(), Some(var("a")));
        assert_eq!(parser.cursor.current().text, "b");
    }

    #[test]
    fn test_arity_mismatch_diagnostic() {
        let err = Parser::from_source(
            "int g(int a, int b); int main() { return g(1); }",
        )
        .unwrap()
        .parse()
        .unwrap_err();

        assert_eq!(err.message, "Function 'g' expects 2 argument(s), found 1");
    }
}
