// AST (Abstract Syntax Tree) definitions for the minic front end

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Assign,
}

impl BinOp {
    /// The source spelling of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Assign => "=",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Where a variable declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Parameter,
    Local,
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Variable(String),
    IntegerLiteral(i64),
    BinaryOp {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call {
        callee: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub(crate) fn binary(op: BinOp, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A lone `;`
    Null,
    Return(Expression),
    Expression(Expression),
}

impl Statement {
    pub fn is_return(&self) -> bool {
        matches!(self, Statement::Return(_))
    }
}

/// A parameter or local variable declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: String,
    pub kind: DeclKind,
    pub location: SourceLocation,
}

/// Function name and ordered parameter names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
    pub location: SourceLocation,
}

impl Prototype {
    pub fn new(name: impl Into<String>, params: Vec<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            params,
            location,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Declarations (parameters first, then locals) followed by statements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionBody {
    pub declarations: Vec<VariableDecl>,
    pub statements: Vec<Statement>,
}

impl FunctionBody {
    pub fn params(&self) -> impl Iterator<Item = &VariableDecl> {
        self.declarations
            .iter()
            .filter(|decl| decl.kind == DeclKind::Parameter)
    }

    pub fn locals(&self) -> impl Iterator<Item = &VariableDecl> {
        self.declarations
            .iter()
            .filter(|decl| decl.kind == DeclKind::Local)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub proto: Prototype,
    pub body: FunctionBody,
}

impl FunctionDef {
    pub fn name(&self) -> &str {
        &self.proto.name
    }

    pub fn arity(&self) -> usize {
        self.proto.arity()
    }
}

/// Root of the tree; owns every other node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationUnit {
    pub prototypes: Vec<Prototype>,
    pub functions: Vec<FunctionDef>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        TranslationUnit::default()
    }

    /// Look up a defined function by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|func| func.name() == name)
    }
}
