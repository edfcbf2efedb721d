//! Abstract syntax tree for the restricted function syntax.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// A parsed source unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Top-level statements.
    pub body: Vec<Statement>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Function definition.
    FunctionDef(FunctionDef),

    /// Assignment: `a = b = value`.
    Assign {
        targets: Vec<Expression>,
        value: Expression,
    },

    /// Augmented assignment: `a &= value`.
    AugAssign {
        target: Expression,
        op: BinOp,
        value: Expression,
    },

    /// Return statement.
    Return(Option<Expression>),

    /// Expression statement.
    Expr(Expression),

    /// `pass`
    Pass,

    /// If statement; `elif` chains nest in `orelse`.
    If {
        test: Expression,
        body: Vec<Statement>,
        orelse: Vec<Statement>,
    },

    /// For loop.
    For {
        target: Expression,
        iter: Expression,
        body: Vec<Statement>,
    },

    /// While loop.
    While {
        test: Expression,
        body: Vec<Statement>,
    },
}

impl Statement {
    /// Get the statement kind for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::FunctionDef(_) => "FunctionDef",
            Statement::Assign { .. } => "Assign",
            Statement::AugAssign { .. } => "AugAssign",
            Statement::Return(_) => "Return",
            Statement::Expr(_) => "Expr",
            Statement::Pass => "Pass",
            Statement::If { .. } => "If",
            Statement::For { .. } => "For",
            Statement::While { .. } => "While",
        }
    }
}

/// A function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Function name.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<Parameter>,
    /// Return annotation after `->`.
    pub returns: Option<Expression>,
    /// Function body.
    pub body: Vec<Statement>,
    /// Decorator expressions, outermost first.
    pub decorators: Vec<Expression>,
    /// Line of the `def` keyword.
    pub line: usize,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Annotation after `:`.
    pub annotation: Option<Expression>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Identifier.
    Name(String),
    /// Integer literal.
    Int(BigUint),
    /// Float literal.
    Float(f64),
    /// String literal.
    Str(String),
    /// `True` or `False`.
    Bool(bool),
    /// `None`.
    None,

    /// Binary operation.
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },

    /// `and`/`or` chain over two or more operands.
    BoolOp { op: BoolOp, values: Vec<Expression> },

    /// Comparison chain: `left op0 c0 op1 c1 ...`.
    Compare {
        left: Box<Expression>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expression>,
    },

    /// Unary operation.
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Call: `func(args)`.
    Call {
        func: Box<Expression>,
        args: Vec<Expression>,
    },

    /// Subscript: `value[index]`.
    Subscript {
        value: Box<Expression>,
        index: Box<Index>,
    },

    /// Attribute access: `value.attr`.
    Attribute {
        value: Box<Expression>,
        attr: String,
    },

    /// Conditional expression: `body if test else orelse`.
    IfExp {
        test: Box<Expression>,
        body: Box<Expression>,
        orelse: Box<Expression>,
    },

    /// Tuple display.
    Tuple(Vec<Expression>),

    /// List display.
    List(Vec<Expression>),
}

impl Expression {
    /// Get the expression kind for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Name(_) => "Name",
            Expression::Int(_) | Expression::Float(_) | Expression::Str(_) => "Constant",
            Expression::Bool(_) | Expression::None => "Constant",
            Expression::BinOp { .. } => "BinOp",
            Expression::BoolOp { .. } => "BoolOp",
            Expression::Compare { .. } => "Compare",
            Expression::UnaryOp { .. } => "UnaryOp",
            Expression::Call { .. } => "Call",
            Expression::Subscript { .. } => "Subscript",
            Expression::Attribute { .. } => "Attribute",
            Expression::IfExp { .. } => "IfExp",
            Expression::Tuple(_) => "Tuple",
            Expression::List(_) => "List",
        }
    }

    /// Visit this expression and every sub-expression, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        visit(self);
        match self {
            Expression::Name(_)
            | Expression::Int(_)
            | Expression::Float(_)
            | Expression::Str(_)
            | Expression::Bool(_)
            | Expression::None => {}
            Expression::BinOp { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Expression::BoolOp { values, .. }
            | Expression::Tuple(values)
            | Expression::List(values) => {
                for value in values {
                    value.walk(visit);
                }
            }
            Expression::Compare {
                left, comparators, ..
            } => {
                left.walk(visit);
                for c in comparators {
                    c.walk(visit);
                }
            }
            Expression::UnaryOp { operand, .. } => operand.walk(visit),
            Expression::Call { func, args } => {
                func.walk(visit);
                for arg in args {
                    arg.walk(visit);
                }
            }
            Expression::Subscript { value, index } => {
                value.walk(visit);
                match index.as_ref() {
                    Index::Single(e) => e.walk(visit),
                    Index::Slice { lower, upper, step } => {
                        for bound in [lower, upper, step].into_iter().flatten() {
                            bound.walk(visit);
                        }
                    }
                }
            }
            Expression::Attribute { value, .. } => value.walk(visit),
            Expression::IfExp { test, body, orelse } => {
                test.walk(visit);
                body.walk(visit);
                orelse.walk(visit);
            }
        }
    }
}

/// Subscript index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Index {
    /// `value[e]`
    Single(Expression),
    /// `value[upper:lower:step]` in source order `[a:b:c]`, stored as the
    /// first bound (`upper`, the high end) and the second (`lower`).
    Slice {
        upper: Option<Expression>,
        lower: Option<Expression>,
        step: Option<Expression>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMul,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinOp {
    /// Get the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::MatMul => "@",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
        }
    }
}

/// Word-form Boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOp {
    /// Get the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtEq => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtEq => ">=",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `not`
    Not,
    /// `~`
    Invert,
    /// `-`
    Neg,
    /// `+`
    Pos,
}

impl UnaryOp {
    /// Get the operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Invert => "~",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
        }
    }
}
