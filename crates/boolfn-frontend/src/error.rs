//! Error types for the function parser.

use boolfn_bitvec::BitVecError;
use thiserror::Error;

use crate::types::ValueType;

/// Errors that can occur while parsing a function or expression and lowering
/// it to a logic network.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Inconsistent indentation.
    #[error("Indentation error at line {line}: {message}")]
    Indentation { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Parameters without a type annotation.
    #[error("Argument type is needed for {names:?}")]
    MissingArgumentType { names: Vec<String> },

    /// Annotation is not `BitVec(N)` with a positive integer `N`.
    #[error("Invalid type annotation: {0}")]
    InvalidAnnotation(String),

    /// Function header has no return annotation.
    #[error("Return type is needed")]
    MissingReturnType,

    /// Name used before it is bound.
    #[error("out of scope: {0}")]
    OutOfScope(String),

    /// Syntax outside the supported subset.
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// Operator outside the supported subset.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Bitwise operator applied to values of different widths.
    #[error("Different length operands for '{op}': {left} and {right}")]
    BinOpWidthMismatch {
        op: String,
        left: ValueType,
        right: ValueType,
    },

    /// Comparison between values of different widths.
    #[error("Different length operands for '{op}': {left} and {right}")]
    CompareWidthMismatch {
        op: String,
        left: ValueType,
        right: ValueType,
    },

    /// Logical `not` applied to a multi-bit value.
    #[error("Boolean NOT doesn't work on multibit values (got {0})")]
    MultiBitNot(ValueType),

    /// Malformed `BitVec(...)` literal.
    #[error("Invalid BitVec literal: {0}")]
    InvalidLiteral(String),

    /// Literal value rejected by the bit vector constructor.
    #[error("Invalid BitVec literal: {0}")]
    Literal(#[from] BitVecError),

    /// Type constructor other than `BitVec`.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Subscript that is neither an integer literal nor a slice.
    #[error("Subscript must be an integer or a slice: {0}")]
    Subscript(String),

    /// Slice with a step, non-literal bounds or inverted bounds.
    #[error("Invalid slice: {0}")]
    InvalidSlice(String),

    /// Index or slice bound past the width of the value.
    #[error("Index {index} out of range for {ty}")]
    IndexOutOfRange { index: usize, ty: ValueType },

    /// Number of returned values differs from the annotation.
    #[error("The function was expected to return {expected} values, but it returned {got}")]
    ReturnArity { expected: usize, got: usize },

    /// Returned value does not have the declared type.
    #[error("Return value {slot} was expected to be of type {expected}, but got {actual}")]
    ReturnTypeMismatch {
        slot: usize,
        expected: ValueType,
        actual: ValueType,
    },

    /// Function body ends without a `return`.
    #[error("Function '{0}' does not return a value")]
    MissingReturn(String),

    /// Function body has more than one `return`.
    #[error("Function '{0}' returns more than once")]
    MultipleReturns(String),

    /// Source is not exactly one function definition.
    #[error("Source must contain exactly one function definition")]
    NotAFunction,

    /// Source is not exactly one expression.
    #[error("Not an expression to parse")]
    NotAnExpression,

    /// Explicit variable order omits referenced names.
    #[error("Missing variables in order list: {missing:?}")]
    MissingVariables { missing: Vec<String> },

    /// Expression does not evaluate to a single bit.
    #[error("Expressions can only evaluate to a BitVec(1), got {0}")]
    InvalidExpressionReturn(ValueType),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
