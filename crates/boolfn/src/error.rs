//! Error types for Boolean functions.

use boolfn_bitvec::BitVecError;
use boolfn_frontend::{ParseError, ValueType};
use boolfn_xag::XagError;
use thiserror::Error;

/// Errors that can occur while building or simulating a [`BoolFunction`](crate::BoolFunction).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoolFnError {
    /// Source could not be parsed or lowered.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Network reader or simulator failure.
    #[error(transparent)]
    Network(#[from] XagError),

    /// Bit vector construction failure.
    #[error(transparent)]
    BitVec(#[from] BitVecError),

    /// Wrong number of arguments.
    #[error("The function requires {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },

    /// Argument type differs from the parameter type.
    #[error("Wrong argument type. Argument {index} expected: {expected}, got: {actual}")]
    ArgumentType {
        index: usize,
        expected: ValueType,
        actual: ValueType,
    },

    /// Truth table strings of unequal or invalid length.
    #[error("Invalid truth table length: {0}")]
    InvalidTruthTableLength(String),

    /// Exhaustive simulation over more inputs than the configured limit.
    #[error("Cannot simulate {got} inputs exhaustively, the limit is {limit}")]
    TooManyInputs { limit: usize, got: usize },

    /// Output bit index past the last output.
    #[error("Output bit {index} out of range for {num_outputs} outputs")]
    OutputOutOfRange { index: usize, num_outputs: usize },

    /// Operation needs a logic network but the function is table-backed.
    #[error("Function is defined by truth tables and has no logic network")]
    NoNetwork,

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for Boolean function operations.
pub type BoolFnResult<T> = Result<T, BoolFnError>;
