//! Error types for logic networks.

use thiserror::Error;

/// Errors that can occur while building, reading or simulating a network.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XagError {
    /// I/O error while reading a network file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed AIGER input.
    #[error("AIGER error at line {line}: {message}")]
    Aiger { line: usize, message: String },

    /// Malformed DIMACS CNF input.
    #[error("DIMACS error at line {line}: {message}")]
    Dimacs { line: usize, message: String },

    /// Malformed or unsupported Verilog input.
    #[error("Verilog error at line {line}: {message}")]
    Verilog { line: usize, message: String },

    /// Simulation pattern does not match the number of primary inputs.
    #[error("Simulation expects {expected} input values, got {got}")]
    InputLengthMismatch { expected: usize, got: usize },

    /// Truth table text is not a power-of-two string of `0`/`1`.
    #[error("Invalid truth table: {0}")]
    InvalidTruthTable(String),

    /// Too many inputs for an explicit truth table.
    #[error("Truth tables over {got} inputs exceed the limit of {limit}")]
    TooManyInputs { limit: usize, got: usize },

    /// Internal network structure is inconsistent.
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),
}

/// Result type for logic network operations.
pub type XagResult<T> = Result<T, XagError>;
