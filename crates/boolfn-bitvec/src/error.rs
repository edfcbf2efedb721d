//! Error types for bit vectors.

use thiserror::Error;

/// Errors that can occur when building or combining bit vectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BitVecError {
    /// A value, bit string, index or slice does not fit the declared width.
    #[error("Range error: {0}")]
    Range(String),

    /// Operands of a bitwise operation do not agree.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A bit string contains something other than `0` and `1`.
    #[error("Invalid bit string: '{0}'")]
    InvalidBitString(String),
}

/// Result type for bit vector operations.
pub type BitVecResult<T> = Result<T, BitVecError>;
