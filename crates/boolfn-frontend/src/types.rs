//! Value types and signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type constructors known to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Fixed-width bit vector, written `BitVec(N)`.
    BitVec,
}

impl ValueKind {
    /// Look up a type constructor by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "BitVec" => Some(ValueKind::BitVec),
            _ => None,
        }
    }

    /// Get the source name of the constructor.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::BitVec => "BitVec",
        }
    }
}

/// A value type: constructor plus width in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    pub kind: ValueKind,
    pub width: usize,
}

impl ValueType {
    /// A bit vector of `width` bits.
    #[inline]
    pub const fn bitvec(width: usize) -> Self {
        Self {
            kind: ValueKind::BitVec,
            width,
        }
    }

    /// The single-bit type.
    pub const BIT: Self = Self::bitvec(1);
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.name(), self.width)
    }
}

/// Ordered parameter or return types of a function.
pub type Signature = Vec<ValueType>;

/// Total number of bits in a signature.
pub fn signature_width(signature: &[ValueType]) -> usize {
    signature.iter().map(|t| t.width).sum()
}
