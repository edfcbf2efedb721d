//! The `BitVector` value type.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{BitVecError, BitVecResult};

/// A fixed-width vector of bits.
///
/// The width is chosen at construction and never changes. Bit `0` is the least
/// significant bit, so the textual form `b(n-1) .. b1 b0` reads from the
/// highest index on the left down to index zero on the right.
///
/// Ranges follow the textual reading order rather than the usual half-open
/// convention: [`BitVector::slice`] takes the *high* bound first and excludes
/// it, so `slice(Some(3), Some(0))` on `0101` yields `101`.
///
/// # Example
///
/// ```rust
/// use boolfn_bitvec::BitVector;
///
/// let x = BitVector::from_bits(4, "0101").unwrap();
/// assert_eq!(x.bit(0).unwrap().to_string(), "1");
/// assert_eq!(x.bit(1).unwrap().to_string(), "0");
/// assert_eq!(x.slice(Some(3), Some(1)).unwrap().to_string(), "10");
/// assert_eq!(x.slice(None, Some(1)).unwrap().to_string(), "010");
/// assert_eq!(x.slice(Some(2), None).unwrap().to_string(), "01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitVector {
    /// Number of bits.
    length: usize,
    /// Packed value, always below `2^length`.
    value: BigUint,
}

impl BitVector {
    /// Create a vector of `length` bits holding `value`.
    ///
    /// Fails if `length` is zero or `value` needs more than `length` bits.
    pub fn new(length: usize, value: impl Into<BigUint>) -> BitVecResult<Self> {
        let value = value.into();
        check_length(length)?;
        let required = value.bits();
        if required > length as u64 {
            return Err(BitVecError::Range(format!(
                "value requires a bit vector of length {required}, but BitVector has length {length}"
            )));
        }
        Ok(Self { length, value })
    }

    /// Create an all-zero vector of `length` bits.
    pub fn zeros(length: usize) -> BitVecResult<Self> {
        check_length(length)?;
        Ok(Self {
            length,
            value: BigUint::zero(),
        })
    }

    /// Create a vector of `length` bits from a most-significant-first bit string.
    ///
    /// Shorter strings are zero-extended on the left.
    pub fn from_bits(length: usize, bits: &str) -> BitVecResult<Self> {
        check_length(length)?;
        if bits.len() > length {
            return Err(BitVecError::Range(format!(
                "string requires a bit vector of length {}, but BitVector has length {length}",
                bits.len()
            )));
        }
        let value = parse_bit_string(bits)?;
        Ok(Self { length, value })
    }

    /// Create a vector from booleans ordered least significant bit first.
    pub fn from_bits_lsb_first(bits: &[bool]) -> BitVecResult<Self> {
        check_length(bits.len())?;
        let mut value = BigUint::zero();
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                value.set_bit(i as u64, true);
            }
        }
        Ok(Self {
            length: bits.len(),
            value,
        })
    }

    /// Get the width in bits.
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Get the packed value.
    #[inline]
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Get the value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }

    /// Get the bits as booleans, least significant first.
    pub fn to_bits_lsb_first(&self) -> Vec<bool> {
        (0..self.length)
            .map(|i| self.value.bit(i as u64))
            .collect()
    }

    /// Get bit `index` as a one-bit vector.
    pub fn bit(&self, index: usize) -> BitVecResult<Self> {
        if index >= self.length {
            return Err(BitVecError::Range(format!(
                "index {index} out of range for BitVector of length {}",
                self.length
            )));
        }
        Ok(Self::from(self.value.bit(index as u64)))
    }

    /// Extract the bits selected by `[high:low]`.
    ///
    /// `low` defaults to zero and an omitted `high` means "every bit above
    /// `low`". The result holds bits `low..high`, so `high` must be strictly
    /// greater than `low`. Bits above the vector width read as zero, so
    /// `high` may exceed the width without growing the mask past it.
    pub fn slice(&self, high: Option<usize>, low: Option<usize>) -> BitVecResult<Self> {
        let (high, low) = self.resolve_bounds(high, low)?;
        let value = (&self.value & low_mask(high.min(self.length))) >> low;
        Ok(Self {
            length: high - low,
            value,
        })
    }

    /// Set bit `index` to `bit`, which must be `0` or `1`.
    pub fn set_bit(&mut self, index: usize, bit: u8) -> BitVecResult<()> {
        let bit = match bit {
            0 => false,
            1 => true,
            other => {
                return Err(BitVecError::Range(format!(
                    "single element assignment requires 0 or 1, got {other}"
                )));
            }
        };
        if index >= self.length {
            return Err(BitVecError::Range(format!(
                "index {index} out of range for BitVector of length {}",
                self.length
            )));
        }
        self.value.set_bit(index as u64, bit);
        Ok(())
    }

    /// Set bit `index` from a one-bit vector.
    pub fn set_bit_from(&mut self, index: usize, bit: &BitVector) -> BitVecResult<()> {
        if bit.length != 1 {
            return Err(BitVecError::Range(format!(
                "single element assignment requires a BitVector of length one, got length {}",
                bit.length
            )));
        }
        self.set_bit(index, u8::from(bit.value.bit(0)))
    }

    /// Overwrite the bits selected by `[high:low]` with `bits`.
    ///
    /// `bits` must be exactly `high - low` wide.
    pub fn set_slice(
        &mut self,
        high: Option<usize>,
        low: Option<usize>,
        bits: &BitVector,
    ) -> BitVecResult<()> {
        let (high, low) = self.resolve_bounds(high, low)?;
        if high > self.length {
            return Err(BitVecError::Range(format!(
                "slice [{high}:{low}] exceeds BitVector of length {}",
                self.length
            )));
        }
        if high - low != bits.length {
            return Err(BitVecError::Range(format!(
                "slice [{high}:{low}] assignment requires a BitVector of length {}, got length {}",
                high - low,
                bits.length
            )));
        }
        let mask = low_mask(high - low) << low;
        self.value = (&self.value & (self.full_mask() ^ mask)) | (&bits.value << low);
        Ok(())
    }

    fn resolve_bounds(&self, high: Option<usize>, low: Option<usize>) -> BitVecResult<(usize, usize)> {
        let low = low.unwrap_or(0);
        let high = high.unwrap_or(self.length);
        if high <= low {
            return Err(BitVecError::Range(format!(
                "slice [{high}:{low}] requires {high} > {low}"
            )));
        }
        Ok((high, low))
    }

    fn full_mask(&self) -> BigUint {
        low_mask(self.length)
    }

    fn combine(
        &self,
        rhs: &BitVector,
        op: &str,
        f: impl FnOnce(&BigUint, &BigUint) -> BigUint,
    ) -> BitVecResult<BitVector> {
        if self.length != rhs.length {
            return Err(BitVecError::TypeMismatch(format!(
                "{op} operation: length mismatch ({} vs {})",
                self.length, rhs.length
            )));
        }
        Ok(BitVector {
            length: self.length,
            value: f(&self.value, &rhs.value),
        })
    }
}

fn check_length(length: usize) -> BitVecResult<()> {
    if length == 0 {
        return Err(BitVecError::Range(
            "BitVector length must be at least one".into(),
        ));
    }
    Ok(())
}

fn low_mask(bits: usize) -> BigUint {
    (BigUint::one() << bits) - 1u32
}

fn parse_bit_string(bits: &str) -> BitVecResult<BigUint> {
    if bits.is_empty() || !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(BitVecError::InvalidBitString(bits.to_string()));
    }
    BigUint::parse_bytes(bits.as_bytes(), 2)
        .ok_or_else(|| BitVecError::InvalidBitString(bits.to_string()))
}

impl From<bool> for BitVector {
    fn from(bit: bool) -> Self {
        Self {
            length: 1,
            value: BigUint::from(u8::from(bit)),
        }
    }
}

impl TryFrom<&BitVector> for bool {
    type Error = BitVecError;

    fn try_from(bits: &BitVector) -> BitVecResult<bool> {
        if bits.length > 1 {
            return Err(BitVecError::TypeMismatch(format!(
                "a BitVector of length {} cannot be converted to a Boolean value",
                bits.length
            )));
        }
        Ok(bits.value.bit(0))
    }
}

impl FromStr for BitVector {
    type Err = BitVecError;

    fn from_str(s: &str) -> BitVecResult<Self> {
        Self::from_bits(s.len(), s)
    }
}

impl TryFrom<String> for BitVector {
    type Error = BitVecError;

    fn try_from(s: String) -> BitVecResult<Self> {
        s.parse()
    }
}

impl From<BitVector> for String {
    fn from(bits: BitVector) -> Self {
        bits.to_string()
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.value.to_str_radix(2);
        for _ in digits.len()..self.length {
            f.write_str("0")?;
        }
        f.write_str(&digits)
    }
}

impl Not for &BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        BitVector {
            length: self.length,
            value: self.full_mask() ^ &self.value,
        }
    }
}

impl Not for BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        !&self
    }
}

macro_rules! bitwise_op {
    ($trait:ident, $method:ident, $name:literal, $op:tt) => {
        impl $trait for &BitVector {
            type Output = BitVecResult<BitVector>;

            fn $method(self, rhs: &BitVector) -> BitVecResult<BitVector> {
                self.combine(rhs, $name, |a, b| a $op b)
            }
        }

        impl $trait for BitVector {
            type Output = BitVecResult<BitVector>;

            fn $method(self, rhs: BitVector) -> BitVecResult<BitVector> {
                (&self).$method(&rhs)
            }
        }
    };
}

bitwise_op!(BitAnd, bitand, "and", &);
bitwise_op!(BitOr, bitor, "or", |);
bitwise_op!(BitXor, bitxor, "xor", ^);
