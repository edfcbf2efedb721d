//! Explicit truth tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{XagError, XagResult};

/// Projection patterns for the first six variables within one 64-bit word.
const PROJECTIONS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// A complete truth table over `num_vars` variables.
///
/// Bit `p` holds the function value for the input assignment in which
/// variable `k` equals `(p >> k) & 1`. The text form lists bit `2^n - 1`
/// first and bit `0` last, so the AND of two variables reads `1000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruthTable {
    num_vars: usize,
    words: Vec<u64>,
}

impl TruthTable {
    /// Largest number of variables a table may have.
    pub const MAX_VARS: usize = 32;

    /// Create the constant-false table over `num_vars` variables.
    pub fn new(num_vars: usize) -> XagResult<Self> {
        if num_vars > Self::MAX_VARS {
            return Err(XagError::TooManyInputs {
                limit: Self::MAX_VARS,
                got: num_vars,
            });
        }
        let num_words = if num_vars <= 6 {
            1
        } else {
            1usize << (num_vars - 6)
        };
        Ok(Self {
            num_vars,
            words: vec![0; num_words],
        })
    }

    /// Create the projection onto variable `var`.
    pub fn nth_var(num_vars: usize, var: usize) -> XagResult<Self> {
        let mut table = Self::new(num_vars)?;
        if var >= num_vars {
            return Err(XagError::InvalidTruthTable(format!(
                "variable {var} out of range for {num_vars} variables"
            )));
        }
        if var < 6 {
            table.words.fill(PROJECTIONS[var]);
        } else {
            for (i, word) in table.words.iter_mut().enumerate() {
                if (i >> (var - 6)) & 1 == 1 {
                    *word = u64::MAX;
                }
            }
        }
        table.mask_excess();
        Ok(table)
    }

    /// Parse a most-significant-first binary string.
    pub fn from_binary_string(bits: &str) -> XagResult<Self> {
        let len = bits.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(XagError::InvalidTruthTable(format!(
                "length {len} is not a power of two"
            )));
        }
        let mut table = Self::new(len.trailing_zeros() as usize)?;
        for (k, c) in bits.bytes().enumerate() {
            match c {
                b'0' => {}
                b'1' => table.set_bit(len - 1 - k, true),
                other => {
                    return Err(XagError::InvalidTruthTable(format!(
                        "unexpected character '{}'",
                        other as char
                    )));
                }
            }
        }
        Ok(table)
    }

    /// Get the number of variables.
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Get the number of bits, `2^num_vars`.
    #[inline]
    pub fn num_bits(&self) -> usize {
        1usize << self.num_vars
    }

    /// Get the value at `position`. Positions past the end read as `false`.
    #[inline]
    pub fn bit(&self, position: usize) -> bool {
        self.words
            .get(position >> 6)
            .is_some_and(|w| (w >> (position & 63)) & 1 == 1)
            && position < self.num_bits()
    }

    /// Set the value at `position`. Positions past the end are ignored.
    pub fn set_bit(&mut self, position: usize, value: bool) {
        if position >= self.num_bits() {
            return;
        }
        let word = &mut self.words[position >> 6];
        if value {
            *word |= 1 << (position & 63);
        } else {
            *word &= !(1 << (position & 63));
        }
    }

    /// Count the positions where the function is true.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Bitwise AND with a table over the same variables.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & b)
    }

    /// Bitwise XOR with a table over the same variables.
    #[must_use]
    pub fn xor(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// Bitwise complement.
    #[must_use]
    pub fn not(&self) -> Self {
        let mut table = Self {
            num_vars: self.num_vars,
            words: self.words.iter().map(|w| !w).collect(),
        };
        table.mask_excess();
        table
    }

    fn zip_with(&self, other: &Self, f: impl Fn(u64, u64) -> u64) -> Self {
        debug_assert_eq!(self.num_vars, other.num_vars);
        Self {
            num_vars: self.num_vars,
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        }
    }

    fn mask_excess(&mut self) {
        if self.num_vars < 6 {
            self.words[0] &= (1u64 << self.num_bits()) - 1;
        }
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in (0..self.num_bits()).rev() {
            f.write_str(if self.bit(position) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection() {
        let a = TruthTable::nth_var(2, 0).unwrap();
        let b = TruthTable::nth_var(2, 1).unwrap();
        assert_eq!(a.to_string(), "1010");
        assert_eq!(b.to_string(), "1100");
        assert_eq!(a.and(&b).to_string(), "1000");
        assert_eq!(a.xor(&b).to_string(), "0110");
        assert_eq!(a.not().to_string(), "0101");
    }

    #[test]
    fn test_large_projection() {
        let x7 = TruthTable::nth_var(8, 7).unwrap();
        assert_eq!(x7.count_ones(), 128);
        assert!(!x7.bit(127));
        assert!(x7.bit(128));
        assert!(TruthTable::nth_var(3, 3).is_err());
    }

    #[test]
    fn test_binary_string_round_trip() {
        let tt = TruthTable::from_binary_string("0110").unwrap();
        assert_eq!(tt.num_vars(), 2);
        assert!(tt.bit(1));
        assert!(tt.bit(2));
        assert!(!tt.bit(3));
        assert_eq!(tt.to_string(), "0110");

        let single = TruthTable::from_binary_string("1").unwrap();
        assert_eq!(single.num_vars(), 0);
        assert!(single.bit(0));
    }

    #[test]
    fn test_binary_string_errors() {
        assert!(TruthTable::from_binary_string("").is_err());
        assert!(TruthTable::from_binary_string("101").is_err());
        assert!(TruthTable::from_binary_string("10a1").is_err());
    }

    #[test]
    fn test_not_masks_unused_bits() {
        let zero = TruthTable::new(1).unwrap();
        let one = zero.not();
        assert_eq!(one.count_ones(), 2);
        assert_eq!(one.to_string(), "11");
    }
}
