//! Property-based tests for the `BitVector` algebra.
//!
//! Values are drawn from `u64` and masked to the chosen width, so every
//! generated `(length, value)` pair satisfies `value < 2^length`.

use boolfn_bitvec::{BitVecError, BitVector};
use num_bigint::BigUint;
use proptest::prelude::*;

fn mask(length: usize) -> u64 {
    if length >= 64 {
        u64::MAX
    } else {
        (1u64 << length) - 1
    }
}

/// A width in `1..=64` and a value that fits in it.
fn arb_length_value() -> impl Strategy<Value = (usize, u64)> {
    (1_usize..=64, any::<u64>()).prop_map(|(length, raw)| (length, raw & mask(length)))
}

/// Two vectors of the same width.
fn arb_pair() -> impl Strategy<Value = (BitVector, BitVector)> {
    (1_usize..=64, any::<u64>(), any::<u64>()).prop_map(|(length, a, b)| {
        (
            BitVector::new(length, a & mask(length)).unwrap(),
            BitVector::new(length, b & mask(length)).unwrap(),
        )
    })
}

proptest! {
    /// Rendering then re-reading the text form gives back the same value.
    #[test]
    fn test_text_round_trip((length, value) in arb_length_value()) {
        let original = BitVector::new(length, value).unwrap();
        let text = original.to_string();
        prop_assert_eq!(text.len(), length);

        let reparsed = BitVector::from_bits(length, &text).unwrap();
        prop_assert_eq!(reparsed.value(), &BigUint::from(value));
        prop_assert_eq!(reparsed, original);
    }

    /// `&`, `|` and `^` agree with the integer operators and commute.
    #[test]
    fn test_bitwise_matches_integers((a, b) in arb_pair()) {
        let av = a.to_u64().unwrap();
        let bv = b.to_u64().unwrap();

        prop_assert_eq!((&a & &b).unwrap().to_u64(), Some(av & bv));
        prop_assert_eq!((&a | &b).unwrap().to_u64(), Some(av | bv));
        prop_assert_eq!((&a ^ &b).unwrap().to_u64(), Some(av ^ bv));

        prop_assert_eq!((&a & &b).unwrap(), (&b & &a).unwrap());
        prop_assert_eq!((&a | &b).unwrap(), (&b | &a).unwrap());
        prop_assert_eq!((&a ^ &b).unwrap(), (&b ^ &a).unwrap());
    }

    /// Indexing returns the matching bit as a one-bit vector.
    #[test]
    fn test_index_law((length, value) in arb_length_value(), seed in any::<usize>()) {
        let v = BitVector::new(length, value).unwrap();
        let i = seed % length;
        let bit = v.bit(i).unwrap();
        prop_assert_eq!(bit.len(), 1);
        prop_assert_eq!(bit.to_u64(), Some((value >> i) & 1));
    }

    /// `v[i:j]` keeps bits `j..i` and fails unless `i > j`.
    #[test]
    fn test_slice_law(
        (length, value) in arb_length_value(),
        i in 0_usize..=64,
        j in 0_usize..=64,
    ) {
        let v = BitVector::new(length, value).unwrap();
        let result = v.slice(Some(i), Some(j));
        if i > j {
            let s = result.unwrap();
            prop_assert_eq!(s.len(), i - j);
            prop_assert_eq!(s.to_u64(), Some((value & mask(i)) >> j));
        } else {
            prop_assert!(matches!(result, Err(BitVecError::Range(_))));
        }
    }

    /// Complement flips every bit within the width and nothing above it.
    #[test]
    fn test_not_is_involution((length, value) in arb_length_value()) {
        let v = BitVector::new(length, value).unwrap();
        let inverted = !&v;
        prop_assert_eq!(inverted.to_u64(), Some(!value & mask(length)));
        prop_assert_eq!(!inverted, v);
    }
}

#[test]
fn test_serde_uses_text_form() {
    let v: BitVector = "00101".parse().unwrap();
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, "\"00101\"");

    let back: BitVector = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v);
    assert!(serde_json::from_str::<BitVector>("\"012\"").is_err());
}
