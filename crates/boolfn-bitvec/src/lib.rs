//! Fixed-width bit vectors for boolfn
//!
//! [`BitVector`] is the value type of the Boolean function compiler. It is
//! used as a type annotation and literal constructor inside parsed functions
//! (`BitVec(4)`, `BitVec(2, '10')`) and as the argument and result type when a
//! compiled function is simulated.
//!
//! # Conventions
//!
//! | Aspect | Convention |
//! |--------|------------|
//! | Bit numbering | little endian, bit `0` is least significant |
//! | Text form | fixed width, zero padded, most significant bit first |
//! | Ranges | `[high:low]`, high bound first and excluded |
//! | Bitwise operators | equal widths required, result is a `BitVecResult` |
//!
//! # Example
//!
//! ```rust
//! use boolfn_bitvec::BitVector;
//!
//! let a = BitVector::from_bits(4, "1100").unwrap();
//! let b = BitVector::new(4, 0b1010u32).unwrap();
//!
//! assert_eq!((&a & &b).unwrap().to_string(), "1000");
//! assert_eq!((!&a).to_string(), "0011");
//! assert_eq!(a.slice(Some(4), Some(2)).unwrap().to_string(), "11");
//! ```

pub mod error;
pub mod vector;

pub use error::{BitVecError, BitVecResult};
pub use vector::BitVector;
