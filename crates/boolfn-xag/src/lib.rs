//! XOR-AND graph logic networks for boolfn
//!
//! This crate provides the network side of the Boolean function compiler:
//!
//! - [`LogicNetwork`]: the construction interface the front end emits gates
//!   through
//! - [`Simulate`]: single-pattern and exhaustive evaluation
//! - [`Xag`]: a graph-backed XOR-AND network implementing both
//! - [`TruthTable`]: word-packed complete truth tables
//! - [`io`]: AIGER, DIMACS and structural Verilog readers
//!
//! # Example
//!
//! ```rust
//! use boolfn_xag::{LogicNetwork, Simulate, Xag};
//!
//! let mut xag = Xag::new();
//! let a = xag.create_pi(Some("a"));
//! let b = xag.create_pi(Some("b"));
//! let sum = xag.create_xor(a, b);
//! let carry = xag.create_and(a, b);
//! xag.create_po(sum);
//! xag.create_po(carry);
//!
//! assert_eq!(xag.simulate_pattern(&[true, true]).unwrap(), vec![false, true]);
//! let tables = xag.simulate_truth_tables().unwrap();
//! assert_eq!(tables[0].to_string(), "0110");
//! assert_eq!(tables[1].to_string(), "1000");
//! ```

pub mod error;
pub mod io;
pub mod network;
mod simulate;
pub mod truth_table;
pub mod xag;

pub use error::{XagError, XagResult};
pub use network::{LogicNetwork, Simulate};
pub use truth_table::TruthTable;
pub use xag::{NodeIndex, Signal, Xag, XagNode};
