//! Boolean function compiler
//!
//! `boolfn` compiles small, type-annotated Boolean functions written in a
//! restricted Python-like syntax into XOR-AND graphs, and evaluates them
//! point-wise or exhaustively.
//!
//! # Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `boolfn-bitvec` | [`BitVector`], the fixed-width value type |
//! | `boolfn-xag` | [`Xag`] networks, [`TruthTable`], AIGER/DIMACS/Verilog readers |
//! | `boolfn-frontend` | tokenizer, parser and lowering to networks |
//! | `boolfn` | the [`BoolFunction`] facade |
//!
//! # Example
//!
//! ```rust
//! use boolfn::{BitVector, BoolFunction, FunctionOutput};
//!
//! let source = r#"
//! def half_adder(a, b: BitVec(1)) -> (BitVec(1), BitVec(1)):
//!     return a ^ b, a & b
//! "#;
//!
//! let f = BoolFunction::from_source(source).unwrap();
//! assert_eq!(f.num_inputs(), 2);
//! assert_eq!(f.num_outputs(), 2);
//!
//! let one = BitVector::from(true);
//! let out = f.simulate(&[one.clone(), one]).unwrap();
//! assert_eq!(out.to_string(), "(0, 1)");
//!
//! assert_eq!(f.truth_table(0).unwrap().to_string(), "0110");
//! assert_eq!(f.truth_table(1).unwrap().to_string(), "1000");
//! ```
//!
//! # Example: Truth Tables
//!
//! ```rust
//! use boolfn::BoolFunction;
//!
//! let f = BoolFunction::from_truth_table(&["1000"]).unwrap();
//! assert_eq!(f.num_inputs(), 2);
//! assert_eq!(f.count_ones().unwrap(), vec![1]);
//! ```

mod config;
mod error;
mod function;

pub use config::SimulationConfig;
pub use error::{BoolFnError, BoolFnResult};
pub use function::{BoolFunction, FunctionOutput};

pub use boolfn_bitvec::{BitVecError, BitVector};
pub use boolfn_frontend::{
    ExpressionParser, FunctionParser, ParseError, ParsedFunction, Signature, ValueKind, ValueType,
};
pub use boolfn_xag::{LogicNetwork, Simulate, TruthTable, Xag, XagError};
