//! Readers for standard combinational network formats.
//!
//! Every reader has a `parse_*` function working on in-memory text or bytes
//! and a `read_*` wrapper that loads a file first. All of them produce an
//! [`Xag`](crate::Xag) or any other [`LogicNetwork`](crate::LogicNetwork).

mod aiger;
mod dimacs;
mod verilog;

pub use aiger::{parse_aiger, read_aiger};
pub use dimacs::{parse_dimacs, read_dimacs};
pub use verilog::{parse_verilog, read_verilog};
