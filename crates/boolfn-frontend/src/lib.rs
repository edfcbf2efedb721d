//! Function and expression front end for boolfn
//!
//! This crate reads a restricted, Python-like source syntax and lowers it to
//! a logic network through the [`LogicNetwork`](boolfn_xag::LogicNetwork)
//! interface.
//!
//! # Supported Syntax
//!
//! | Construct | Example |
//! |-----------|---------|
//! | Annotated function | `def f(a, b: BitVec(2)) -> BitVec(2):` |
//! | Tuple return | `-> (BitVec(1), BitVec(1)):` / `return a, b` |
//! | Bitwise operators | `a & b`, `a \| b`, `a ^ b`, `~a` |
//! | Boolean operators | `a and b`, `a or b`, `not a` |
//! | Comparisons | `a == b`, `a != b`, `a == b == c` |
//! | Literals | `BitVec('101')`, `BitVec(4)`, `BitVec(3, 5)` |
//! | Subscripts | `a[0]`, `a[3:1]` |
//! | Assignment | `c = a & b`, `c ^= a` |
//!
//! Loops, branches and arithmetic are rejected with a
//! [`ParseError`] naming the construct.
//!
//! # Example: Function
//!
//! ```rust
//! use boolfn_frontend::parse_function;
//! use boolfn_xag::Simulate;
//!
//! let source = r#"
//!     def majority(a, b, c: BitVec(1)) -> BitVec(1):
//!         return (a and b) or (a and c) or (b and c)
//! "#;
//!
//! let parsed = parse_function(source).unwrap();
//! assert_eq!(parsed.name, "majority");
//! let tables = parsed.network.simulate_truth_tables().unwrap();
//! assert_eq!(tables[0].to_string(), "11101000");
//! ```
//!
//! # Example: Expression
//!
//! ```rust
//! use boolfn_frontend::ExpressionParser;
//! use boolfn_xag::Simulate;
//!
//! let parsed = ExpressionParser::with_order(["A", "B"]).parse("A & ~B").unwrap();
//! assert_eq!(parsed.network.simulate_pattern(&[true, false]).unwrap(), vec![true]);
//! ```

mod ast;
mod error;
mod lexer;
mod lowering;
mod parser;
mod types;

use boolfn_xag::Xag;

pub use error::{ParseError, ParseResult};
pub use lowering::{ExpressionParser, FunctionParser, ParsedFunction};
pub use parser::parse_module;
pub use types::{Signature, ValueKind, ValueType, signature_width};

// Re-export AST types for tooling
pub mod syntax {
    pub use crate::ast::*;
}

/// Parse a single function definition into an XAG.
pub fn parse_function(source: &str) -> ParseResult<ParsedFunction<Xag>> {
    FunctionParser::new().parse(source)
}

/// Parse a Boolean expression into an XAG, ordering inputs by first
/// occurrence.
pub fn parse_expression(source: &str) -> ParseResult<ParsedFunction<Xag>> {
    ExpressionParser::new().parse(source)
}
