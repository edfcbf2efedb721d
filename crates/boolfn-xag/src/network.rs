//! Capability traits implemented by logic networks.
//!
//! The front end only needs [`LogicNetwork`] to emit gates; callers that
//! evaluate a network additionally need [`Simulate`]. Keeping them apart lets
//! tests wrap or replace either side.

use std::fmt::Debug;

use crate::error::XagResult;
use crate::truth_table::TruthTable;

/// Construction interface of a single-output-per-signal Boolean network.
pub trait LogicNetwork: Default {
    /// Handle to one wire of the network.
    type Signal: Copy + Debug + PartialEq;

    /// Create a primary input, optionally named.
    fn create_pi(&mut self, name: Option<&str>) -> Self::Signal;

    /// Mark `signal` as the next primary output.
    fn create_po(&mut self, signal: Self::Signal);

    /// Get the constant signal for `value`.
    fn get_constant(&mut self, value: bool) -> Self::Signal;

    /// Two-input AND.
    fn create_and(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;

    /// Two-input OR.
    fn create_or(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;

    /// Two-input XOR.
    fn create_xor(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;

    /// Two-input XNOR.
    fn create_xnor(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal;

    /// Inverter.
    fn create_not(&mut self, a: Self::Signal) -> Self::Signal;

    /// AND over any number of signals. The empty conjunction is constant true.
    fn create_nary_and(&mut self, signals: &[Self::Signal]) -> Self::Signal {
        match signals.split_first() {
            None => self.get_constant(true),
            Some((first, rest)) => rest
                .iter()
                .fold(*first, |acc, s| self.create_and(acc, *s)),
        }
    }

    /// OR over any number of signals. The empty disjunction is constant false.
    fn create_nary_or(&mut self, signals: &[Self::Signal]) -> Self::Signal {
        match signals.split_first() {
            None => self.get_constant(false),
            Some((first, rest)) => rest.iter().fold(*first, |acc, s| self.create_or(acc, *s)),
        }
    }

    /// Number of primary inputs.
    fn num_pis(&self) -> usize;

    /// Number of primary outputs.
    fn num_pos(&self) -> usize;
}

/// Evaluation interface of a logic network.
pub trait Simulate {
    /// Evaluate every primary output for one input assignment.
    ///
    /// `inputs[i]` is the value of primary input `i`.
    fn simulate_pattern(&self, inputs: &[bool]) -> XagResult<Vec<bool>>;

    /// Compute the complete truth table of every primary output.
    fn simulate_truth_tables(&self) -> XagResult<Vec<TruthTable>>;
}
