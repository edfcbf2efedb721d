//! Simulation of [`Xag`] networks.

use tracing::debug;

use crate::error::{XagError, XagResult};
use crate::network::{LogicNetwork, Simulate};
use crate::truth_table::TruthTable;
use crate::xag::{Signal, Xag, XagNode};

impl Xag {
    /// Evaluate every node once in creation order.
    ///
    /// `leaf` supplies the value of the constant node and of each primary
    /// input (by input position), `and`/`xor`/`not` combine values.
    fn evaluate<T: Clone>(
        &self,
        mut leaf: impl FnMut(Option<usize>) -> T,
        and: impl Fn(&T, &T) -> T,
        xor: impl Fn(&T, &T) -> T,
        not: impl Fn(&T) -> T,
    ) -> XagResult<Vec<T>> {
        let mut values: Vec<T> = Vec::with_capacity(self.num_nodes());
        let mut next_input = 0;
        let fetch = |values: &[T], s: Signal| {
            let v = &values[s.node.index()];
            if s.complemented { not(v) } else { v.clone() }
        };
        for index in self.graph().node_indices() {
            let value = match &self.graph()[index] {
                XagNode::Constant => leaf(None),
                XagNode::Input { .. } => {
                    next_input += 1;
                    leaf(Some(next_input - 1))
                }
                XagNode::And => {
                    let [a, b] = self.fanins(index)?;
                    and(&fetch(&values, a), &fetch(&values, b))
                }
                XagNode::Xor => {
                    let [a, b] = self.fanins(index)?;
                    xor(&fetch(&values, a), &fetch(&values, b))
                }
            };
            values.push(value);
        }
        Ok(self.pos().iter().map(|s| fetch(&values, *s)).collect())
    }
}

impl Simulate for Xag {
    fn simulate_pattern(&self, inputs: &[bool]) -> XagResult<Vec<bool>> {
        if inputs.len() != self.num_pis() {
            return Err(XagError::InputLengthMismatch {
                expected: self.num_pis(),
                got: inputs.len(),
            });
        }
        self.evaluate(
            |leaf| leaf.is_some_and(|i| inputs[i]),
            |a, b| *a && *b,
            |a, b| *a ^ *b,
            |a| !*a,
        )
    }

    fn simulate_truth_tables(&self) -> XagResult<Vec<TruthTable>> {
        let num_vars = self.num_pis();
        debug!(
            num_vars,
            num_gates = self.num_gates(),
            "Simulating truth tables"
        );
        let constant = TruthTable::new(num_vars)?;
        let projections = (0..num_vars)
            .map(|i| TruthTable::nth_var(num_vars, i))
            .collect::<XagResult<Vec<_>>>()?;
        self.evaluate(
            |leaf| match leaf {
                None => constant.clone(),
                Some(i) => projections[i].clone(),
            },
            TruthTable::and,
            TruthTable::xor,
            TruthTable::not,
        )
    }
}
