//! Graph-based XOR-AND network.

use std::ops::Not;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::{XagError, XagResult};
use crate::network::LogicNetwork;

/// Node index type for the network graph.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node of an [`Xag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum XagNode {
    /// The constant-false node. Always node 0.
    Constant,
    /// A primary input.
    Input {
        /// Optional symbolic name.
        name: Option<String>,
    },
    /// Two-input AND gate.
    And,
    /// Two-input XOR gate.
    Xor,
}

impl XagNode {
    /// Check if this is a gate node.
    #[inline]
    pub fn is_gate(&self) -> bool {
        matches!(self, XagNode::And | XagNode::Xor)
    }
}

/// A possibly complemented reference to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signal {
    /// Driving node.
    pub node: NodeIndex,
    /// Whether the value of `node` is inverted.
    pub complemented: bool,
}

impl Signal {
    fn new(node: NodeIndex) -> Self {
        Self {
            node,
            complemented: false,
        }
    }
}

impl Not for Signal {
    type Output = Signal;

    fn not(self) -> Signal {
        Signal {
            node: self.node,
            complemented: !self.complemented,
        }
    }
}

/// XOR-AND graph.
///
/// Nodes live in a `DiGraph` in creation order, which is a topological order
/// because gates can only reference signals that already exist. Edges point
/// from a fanin to the gate it feeds and carry the complement flag of that
/// fanin. OR and XNOR are expressed through complemented edges, so the graph
/// only ever contains [`XagNode::And`] and [`XagNode::Xor`] gates.
#[derive(Debug, Clone)]
pub struct Xag {
    graph: DiGraph<XagNode, bool, u32>,
    inputs: Vec<NodeIndex>,
    outputs: Vec<Signal>,
}

impl Default for Xag {
    fn default() -> Self {
        Self::new()
    }
}

impl Xag {
    /// Create an empty network holding only the constant node.
    pub fn new() -> Self {
        let mut graph = DiGraph::default();
        graph.add_node(XagNode::Constant);
        Self {
            graph,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Get the underlying graph.
    #[inline]
    pub fn graph(&self) -> &DiGraph<XagNode, bool, u32> {
        &self.graph
    }

    /// Get the number of nodes, including the constant and the inputs.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of AND and XOR gates.
    pub fn num_gates(&self) -> usize {
        self.graph.node_weights().filter(|n| n.is_gate()).count()
    }

    /// Get the primary input nodes in creation order.
    #[inline]
    pub fn pis(&self) -> &[NodeIndex] {
        &self.inputs
    }

    /// Get the primary output signals in creation order.
    #[inline]
    pub fn pos(&self) -> &[Signal] {
        &self.outputs
    }

    /// Get the name of primary input `index`, if it has one.
    pub fn pi_name(&self, index: usize) -> Option<&str> {
        let node = self.inputs.get(index)?;
        match self.graph.node_weight(*node)? {
            XagNode::Input { name } => name.as_deref(),
            _ => None,
        }
    }

    /// Get the node at `index`.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&XagNode> {
        self.graph.node_weight(index)
    }

    /// Get the two fanins of a gate as signals.
    pub fn fanins(&self, gate: NodeIndex) -> XagResult<[Signal; 2]> {
        let mut edges = self
            .graph
            .edges_directed(gate, Direction::Incoming)
            .map(|e| Signal {
                node: e.source(),
                complemented: *e.weight(),
            });
        match (edges.next(), edges.next(), edges.next()) {
            (Some(a), Some(b), None) => Ok([b, a]),
            _ => Err(XagError::InvalidNetwork(format!(
                "gate {} does not have exactly two fanins",
                gate.index()
            ))),
        }
    }

    /// Get the number of gates on the longest input-to-output path.
    pub fn depth(&self) -> XagResult<usize> {
        let mut levels = vec![0usize; self.graph.node_count()];
        for index in self.graph.node_indices() {
            if self.graph[index].is_gate() {
                let [a, b] = self.fanins(index)?;
                levels[index.index()] = 1 + levels[a.node.index()].max(levels[b.node.index()]);
            }
        }
        Ok(self
            .outputs
            .iter()
            .map(|s| levels[s.node.index()])
            .max()
            .unwrap_or(0))
    }

    fn add_gate(&mut self, kind: XagNode, a: Signal, b: Signal) -> Signal {
        let gate = self.graph.add_node(kind);
        self.graph.add_edge(a.node, gate, a.complemented);
        self.graph.add_edge(b.node, gate, b.complemented);
        Signal::new(gate)
    }
}

impl LogicNetwork for Xag {
    type Signal = Signal;

    fn create_pi(&mut self, name: Option<&str>) -> Signal {
        let node = self.graph.add_node(XagNode::Input {
            name: name.map(str::to_string),
        });
        self.inputs.push(node);
        Signal::new(node)
    }

    fn create_po(&mut self, signal: Signal) {
        self.outputs.push(signal);
    }

    fn get_constant(&mut self, value: bool) -> Signal {
        Signal {
            node: NodeIndex::new(0),
            complemented: value,
        }
    }

    fn create_and(&mut self, a: Signal, b: Signal) -> Signal {
        self.add_gate(XagNode::And, a, b)
    }

    fn create_or(&mut self, a: Signal, b: Signal) -> Signal {
        !self.add_gate(XagNode::And, !a, !b)
    }

    fn create_xor(&mut self, a: Signal, b: Signal) -> Signal {
        self.add_gate(XagNode::Xor, a, b)
    }

    fn create_xnor(&mut self, a: Signal, b: Signal) -> Signal {
        !self.add_gate(XagNode::Xor, a, b)
    }

    fn create_not(&mut self, a: Signal) -> Signal {
        !a
    }

    fn num_pis(&self) -> usize {
        self.inputs.len()
    }

    fn num_pos(&self) -> usize {
        self.outputs.len()
    }
}
