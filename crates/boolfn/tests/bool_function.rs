//! Integration tests for the BoolFunction facade.

use std::cell::Cell;

use boolfn::{
    BitVector, BoolFnError, BoolFunction, FunctionOutput, FunctionParser, LogicNetwork,
    ParseError, Simulate, SimulationConfig, TruthTable, ValueType, Xag, XagError,
};
use proptest::prelude::*;

fn bits(s: &str) -> BitVector {
    s.parse().unwrap()
}

const AND: &str = "def f(a, b: BitVec(1)) -> BitVec(1):\n    return a & b\n";

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[test]
fn test_identity_signature_and_simulation() {
    let f = BoolFunction::from_source("def identity(a: BitVec(1)) -> BitVec(1):\n    return a\n")
        .unwrap();
    assert_eq!(f.name(), "identity");
    assert_eq!(f.parameters(), &[ValueType::BIT]);
    assert_eq!(f.returns(), &[ValueType::BIT]);
    for v in ["0", "1"] {
        assert_eq!(f.simulate(&[bits(v)]).unwrap(), FunctionOutput::Single(bits(v)));
    }
}

#[test]
fn test_and_table_matches_point_simulation() {
    let f = BoolFunction::from_source(AND).unwrap();
    let points: Vec<_> = ["00", "01", "10", "11"]
        .iter()
        .map(|p| {
            let (b, a) = p.split_at(1);
            f.simulate(&[bits(a), bits(b)]).unwrap()
        })
        .collect();

    assert_eq!(f.simulate_all().unwrap()[0].to_string(), "1000");
    assert_eq!(f.truth_table(0).unwrap().to_string(), "1000");

    // Same answers once the cache is populated.
    let cached: Vec<_> = ["00", "01", "10", "11"]
        .iter()
        .map(|p| {
            let (b, a) = p.split_at(1);
            f.simulate(&[bits(a), bits(b)]).unwrap()
        })
        .collect();
    assert_eq!(points, cached);
    assert_eq!(f.enumerate().unwrap(), cached);
}

#[test]
fn test_multi_bit_tuple_outputs() {
    let source = r"
def f(a, b: BitVec(2)) -> (BitVec(2), BitVec(1)):
    return a ^ b, a == b
";
    let f = BoolFunction::from_source(source).unwrap();
    assert_eq!(f.num_inputs(), 2);
    assert_eq!(f.num_input_bits(), 4);
    assert_eq!(f.num_outputs(), 2);
    assert_eq!(f.num_output_bits(), 3);

    let out = f.simulate(&[bits("10"), bits("11")]).unwrap();
    assert_eq!(out, FunctionOutput::Tuple(vec![bits("01"), bits("0")]));
    f.simulate_all().unwrap();
    assert_eq!(f.simulate(&[bits("10"), bits("11")]).unwrap(), out);
    assert_eq!(f.simulate(&[bits("01"), bits("01")]).unwrap().to_string(), "(00, 1)");
}

#[test]
fn test_simulate_argument_errors() {
    let f = BoolFunction::from_source(AND).unwrap();
    assert!(matches!(
        f.simulate(&[bits("1")]),
        Err(BoolFnError::Arity { expected: 2, got: 1 })
    ));
    let err = f.simulate(&[bits("1"), bits("10")]).unwrap_err();
    assert!(matches!(
        err,
        BoolFnError::ArgumentType { index: 1, expected, actual }
            if expected == ValueType::BIT && actual == ValueType::bitvec(2)
    ));
    assert!(err.to_string().contains("Argument 1"));
}

#[test]
fn test_output_out_of_range() {
    let f = BoolFunction::from_source(AND).unwrap();
    assert!(matches!(
        f.truth_table(1),
        Err(BoolFnError::OutputOutOfRange { index: 1, num_outputs: 1 })
    ));
}

#[test]
fn test_input_limit() {
    let f = BoolFunction::from_source(AND)
        .unwrap()
        .with_config(SimulationConfig::new().with_max_truth_table_inputs(1));
    assert!(matches!(
        f.simulate_all(),
        Err(BoolFnError::TooManyInputs { limit: 1, got: 2 })
    ));
    // Point simulation is unaffected and the failure left no cache behind.
    let one = bits("1");
    assert_eq!(f.simulate(&[one.clone(), one]).unwrap().to_string(), "1");
}

// ---------------------------------------------------------------------------
// Parse errors surface unchanged
// ---------------------------------------------------------------------------

#[test]
fn test_parse_errors() {
    let missing_arg = BoolFunction::from_source("def f(a) -> BitVec(1):\n    return a\n");
    assert!(matches!(
        missing_arg,
        Err(BoolFnError::Parse(ParseError::MissingArgumentType { .. }))
    ));
    let missing_ret = BoolFunction::from_source("def f(a: BitVec(1)):\n    return a\n");
    assert!(matches!(
        missing_ret,
        Err(BoolFnError::Parse(ParseError::MissingReturnType))
    ));
    let scope = BoolFunction::from_source("def f(a: BitVec(1)) -> BitVec(1):\n    return z\n")
        .unwrap_err();
    assert!(matches!(scope, BoolFnError::Parse(ParseError::OutOfScope(ref n)) if n == "z"));
    assert_eq!(scope.to_string(), "out of scope: z");
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

const ORACLE: &str = "((A & C) | (B & D)) & ~(C & D)";

fn pi_names(f: &BoolFunction) -> Vec<String> {
    let xag = f.logic_network().unwrap();
    (0..xag.num_pis())
        .map(|i| xag.pi_name(i).unwrap().to_string())
        .collect()
}

#[test]
fn test_expression_input_order() {
    let ordered = BoolFunction::from_expression_with_order(ORACLE, ["A", "B", "C", "D"]).unwrap();
    assert_eq!(pi_names(&ordered), ["A", "B", "C", "D"]);

    let natural = BoolFunction::from_expression(ORACLE).unwrap();
    assert_eq!(pi_names(&natural), ["A", "C", "B", "D"]);
    assert_eq!(natural.num_inputs(), 4);
    assert_eq!(natural.returns(), &[ValueType::BIT]);

    let err = BoolFunction::from_expression_with_order(ORACLE, ["A", "B", "D"]).unwrap_err();
    assert!(matches!(
        err,
        BoolFnError::Parse(ParseError::MissingVariables { ref missing }) if missing == &["C"]
    ));
}

// ---------------------------------------------------------------------------
// Alternate constructors
// ---------------------------------------------------------------------------

#[test]
fn test_from_truth_table() {
    let f = BoolFunction::from_truth_table(&["1010", "1100"]).unwrap();
    assert_eq!(f.num_inputs(), 2);
    assert_eq!(f.num_outputs(), 2);
    assert_eq!(f.num_input_bits(), 2);
    let one = bits("1");
    assert_eq!(
        f.simulate(&[one.clone(), one]).unwrap(),
        FunctionOutput::Tuple(vec![bits("1"), bits("1")])
    );
    // Position 1 is a = 1, b = 0.
    assert_eq!(f.simulate(&[bits("1"), bits("0")]).unwrap().to_string(), "(1, 0)");
    assert_eq!(f.truth_table(1).unwrap().to_string(), "1100");
}

#[test]
fn test_from_truth_table_rejects_bad_lengths() {
    for tables in [vec!["101"], vec![""], vec!["10", "1000"], vec![]] {
        assert!(matches!(
            BoolFunction::from_truth_table(tables.as_slice()),
            Err(BoolFnError::InvalidTruthTableLength(_))
        ));
    }
    assert!(matches!(
        BoolFunction::from_truth_table_str("10x1"),
        Err(BoolFnError::Network(XagError::InvalidTruthTable(_)))
    ));
}

#[test]
fn test_network_readers() {
    let aiger = "aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n";
    let from_aiger = BoolFunction::from_aiger_bytes(aiger.as_bytes()).unwrap();
    let from_dimacs = BoolFunction::from_dimacs_str("p cnf 2 2\n1 0\n2 0\n").unwrap();
    let from_verilog = BoolFunction::from_verilog_str(
        "module m(a, b, y);\n  input a, b;\n  output y;\n  assign y = a & b;\nendmodule\n",
    )
    .unwrap();

    for f in [&from_aiger, &from_dimacs, &from_verilog] {
        assert_eq!(f.parameters(), &[ValueType::BIT; 2]);
        assert_eq!(f.returns(), &[ValueType::BIT]);
        assert_eq!(f.truth_table(0).unwrap().to_string(), "1000");
    }

    let path = std::env::temp_dir().join(format!("boolfn-{}-and.cnf", std::process::id()));
    std::fs::write(&path, "p cnf 2 2\n1 0\n2 0\n").unwrap();
    let from_file = BoolFunction::from_dimacs_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(from_file.name().ends_with("and"));
    assert_eq!(from_file.count_ones().unwrap(), vec![1]);

    assert!(matches!(
        BoolFunction::from_verilog_file("/nonexistent/boolfn.v"),
        Err(BoolFnError::Network(XagError::Io(_)))
    ));
}

// ---------------------------------------------------------------------------
// Truth tables are computed once
// ---------------------------------------------------------------------------

/// An XAG that counts exhaustive simulations.
#[derive(Default)]
struct CountingXag {
    inner: Xag,
    table_runs: Cell<usize>,
}

impl LogicNetwork for CountingXag {
    type Signal = <Xag as LogicNetwork>::Signal;

    fn create_pi(&mut self, name: Option<&str>) -> Self::Signal {
        self.inner.create_pi(name)
    }
    fn create_po(&mut self, signal: Self::Signal) {
        self.inner.create_po(signal);
    }
    fn get_constant(&mut self, value: bool) -> Self::Signal {
        self.inner.get_constant(value)
    }
    fn create_and(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.inner.create_and(a, b)
    }
    fn create_or(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.inner.create_or(a, b)
    }
    fn create_xor(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.inner.create_xor(a, b)
    }
    fn create_xnor(&mut self, a: Self::Signal, b: Self::Signal) -> Self::Signal {
        self.inner.create_xnor(a, b)
    }
    fn create_not(&mut self, a: Self::Signal) -> Self::Signal {
        self.inner.create_not(a)
    }
    fn num_pis(&self) -> usize {
        self.inner.num_pis()
    }
    fn num_pos(&self) -> usize {
        self.inner.num_pos()
    }
}

impl Simulate for CountingXag {
    fn simulate_pattern(&self, inputs: &[bool]) -> Result<Vec<bool>, XagError> {
        self.inner.simulate_pattern(inputs)
    }

    fn simulate_truth_tables(&self) -> Result<Vec<TruthTable>, XagError> {
        self.table_runs.set(self.table_runs.get() + 1);
        self.inner.simulate_truth_tables()
    }
}

#[test]
fn test_simulate_all_runs_once() {
    let parsed = FunctionParser::new().parse_into::<CountingXag>(AND).unwrap();
    let f = BoolFunction::from_parsed(parsed);

    let first: Vec<TruthTable> = f.simulate_all().unwrap().to_vec();
    let second: Vec<TruthTable> = f.simulate_all().unwrap().to_vec();
    f.truth_table(0).unwrap();
    f.enumerate().unwrap();
    f.count_ones().unwrap();

    assert_eq!(first, second);
    assert_eq!(f.logic_network().unwrap().table_runs.get(), 1);
}

// ---------------------------------------------------------------------------
// Point simulation agrees with exhaustive simulation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn point_and_table_agree(a in 0u32..8, b in 0u32..8) {
        let source = r"
def f(a, b: BitVec(3)) -> (BitVec(3), BitVec(1)):
    return (a & ~b) | (b & ~a), a != b
";
        let fresh = BoolFunction::from_source(source).unwrap();
        let cached = BoolFunction::from_source(source).unwrap();
        cached.simulate_all().unwrap();

        let args = [BitVector::new(3, a).unwrap(), BitVector::new(3, b).unwrap()];
        let expected = FunctionOutput::Tuple(vec![
            (&args[0] ^ &args[1]).unwrap(),
            BitVector::from(a != b),
        ]);
        prop_assert_eq!(fresh.simulate(&args).unwrap(), expected.clone());
        prop_assert_eq!(cached.simulate(&args).unwrap(), expected);
    }
}
