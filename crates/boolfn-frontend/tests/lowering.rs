//! Integration tests for function and expression lowering.

use boolfn_bitvec::BitVector;
use boolfn_frontend::{
    ExpressionParser, ParseError, ValueType, parse_expression, parse_function,
};
use boolfn_xag::{LogicNetwork, Simulate, Xag};
use proptest::prelude::*;

/// Simulate `source` on the given arguments and return the outputs as one
/// bit string per return slot.
fn run(source: &str, args: &[&str]) -> Vec<String> {
    let parsed = parse_function(source).unwrap();
    let mut inputs = Vec::new();
    for arg in args {
        let value: BitVector = arg.parse().unwrap();
        inputs.extend(value.to_bits_lsb_first());
    }
    let outputs = parsed.network.simulate_pattern(&inputs).unwrap();

    let mut offset = 0;
    parsed
        .returns
        .iter()
        .map(|ty| {
            let bits = &outputs[offset..offset + ty.width];
            offset += ty.width;
            BitVector::from_bits_lsb_first(bits).unwrap().to_string()
        })
        .collect()
}

fn single_table(network: &Xag) -> String {
    let tables = network.simulate_truth_tables().unwrap();
    assert_eq!(tables.len(), 1);
    tables[0].to_string()
}

// ---------------------------------------------------------------------------
// Constants and identities
// ---------------------------------------------------------------------------

#[test]
fn test_constants() {
    let constant = "def constant() -> BitVec(1):\n    return BitVec(1)\n";
    assert_eq!(run(constant, &[]), vec!["0"]);

    let two_bit = "def constant() -> BitVec(2):\n    return BitVec(2, '10')\n";
    assert_eq!(run(two_bit, &[]), vec!["10"]);

    let three_bit = "def constant() -> BitVec(3):\n    return BitVec('101')\n";
    assert_eq!(run(three_bit, &[]), vec!["101"]);

    let four_bit = "def constant() -> BitVec(4):\n    return BitVec(4)\n";
    assert_eq!(run(four_bit, &[]), vec!["0000"]);

    let padded = "def constant() -> BitVec(4):\n    return BitVec(4, 5)\n";
    assert_eq!(run(padded, &[]), vec!["0101"]);
}

#[test]
fn test_identity() {
    let identity = "def identity(a: BitVec(1)) -> BitVec(1):\n    return a\n";
    assert_eq!(run(identity, &["0"]), vec!["0"]);
    assert_eq!(run(identity, &["1"]), vec!["1"]);

    let identity_not = r"
def identity_not(a: BitVec(2)) -> (BitVec(2), BitVec(2)):
    return a, ~a
";
    for (input, inverted) in [("00", "11"), ("01", "10"), ("10", "01"), ("11", "00")] {
        assert_eq!(run(identity_not, &[input]), vec![input, inverted]);
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[test]
fn test_boolean_operators() {
    let cases = [
        ("not a", ["1", "1", "0", "0"]),
        ("a and b", ["0", "0", "0", "1"]),
        ("a or b", ["0", "1", "1", "1"]),
        ("a == b", ["1", "0", "0", "1"]),
        ("a != b", ["0", "1", "1", "0"]),
    ];
    for (body, expected) in cases {
        let source = format!("def f(a, b: BitVec(1)) -> BitVec(1):\n    return {body}\n");
        let got: Vec<String> = [("0", "0"), ("0", "1"), ("1", "0"), ("1", "1")]
            .iter()
            .map(|&(a, b)| run(&source, &[a, b]).remove(0))
            .collect();
        assert_eq!(got, expected, "{body}");
    }
}

#[test]
fn test_two_bit_equality() {
    let source = "def eq(a, b: BitVec(2)) -> BitVec(1):\n    return a == b\n";
    assert_eq!(run(source, &["10", "10"]), vec!["1"]);
    assert_eq!(run(source, &["10", "11"]), vec!["0"]);

    let ne = "def ne(a, b: BitVec(2)) -> BitVec(1):\n    return a != b\n";
    assert_eq!(run(ne, &["01", "01"]), vec!["0"]);
    assert_eq!(run(ne, &["01", "00"]), vec!["1"]);
}

#[test]
fn test_comparison_chain() {
    let source = "def f(a, b, c: BitVec(1)) -> BitVec(1):\n    return a == b == c\n";
    assert_eq!(run(source, &["1", "1", "1"]), vec!["1"]);
    assert_eq!(run(source, &["0", "0", "0"]), vec!["1"]);
    assert_eq!(run(source, &["1", "1", "0"]), vec!["0"]);
    assert_eq!(run(source, &["0", "1", "1"]), vec!["0"]);
}

#[test]
fn test_not_equal_chain_compares_neighbours() {
    let source = "def f(a, b, c: BitVec(1)) -> BitVec(1):\n    return a != b != c\n";
    // a != b and b != c; a and c are never compared.
    assert_eq!(run(source, &["0", "1", "0"]), vec!["1"]);
    assert_eq!(run(source, &["1", "0", "1"]), vec!["1"]);
    assert_eq!(run(source, &["0", "1", "1"]), vec!["0"]);
    assert_eq!(run(source, &["0", "0", "1"]), vec!["0"]);
}

#[test]
fn test_subscripts() {
    let source = r"
def f(a: BitVec(4)) -> (BitVec(1), BitVec(2)):
    return a[3], a[3:1]
";
    assert_eq!(run(source, &["1010"]), vec!["1", "01"]);
    assert_eq!(run(source, &["0110"]), vec!["0", "11"]);
}

#[test]
fn test_grover_oracle() {
    let source = r"
def grover_oracle(a, b, c, d: BitVec(1)) -> BitVec(1):
    return (not a and b and not c and d)
";
    let parsed = parse_function(source).unwrap();
    assert_eq!(parsed.parameters, vec![ValueType::BIT; 4]);
    assert_eq!(single_table(&parsed.network), "0000010000000000");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_typing_errors() {
    let missing_arg = "def f(a, b) -> BitVec(1):\n    return a\n";
    let err = parse_function(missing_arg).unwrap_err();
    assert!(matches!(err, ParseError::MissingArgumentType { .. }));
    assert!(err.to_string().to_lowercase().contains("argument type is needed"));

    let missing_return = "def f(a: BitVec(1)):\n    return a\n";
    let err = parse_function(missing_return).unwrap_err();
    assert!(err.to_string().to_lowercase().contains("return type is needed"));

    let out_of_scope = "def f(a, b: BitVec(1)) -> BitVec(1):\n    return a & c\n";
    let err = parse_function(out_of_scope).unwrap_err();
    assert!(err.to_string().contains("out of scope: c"));
}

#[test]
fn test_operator_errors() {
    let cases = [
        ("a & c", "BinOpWidthMismatch"),
        ("a == c", "CompareWidthMismatch"),
        ("not c", "MultiBitNot"),
        ("a + a", "UnsupportedOperator"),
        ("-a", "UnsupportedOperator"),
        ("a < a", "UnsupportedOperator"),
        ("c[a]", "Subscript"),
        ("c[5]", "IndexOutOfRange"),
        ("c[1::1]", "InvalidSlice"),
        ("a if a else a", "UnsupportedConstruct"),
        ("Int(1)", "UnknownType"),
    ];
    for (body, expected) in cases {
        let source = format!("def f(a: BitVec(1), c: BitVec(2)) -> BitVec(1):\n    return {body}\n");
        let err = parse_function(&source).unwrap_err();
        let variant = format!("{err:?}");
        assert!(variant.starts_with(expected), "{body}: {variant}");
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[test]
fn test_expression_order_changes_table() {
    let expr = "(A & B) | (~C & D)";
    let natural = ExpressionParser::with_order(["A", "B", "C", "D"]).parse(expr).unwrap();
    let swapped = ExpressionParser::with_order(["A", "C", "B", "D"]).parse(expr).unwrap();
    let implicit = parse_expression(expr).unwrap();

    assert_eq!(single_table(&natural.network), single_table(&implicit.network));
    assert_ne!(single_table(&natural.network), single_table(&swapped.network));

    let err = ExpressionParser::with_order(["A", "B", "D"]).parse(expr).unwrap_err();
    assert!(matches!(
        err,
        ParseError::MissingVariables { ref missing } if missing == &["C"]
    ));
}

#[test]
fn test_expression_network_shape() {
    let parsed = parse_expression("x ^ y ^ z").unwrap();
    assert_eq!(parsed.network.num_pis(), 3);
    assert_eq!(parsed.network.num_pos(), 1);
    assert_eq!(single_table(&parsed.network), "10010110");
}

// ---------------------------------------------------------------------------
// Network agrees with BitVector semantics
// ---------------------------------------------------------------------------

const WIDTH: usize = 3;

fn bitwise_source(op: &str) -> String {
    format!("def f(a, b: BitVec({WIDTH})) -> BitVec({WIDTH}):\n    return a {op} b\n")
}

proptest! {
    #[test]
    fn network_matches_bitvector(a in 0u32..8, b in 0u32..8) {
        let x = BitVector::new(WIDTH, a).unwrap();
        let y = BitVector::new(WIDTH, b).unwrap();
        let args = [x.to_string(), y.to_string()];
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        prop_assert_eq!(run(&bitwise_source("&"), &args), vec![(&x & &y).unwrap().to_string()]);
        prop_assert_eq!(run(&bitwise_source("|"), &args), vec![(&x | &y).unwrap().to_string()]);
        prop_assert_eq!(run(&bitwise_source("^"), &args), vec![(&x ^ &y).unwrap().to_string()]);

        let invert = format!("def f(a: BitVec({WIDTH})) -> BitVec({WIDTH}):\n    return ~a\n");
        prop_assert_eq!(run(&invert, &args[..1]), vec![(!&x).to_string()]);
    }
}
