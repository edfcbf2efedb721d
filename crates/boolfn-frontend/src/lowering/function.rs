//! Lowering of a single annotated function definition.

use boolfn_xag::{LogicNetwork, Xag};
use tracing::{debug, info, instrument};

use super::{Binding, Context, FreeVariables, ParsedFunction, annotation_type};
use crate::ast::{BinOp, Expression, FunctionDef, Statement};
use crate::error::{ParseError, ParseResult};
use crate::parser::parse_module;
use crate::types::{Signature, ValueType};

/// Parser for sources holding exactly one function definition:
///
/// ```text
/// def majority(a, b, c: BitVec(1)) -> BitVec(1):
///     return (a and b) or (a and c) or (b and c)
/// ```
///
/// Every parameter and the return value must be annotated (directly or,
/// for parameters, through the next annotated parameter). Names must be
/// bound before use.
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionParser;

impl FunctionParser {
    /// Create a new function parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse `source` into an XAG.
    pub fn parse(&self, source: &str) -> ParseResult<ParsedFunction<Xag>> {
        self.parse_into(source)
    }

    /// Parse `source` into any network type.
    #[instrument(skip(self, source))]
    pub fn parse_into<N: LogicNetwork>(&self, source: &str) -> ParseResult<ParsedFunction<N>> {
        let module = parse_module(source)?;
        let [Statement::FunctionDef(def)] = module.body.as_slice() else {
            return Err(ParseError::NotAFunction);
        };
        let parsed = lower_function::<N>(def)?;
        info!(
            "Parsed function '{}' with {} inputs and {} outputs",
            parsed.name,
            parsed.network.num_pis(),
            parsed.network.num_pos()
        );
        Ok(parsed)
    }
}

fn lower_function<N: LogicNetwork>(def: &FunctionDef) -> ParseResult<ParsedFunction<N>> {
    let returns = return_signature(def.returns.as_ref())?;
    let tuple_return = matches!(def.returns, Some(Expression::Tuple(_)));

    let mut ctx = Context::<N>::new(FreeVariables::Reject);
    for (name, ty) in parameter_types(def)? {
        ctx.declare_input(&name, ty);
    }

    let mut returned = false;
    for stmt in &def.body {
        match stmt {
            Statement::Return(value) => {
                if returned {
                    return Err(ParseError::MultipleReturns(def.name.clone()));
                }
                lower_return(&mut ctx, value.as_ref(), &returns, tuple_return)?;
                returned = true;
            }
            other => lower_statement(&mut ctx, other)?,
        }
    }
    if !returned {
        return Err(ParseError::MissingReturn(def.name.clone()));
    }

    Ok(ctx.finish(def.name.clone(), returns))
}

/// Read the return annotation: a single type or a tuple of types.
fn return_signature(annotation: Option<&Expression>) -> ParseResult<Signature> {
    match annotation {
        None => Err(ParseError::MissingReturnType),
        Some(Expression::Tuple(elements)) if elements.is_empty() => Err(
            ParseError::InvalidAnnotation("return tuple must not be empty".into()),
        ),
        Some(Expression::Tuple(elements)) => elements.iter().map(annotation_type).collect(),
        Some(single) => Ok(vec![annotation_type(single)?]),
    }
}

/// Resolve parameter types. An unannotated parameter takes the type of the
/// next annotated one, so `def f(a, b: BitVec(2))` declares two 2-bit inputs.
fn parameter_types(def: &FunctionDef) -> ParseResult<Vec<(String, ValueType)>> {
    let mut resolved = Vec::with_capacity(def.params.len());
    let mut pending: Option<ValueType> = None;
    for param in def.params.iter().rev() {
        if let Some(annotation) = &param.annotation {
            pending = Some(annotation_type(annotation)?);
        }
        resolved.push((param.name.clone(), pending));
    }
    resolved.reverse();

    let untyped: Vec<String> = resolved
        .iter()
        .filter(|(_, ty)| ty.is_none())
        .map(|(name, _)| name.clone())
        .collect();
    if !untyped.is_empty() {
        return Err(ParseError::MissingArgumentType { names: untyped });
    }
    Ok(resolved
        .into_iter()
        .filter_map(|(name, ty)| ty.map(|ty| (name, ty)))
        .collect())
}

fn lower_statement<N: LogicNetwork>(ctx: &mut Context<N>, stmt: &Statement) -> ParseResult<()> {
    match stmt {
        Statement::Assign { targets, value } => {
            let value = ctx.lower_expr(value)?;
            for target in targets {
                let Expression::Name(name) = target else {
                    return Err(ParseError::UnsupportedConstruct(format!(
                        "assignment to {}",
                        target.kind()
                    )));
                };
                debug!("Binding {}: {}", name, value.ty);
                ctx.bind(name, value.clone());
            }
            Ok(())
        }
        Statement::AugAssign { target, op, value } => {
            let Expression::Name(name) = target else {
                return Err(ParseError::UnsupportedConstruct(format!(
                    "assignment to {}",
                    target.kind()
                )));
            };
            if !matches!(op, BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor) {
                return Err(ParseError::UnsupportedOperator(format!("{}=", op.symbol())));
            }
            let current = ctx.lookup(name)?;
            let value = ctx.lower_expr(value)?;
            let updated = ctx.bitwise(*op, &current, &value)?;
            ctx.bind(name, updated);
            Ok(())
        }
        // Docstrings.
        Statement::Expr(Expression::Str(_)) | Statement::Pass => Ok(()),
        Statement::Expr(expr) => ctx.lower_expr(expr).map(|_| ()),
        other => Err(ParseError::UnsupportedConstruct(other.kind().to_string())),
    }
}

/// Check the returned value(s) against the annotation and emit the outputs.
fn lower_return<N: LogicNetwork>(
    ctx: &mut Context<N>,
    value: Option<&Expression>,
    returns: &[ValueType],
    tuple_return: bool,
) -> ParseResult<()> {
    let values: Vec<&Expression> = match value {
        None => Vec::new(),
        Some(Expression::Tuple(elements)) => elements.iter().collect(),
        Some(single) => vec![single],
    };
    let returns_tuple = matches!(value, Some(Expression::Tuple(_)));
    // A bare value may satisfy a one-slot tuple annotation; a tuple never
    // satisfies a single annotation.
    if values.len() != returns.len() || (returns_tuple && !tuple_return) {
        return Err(ParseError::ReturnArity {
            expected: returns.len(),
            got: values.len(),
        });
    }

    let mut bindings: Vec<Binding<N::Signal>> = Vec::with_capacity(values.len());
    for (slot, (expr, expected)) in values.iter().zip(returns).enumerate() {
        let binding = ctx.lower_expr(expr)?;
        if binding.ty != *expected {
            return Err(ParseError::ReturnTypeMismatch {
                slot,
                expected: *expected,
                actual: binding.ty,
            });
        }
        bindings.push(binding);
    }
    for binding in &bindings {
        ctx.emit_outputs(binding);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use boolfn_xag::Simulate;

    use super::*;

    fn parse(source: &str) -> ParseResult<ParsedFunction<Xag>> {
        FunctionParser::new().parse(source)
    }

    #[test]
    fn test_parameter_type_borrowing() {
        let parsed = parse("def f(a, b: BitVec(2), c: BitVec(1)) -> BitVec(1):\n    return c\n").unwrap();
        assert_eq!(
            parsed.parameters,
            vec![ValueType::bitvec(2), ValueType::bitvec(2), ValueType::BIT]
        );
        assert_eq!(parsed.network.num_pis(), 5);
        assert_eq!(parsed.network.pi_name(0), Some("a_0"));
        assert_eq!(parsed.network.pi_name(3), Some("b_1"));
        assert_eq!(parsed.network.pi_name(4), Some("c_0"));
    }

    #[test]
    fn test_trailing_untyped_parameters() {
        let err = parse("def f(a: BitVec(1), b, c) -> BitVec(1):\n    return a\n").unwrap_err();
        assert!(err.to_string().contains("Argument type is needed"));
        assert!(matches!(
            err,
            ParseError::MissingArgumentType { ref names } if names == &["b", "c"]
        ));
    }

    #[test]
    fn test_return_annotation_checked_first() {
        let err = parse("def f(a, b):\n    return a\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingReturnType));
        assert_eq!(err.to_string(), "Return type is needed");
    }

    #[test]
    fn test_assignments_and_docstring() {
        let source = r#"
def f(a, b: BitVec(2)) -> BitVec(2):
    """Masked xor."""
    c = d = a ^ b
    c &= d
    pass
    return c
"#;
        let parsed = parse(source).unwrap();
        let xag = &parsed.network;
        // a = 01, b = 11 gives 10
        assert_eq!(
            xag.simulate_pattern(&[true, false, true, true]).unwrap(),
            vec![false, true]
        );
    }

    #[test]
    fn test_tuple_return() {
        let source = "def f(a: BitVec(2)) -> (BitVec(2), BitVec(2)):\n    return a, ~a\n";
        let parsed = parse(source).unwrap();
        assert_eq!(parsed.returns.len(), 2);
        assert_eq!(parsed.network.num_pos(), 4);
        assert_eq!(
            parsed.network.simulate_pattern(&[true, false]).unwrap(),
            vec![true, false, false, true]
        );
    }

    #[test]
    fn test_return_errors() {
        assert!(matches!(
            parse("def f(a: BitVec(1)) -> BitVec(1):\n    return a, a\n"),
            Err(ParseError::ReturnArity { expected: 1, got: 2 })
        ));
        assert!(matches!(
            parse("def f(a: BitVec(1)) -> (BitVec(1), BitVec(1)):\n    return a\n"),
            Err(ParseError::ReturnArity { expected: 2, got: 1 })
        ));
        assert!(matches!(
            parse("def f(a: BitVec(2)) -> BitVec(1):\n    return a\n"),
            Err(ParseError::ReturnTypeMismatch { slot: 0, .. })
        ));
        assert!(matches!(
            parse("def f(a: BitVec(1)) -> BitVec(1):\n    b = a\n"),
            Err(ParseError::MissingReturn(name)) if name == "f"
        ));
        assert!(matches!(
            parse("def f(a: BitVec(1)) -> BitVec(1):\n    return a\n    return a\n"),
            Err(ParseError::MultipleReturns(_))
        ));
        assert!(matches!(
            parse("def f(a: BitVec(1)) -> BitVec(1):\n    return\n"),
            Err(ParseError::ReturnArity { expected: 1, got: 0 })
        ));
        assert!(matches!(
            parse("def f(a: BitVec(1)) -> ():\n    return a\n"),
            Err(ParseError::InvalidAnnotation(_))
        ));
    }

    #[test]
    fn test_rejects_other_sources() {
        assert!(matches!(parse("a & b\n"), Err(ParseError::NotAFunction)));
        let two = "def f(a: BitVec(1)) -> BitVec(1):\n    return a\ndef g(a: BitVec(1)) -> BitVec(1):\n    return a\n";
        assert!(matches!(parse(two), Err(ParseError::NotAFunction)));
        let branch = "def f(a: BitVec(1)) -> BitVec(1):\n    if a:\n        pass\n    return a\n";
        assert!(matches!(
            parse(branch),
            Err(ParseError::UnsupportedConstruct(kind)) if kind == "If"
        ));
        let shift = "def f(a: BitVec(1)) -> BitVec(1):\n    a += a\n    return a\n";
        assert!(matches!(parse(shift), Err(ParseError::UnsupportedOperator(op)) if op == "+="));
    }

    #[test]
    fn test_out_of_scope() {
        let err = parse("def f(a, b: BitVec(1)) -> BitVec(1):\n    return a & c\n").unwrap_err();
        assert!(err.to_string().contains("out of scope: c"));
    }
}
