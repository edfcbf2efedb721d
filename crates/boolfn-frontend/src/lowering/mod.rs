//! Lowering of parsed sources to logic networks.
//!
//! [`FunctionParser`] and [`ExpressionParser`] share one [`Context`] that owns
//! the symbol table and the network under construction. They differ only in
//! how the top-level unit is read and in how unbound names are treated.

mod expression;
mod function;

pub use expression::ExpressionParser;
pub use function::FunctionParser;

use boolfn_bitvec::BitVector;
use boolfn_xag::LogicNetwork;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ast::{BinOp, BoolOp, CmpOp, Expression, Index, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::types::{Signature, ValueKind, ValueType};

/// The result of parsing one function or expression.
#[derive(Debug, Clone)]
pub struct ParsedFunction<N> {
    /// Function name; `<expression>` for expressions.
    pub name: String,
    /// Parameter types in declaration order.
    pub parameters: Signature,
    /// Return types; a single entry unless the function returns a tuple.
    pub returns: Signature,
    /// The logic network. Its primary inputs are the parameter bits in
    /// order, least significant bit first; its primary outputs are the return
    /// bits in the same layout.
    pub network: N,
}

/// A value in the symbol table: its type and one signal per bit, least
/// significant first.
#[derive(Debug, Clone)]
pub(crate) struct Binding<S> {
    pub ty: ValueType,
    pub signals: Vec<S>,
}

/// What to do with a name that is not in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FreeVariables {
    /// Report [`ParseError::OutOfScope`].
    Reject,
    /// Declare a new single-bit primary input named after the variable.
    DeclareAsInput,
}

/// Mutable state of one parse.
pub(crate) struct Context<N: LogicNetwork> {
    symbols: FxHashMap<String, Binding<N::Signal>>,
    network: N,
    parameters: Signature,
    free_variables: FreeVariables,
}

impl<N: LogicNetwork> Context<N> {
    pub(crate) fn new(free_variables: FreeVariables) -> Self {
        Self {
            symbols: FxHashMap::default(),
            network: N::default(),
            parameters: Signature::new(),
            free_variables,
        }
    }

    /// Declare a parameter: allocate one primary input per bit, bind `name`
    /// and append its type to the parameter signature.
    ///
    /// Single-bit inputs of expressions are named after the variable, all
    /// other inputs `<name>_<bit>`.
    pub(crate) fn declare_input(&mut self, name: &str, ty: ValueType) {
        let signals = if self.free_variables == FreeVariables::DeclareAsInput {
            vec![self.network.create_pi(Some(name))]
        } else {
            (0..ty.width)
                .map(|i| self.network.create_pi(Some(&format!("{name}_{i}"))))
                .collect()
        };
        debug!("Declared input {}: {}", name, ty);
        self.parameters.push(ty);
        self.symbols.insert(name.to_string(), Binding { ty, signals });
    }

    /// Check whether `name` is bound.
    pub(crate) fn is_bound(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Bind or rebind `name`.
    pub(crate) fn bind(&mut self, name: &str, binding: Binding<N::Signal>) {
        self.symbols.insert(name.to_string(), binding);
    }

    /// Resolve a name, declaring it as an input if the policy allows.
    pub(crate) fn lookup(&mut self, name: &str) -> ParseResult<Binding<N::Signal>> {
        if let Some(binding) = self.symbols.get(name) {
            return Ok(binding.clone());
        }
        match self.free_variables {
            FreeVariables::Reject => Err(ParseError::OutOfScope(name.to_string())),
            FreeVariables::DeclareAsInput => {
                self.declare_input(name, ValueType::BIT);
                self.lookup(name)
            }
        }
    }

    /// Mark every bit of `binding` as a primary output.
    pub(crate) fn emit_outputs(&mut self, binding: &Binding<N::Signal>) {
        debug!("Emitting {} output bits of type {}", binding.signals.len(), binding.ty);
        for signal in &binding.signals {
            self.network.create_po(*signal);
        }
    }

    /// Finish the parse.
    pub(crate) fn finish(self, name: String, returns: Signature) -> ParsedFunction<N> {
        ParsedFunction {
            name,
            parameters: self.parameters,
            returns,
            network: self.network,
        }
    }

    /// Lower an expression to a value.
    pub(crate) fn lower_expr(&mut self, expr: &Expression) -> ParseResult<Binding<N::Signal>> {
        match expr {
            Expression::Name(name) => self.lookup(name),
            Expression::BinOp { left, op, right } => {
                let left = self.lower_expr(left)?;
                let right = self.lower_expr(right)?;
                self.bitwise(*op, &left, &right)
            }
            Expression::BoolOp { op, values } => self.lower_bool_op(*op, values),
            Expression::Compare {
                left,
                ops,
                comparators,
            } => self.lower_compare(left, ops, comparators),
            Expression::UnaryOp { op, operand } => {
                let operand = self.lower_expr(operand)?;
                self.lower_unary(*op, operand)
            }
            Expression::Call { func, args } => self.lower_call(func, args),
            Expression::Subscript { value, index } => {
                let value = self.lower_expr(value)?;
                subscript(value, index)
            }
            other => Err(ParseError::UnsupportedConstruct(other.kind().to_string())),
        }
    }

    /// Apply `&`, `|` or `^` bit by bit.
    pub(crate) fn bitwise(
        &mut self,
        op: BinOp,
        left: &Binding<N::Signal>,
        right: &Binding<N::Signal>,
    ) -> ParseResult<Binding<N::Signal>> {
        let gate: fn(&mut N, N::Signal, N::Signal) -> N::Signal = match op {
            BinOp::BitAnd => N::create_and,
            BinOp::BitOr => N::create_or,
            BinOp::BitXor => N::create_xor,
            other => return Err(ParseError::UnsupportedOperator(other.symbol().to_string())),
        };
        if left.signals.len() != right.signals.len() {
            return Err(ParseError::BinOpWidthMismatch {
                op: op.symbol().to_string(),
                left: left.ty,
                right: right.ty,
            });
        }
        let signals = left
            .signals
            .iter()
            .zip(&right.signals)
            .map(|(l, r)| gate(&mut self.network, *l, *r))
            .collect();
        Ok(Binding {
            ty: left.ty,
            signals,
        })
    }

    /// Fold bit 0 of every operand of an `and`/`or` chain.
    fn lower_bool_op(
        &mut self,
        op: BoolOp,
        values: &[Expression],
    ) -> ParseResult<Binding<N::Signal>> {
        let mut result: Option<N::Signal> = None;
        for value in values {
            let bit = self.lower_expr(value)?.signals[0];
            result = Some(match (result, op) {
                (None, _) => bit,
                (Some(acc), BoolOp::And) => self.network.create_and(acc, bit),
                (Some(acc), BoolOp::Or) => self.network.create_or(acc, bit),
            });
        }
        let signal = result.ok_or_else(|| ParseError::UnsupportedConstruct("empty BoolOp".into()))?;
        Ok(Binding {
            ty: ValueType::BIT,
            signals: vec![signal],
        })
    }

    /// Lower a comparison chain; `a == b != c` means `a == b and b != c`.
    ///
    /// Each comparator is compared with its left neighbour, not with the first
    /// operand, so `a != b != c` at `(0, 1, 0)` is `1`.
    fn lower_compare(
        &mut self,
        left: &Expression,
        ops: &[CmpOp],
        comparators: &[Expression],
    ) -> ParseResult<Binding<N::Signal>> {
        let mut lhs = self.lower_expr(left)?;
        let mut partial = Vec::with_capacity(ops.len());
        for (op, right) in ops.iter().zip(comparators) {
            let rhs = self.lower_expr(right)?;
            if !matches!(op, CmpOp::Eq | CmpOp::NotEq) {
                return Err(ParseError::UnsupportedOperator(op.symbol().to_string()));
            }
            if lhs.signals.len() != rhs.signals.len() {
                return Err(ParseError::CompareWidthMismatch {
                    op: op.symbol().to_string(),
                    left: lhs.ty,
                    right: rhs.ty,
                });
            }
            let pairs = lhs.signals.iter().zip(&rhs.signals);
            let result = if *op == CmpOp::Eq {
                let equal: Vec<_> = pairs
                    .map(|(l, r)| self.network.create_xnor(*l, *r))
                    .collect();
                self.network.create_nary_and(&equal)
            } else {
                let differ: Vec<_> = pairs
                    .map(|(l, r)| self.network.create_xor(*l, *r))
                    .collect();
                self.network.create_nary_or(&differ)
            };
            partial.push(result);
            lhs = rhs;
        }
        let signal = self.network.create_nary_and(&partial);
        Ok(Binding {
            ty: ValueType::BIT,
            signals: vec![signal],
        })
    }

    fn lower_unary(
        &mut self,
        op: UnaryOp,
        operand: Binding<N::Signal>,
    ) -> ParseResult<Binding<N::Signal>> {
        match op {
            UnaryOp::Not => {
                let [bit] = operand.signals[..] else {
                    return Err(ParseError::MultiBitNot(operand.ty));
                };
                Ok(Binding {
                    ty: operand.ty,
                    signals: vec![self.network.create_not(bit)],
                })
            }
            UnaryOp::Invert => {
                let signals = operand
                    .signals
                    .iter()
                    .map(|s| self.network.create_not(*s))
                    .collect();
                Ok(Binding {
                    ty: operand.ty,
                    signals,
                })
            }
            UnaryOp::Neg | UnaryOp::Pos => {
                Err(ParseError::UnsupportedOperator(op.symbol().to_string()))
            }
        }
    }

    /// Lower a `BitVec(...)` literal to constant signals.
    fn lower_call(
        &mut self,
        func: &Expression,
        args: &[Expression],
    ) -> ParseResult<Binding<N::Signal>> {
        let Expression::Name(ctor) = func else {
            return Err(ParseError::UnsupportedConstruct(format!(
                "call of {}",
                func.kind()
            )));
        };
        let kind = ValueKind::from_name(ctor).ok_or_else(|| ParseError::UnknownType(ctor.clone()))?;
        let value = literal(args)?;
        let signals = value
            .to_bits_lsb_first()
            .into_iter()
            .map(|bit| self.network.get_constant(bit))
            .collect();
        Ok(Binding {
            ty: ValueType {
                kind,
                width: value.len(),
            },
            signals,
        })
    }
}

/// Convert a width literal to `usize`.
fn width_of(value: &BigUint) -> ParseResult<usize> {
    value
        .to_usize()
        .ok_or_else(|| ParseError::InvalidLiteral(format!("width {value} is too large")))
}

/// Evaluate the arguments of a `BitVec(...)` literal.
///
/// `BitVec('101')` infers the width from the string, `BitVec(4)` is four
/// zero bits, and `BitVec(w, v)` pads an integer or bit string to `w` bits.
fn literal(args: &[Expression]) -> ParseResult<BitVector> {
    let value = match args {
        [Expression::Str(bits)] => bits.parse()?,
        [Expression::Int(width)] => BitVector::zeros(width_of(width)?)?,
        [Expression::Int(width), Expression::Int(value)] => {
            BitVector::new(width_of(width)?, value.clone())?
        }
        [Expression::Int(width), Expression::Str(bits)] => {
            BitVector::from_bits(width_of(width)?, bits)?
        }
        [Expression::Int(_), other] => {
            return Err(ParseError::InvalidLiteral(format!(
                "value must be an integer or a bit string, found {}",
                other.kind()
            )));
        }
        [_, _] => {
            return Err(ParseError::InvalidLiteral(
                "BitVec requires length to be an integer".into(),
            ));
        }
        [other] => {
            return Err(ParseError::InvalidLiteral(format!(
                "argument must be an integer or a bit string, found {}",
                other.kind()
            )));
        }
        _ => {
            return Err(ParseError::InvalidLiteral(format!(
                "BitVec takes one or two arguments, got {}",
                args.len()
            )));
        }
    };
    Ok(value)
}

/// Read a `BitVec(N)` annotation.
pub(crate) fn annotation_type(expr: &Expression) -> ParseResult<ValueType> {
    let Expression::Call { func, args } = expr else {
        return Err(ParseError::InvalidAnnotation(format!(
            "BitVec type with size is needed, found {}",
            expr.kind()
        )));
    };
    let Expression::Name(ctor) = func.as_ref() else {
        return Err(ParseError::InvalidAnnotation(format!(
            "type constructor must be a name, found {}",
            func.kind()
        )));
    };
    let kind = ValueKind::from_name(ctor).ok_or_else(|| ParseError::UnknownType(ctor.clone()))?;
    let [Expression::Int(width)] = args.as_slice() else {
        return Err(ParseError::InvalidAnnotation(format!(
            "{ctor} annotation takes exactly one integer width"
        )));
    };
    let width = width_of(width)?;
    if width == 0 {
        return Err(ParseError::InvalidAnnotation(format!(
            "{ctor} width must be positive"
        )));
    }
    Ok(ValueType { kind, width })
}

/// Select bits of an already lowered value.
///
/// `v[i]` narrows to one bit; `v[i:j]` keeps bits `j..i`, high bound first.
fn subscript<S: Copy>(value: Binding<S>, index: &Index) -> ParseResult<Binding<S>> {
    let width = value.signals.len();
    let literal_bound = |bound: &Option<Expression>| -> ParseResult<Option<usize>> {
        match bound {
            None => Ok(None),
            Some(Expression::Int(v)) => v
                .to_usize()
                .map(Some)
                .ok_or_else(|| ParseError::InvalidSlice(format!("bound {v} is too large"))),
            Some(other) => Err(ParseError::InvalidSlice(format!(
                "bounds must be integer literals, found {}",
                other.kind()
            ))),
        }
    };

    match index {
        Index::Single(Expression::Int(i)) => {
            let i = i.to_usize().filter(|i| *i < width).ok_or_else(|| {
                ParseError::IndexOutOfRange {
                    index: i.to_usize().unwrap_or(usize::MAX),
                    ty: value.ty,
                }
            })?;
            Ok(Binding {
                ty: ValueType {
                    kind: value.ty.kind,
                    width: 1,
                },
                signals: vec![value.signals[i]],
            })
        }
        Index::Single(other) => Err(ParseError::Subscript(other.kind().to_string())),
        Index::Slice { upper, lower, step } => {
            if step.is_some() {
                return Err(ParseError::InvalidSlice("steps are not supported".into()));
            }
            let high = literal_bound(upper)?.unwrap_or(width);
            let low = literal_bound(lower)?.unwrap_or(0);
            if high <= low {
                return Err(ParseError::InvalidSlice(format!(
                    "[{high}:{low}] requires {high} > {low}"
                )));
            }
            if high > width {
                return Err(ParseError::IndexOutOfRange {
                    index: high,
                    ty: value.ty,
                });
            }
            Ok(Binding {
                ty: ValueType {
                    kind: value.ty.kind,
                    width: high - low,
                },
                signals: value.signals[low..high].to_vec(),
            })
        }
    }
}
