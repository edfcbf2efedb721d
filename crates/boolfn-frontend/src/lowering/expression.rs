//! Lowering of a bare single-output Boolean expression.

use std::collections::BTreeSet;

use boolfn_xag::{LogicNetwork, Xag};
use tracing::{debug, info, instrument};

use super::{Context, FreeVariables, ParsedFunction};
use crate::ast::{Expression, Statement};
use crate::error::{ParseError, ParseResult};
use crate::parser::parse_module;
use crate::types::ValueType;

/// Parser for expressions such as `(A & B) | ~C`.
///
/// Every free identifier becomes a single-bit primary input. Without an
/// explicit order, inputs are created in order of first occurrence; with one,
/// they are created in the given order and every identifier used must be
/// listed.
#[derive(Debug, Default, Clone)]
pub struct ExpressionParser {
    order: Option<Vec<String>>,
}

impl ExpressionParser {
    /// Create a parser that orders inputs by first occurrence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit input order.
    ///
    /// Names in `order` that the expression never uses still become inputs,
    /// so `a & b` with order `["a", "b", "z"]` has three inputs. The order
    /// only has to cover the referenced names, not match them exactly.
    pub fn with_order<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: Some(order.into_iter().map(Into::into).collect()),
        }
    }

    /// Get the explicit input order, if any.
    pub fn order(&self) -> Option<&[String]> {
        self.order.as_deref()
    }

    /// Parse `source` into an XAG.
    pub fn parse(&self, source: &str) -> ParseResult<ParsedFunction<Xag>> {
        self.parse_into(source)
    }

    /// Parse `source` into any network type.
    #[instrument(skip(self, source))]
    pub fn parse_into<N: LogicNetwork>(&self, source: &str) -> ParseResult<ParsedFunction<N>> {
        let module = parse_module(source)?;
        let [Statement::Expr(expr)] = module.body.as_slice() else {
            return Err(ParseError::NotAnExpression);
        };

        let mut ctx = Context::<N>::new(FreeVariables::DeclareAsInput);
        if let Some(order) = &self.order {
            let missing: Vec<String> = referenced_names(expr)
                .into_iter()
                .filter(|name| !order.iter().any(|o| o == name))
                .map(str::to_string)
                .collect();
            if !missing.is_empty() {
                return Err(ParseError::MissingVariables { missing });
            }
            for name in order {
                if !ctx.is_bound(name) {
                    ctx.declare_input(name, ValueType::BIT);
                }
            }
        }

        let value = ctx.lower_expr(expr)?;
        if value.ty != ValueType::BIT {
            return Err(ParseError::InvalidExpressionReturn(value.ty));
        }
        ctx.emit_outputs(&value);

        let parsed = ctx.finish("<expression>".to_string(), vec![ValueType::BIT]);
        debug!("Expression order: {:?}", self.order);
        info!(
            "Parsed expression with {} inputs and {} outputs",
            parsed.network.num_pis(),
            parsed.network.num_pos()
        );
        Ok(parsed)
    }
}

/// Collect identifiers used as values, sorted. Names in call position are
/// type constructors and do not count.
fn referenced_names(expr: &Expression) -> BTreeSet<&str> {
    // `walk` visits parents first, so a callee is known before it is reached.
    let mut callees: Vec<&Expression> = Vec::new();
    let mut names = BTreeSet::new();
    expr.walk(&mut |e| match e {
        Expression::Call { func, .. } => callees.push(func.as_ref()),
        Expression::Name(name) if !callees.iter().any(|c| std::ptr::eq(*c, e)) => {
            names.insert(name.as_str());
        }
        _ => {}
    });
    names
}
