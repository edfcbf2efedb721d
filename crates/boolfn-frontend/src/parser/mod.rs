//! Recursive-descent parser producing the [`ast`](crate::ast).

mod expression;
mod statement;

use crate::ast::Module;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a source string into an AST module.
pub fn parse_module(source: &str) -> ParseResult<Module> {
    let mut parser = Parser::new(source)?;
    parser.parse_module()
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> ParseResult<Self> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek `n` tokens ahead.
    pub(super) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Line of the current token, or of the last token at the end.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.pos].token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Build an `UnexpectedToken` error for the current token.
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedToken {
                line: self.line(),
                expected: expected.to_string(),
                found: found.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        if self.check(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Token::Identifier(s)) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Parse the entire source unit.
    fn parse_module(&mut self) -> ParseResult<Module> {
        let mut body = Vec::new();
        while !self.is_eof() {
            body.push(self.parse_statement()?);
        }
        Ok(Module { body })
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::ast::{BinOp, BoolOp, CmpOp, Expression, Index, Statement, UnaryOp};

    fn expr(source: &str) -> Expression {
        let module = parse_module(source).unwrap();
        match module.body.as_slice() {
            [Statement::Expr(e)] => e.clone(),
            other => panic!("expected one expression, got {other:?}"),
        }
    }

    fn name(s: &str) -> Expression {
        Expression::Name(s.into())
    }

    #[test]
    fn test_parse_function() {
        let source = r"
            @decorator
            def f(a, b: BitVec(2)) -> BitVec(2):
                c = a & b
                return c
        ";
        let module = parse_module(source).unwrap();
        let [Statement::FunctionDef(def)] = module.body.as_slice() else {
            panic!("expected a function definition");
        };
        assert_eq!(def.name, "f");
        assert_eq!(def.decorators, vec![name("decorator")]);
        assert_eq!(def.params.len(), 2);
        assert!(def.params[0].annotation.is_none());
        assert!(matches!(def.params[1].annotation, Some(Expression::Call { .. })));
        assert!(def.returns.is_some());
        assert_eq!(def.body.len(), 2);
        assert_eq!(def.line, 3);
    }

    #[test]
    fn test_single_line_body() {
        let module = parse_module("def f(a: BitVec(1)) -> BitVec(1): return a\n").unwrap();
        let [Statement::FunctionDef(def)] = module.body.as_slice() else {
            panic!("expected a function definition");
        };
        assert_eq!(def.body, vec![Statement::Return(Some(name("a")))]);
    }

    #[test]
    fn test_precedence() {
        // `|` binds looser than `^`, which binds looser than `&`.
        let e = expr("a | b ^ c & d");
        let Expression::BinOp { op: BinOp::BitOr, right, .. } = e else {
            panic!("expected |");
        };
        let Expression::BinOp { op: BinOp::BitXor, right, .. } = *right else {
            panic!("expected ^");
        };
        assert!(matches!(*right, Expression::BinOp { op: BinOp::BitAnd, .. }));
    }

    #[test]
    fn test_boolean_operators() {
        let e = expr("not a and b or c");
        let Expression::BoolOp { op: BoolOp::Or, values } = e else {
            panic!("expected or");
        };
        let Expression::BoolOp { op: BoolOp::And, values: inner } = &values[0] else {
            panic!("expected and");
        };
        assert!(matches!(inner[0], Expression::UnaryOp { op: UnaryOp::Not, .. }));
    }

    #[test]
    fn test_comparison_chain() {
        let e = expr("a == b != c");
        let Expression::Compare { ops, comparators, .. } = e else {
            panic!("expected comparison");
        };
        assert_eq!(ops, vec![CmpOp::Eq, CmpOp::NotEq]);
        assert_eq!(comparators.len(), 2);
        assert!(matches!(expr("a is not b"), Expression::Compare { ref ops, .. } if ops == &[CmpOp::IsNot]));
        assert!(matches!(expr("a not in b"), Expression::Compare { ref ops, .. } if ops == &[CmpOp::NotIn]));
    }

    #[test]
    fn test_subscripts() {
        let e = expr("a[3:1]");
        let Expression::Subscript { index, .. } = e else {
            panic!("expected subscript");
        };
        assert_eq!(
            *index,
            Index::Slice {
                upper: Some(Expression::Int(BigUint::from(3u32))),
                lower: Some(Expression::Int(BigUint::from(1u32))),
                step: None,
            }
        );
        assert!(matches!(
            expr("a[:2]"),
            Expression::Subscript { index, .. } if matches!(*index, Index::Slice { upper: None, .. })
        ));
        assert!(matches!(
            expr("a[0]"),
            Expression::Subscript { index, .. } if matches!(*index, Index::Single(_))
        ));
    }

    #[test]
    fn test_unary_and_power() {
        let e = expr("~-a ** 2");
        let Expression::UnaryOp { op: UnaryOp::Invert, operand } = e else {
            panic!("expected ~");
        };
        let Expression::UnaryOp { op: UnaryOp::Neg, operand } = *operand else {
            panic!("expected -");
        };
        assert!(matches!(*operand, Expression::BinOp { op: BinOp::Pow, .. }));
    }

    #[test]
    fn test_tuples() {
        assert!(matches!(expr("(a, b)"), Expression::Tuple(ref v) if v.len() == 2));
        assert!(matches!(expr("a, ~a"), Expression::Tuple(ref v) if v.len() == 2));
        assert!(matches!(expr("(a,)"), Expression::Tuple(ref v) if v.len() == 1));
        assert_eq!(expr("(a)"), name("a"));
        assert!(matches!(expr("()"), Expression::Tuple(ref v) if v.is_empty()));
    }

    #[test]
    fn test_assignments() {
        let module = parse_module("a = b = c\nx &= y\n").unwrap();
        assert!(matches!(&module.body[0], Statement::Assign { targets, .. } if targets.len() == 2));
        assert!(matches!(
            &module.body[1],
            Statement::AugAssign { op: BinOp::BitAnd, .. }
        ));
    }

    #[test]
    fn test_compound_statements() {
        let source = "if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\nfor i in x:\n    pass\nwhile a:\n    pass\n";
        let module = parse_module(source).unwrap();
        let kinds: Vec<_> = module.body.iter().map(Statement::kind).collect();
        assert_eq!(kinds, vec!["If", "For", "While"]);
        let Statement::If { orelse, .. } = &module.body[0] else {
            panic!("expected if");
        };
        assert!(matches!(orelse.as_slice(), [Statement::If { .. }]));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_module("def f(a:\n"),
            Err(ParseError::UnexpectedToken { .. } | ParseError::UnexpectedEof(_))
        ));
        assert!(matches!(
            parse_module("a &"),
            Err(ParseError::UnexpectedToken { line: 1, .. })
        ));
        assert!(parse_module("a = \n").is_err());
        assert!(parse_module("lambda x: x\n").is_err());
    }
}
