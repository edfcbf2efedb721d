//! Expression parsing.

use super::Parser;
use crate::ast::{BinOp, BoolOp, CmpOp, Expression, Index, UnaryOp};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a comma-separated expression list; more than one element, or a
    /// trailing comma, makes a tuple.
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Expression> {
        let first = self.parse_expression()?;
        if !self.check(&Token::Comma) {
            return Ok(first);
        }
        let mut elements = vec![first];
        while self.consume(&Token::Comma) {
            if !self.peek().is_some_and(starts_expression) {
                break;
            }
            elements.push(self.parse_expression()?);
        }
        Ok(Expression::Tuple(elements))
    }

    /// Parse an expression, including the conditional form.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        let body = self.parse_or()?;
        if !self.consume(&Token::If) {
            return Ok(body);
        }
        let test = self.parse_or()?;
        self.expect(Token::Else)?;
        let orelse = self.parse_expression()?;
        Ok(Expression::IfExp {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        })
    }

    fn parse_or(&mut self) -> ParseResult<Expression> {
        self.parse_bool_chain(BoolOp::Or)
    }

    fn parse_bool_chain(&mut self, op: BoolOp) -> ParseResult<Expression> {
        let (token, next) = match op {
            BoolOp::Or => (Token::Or, Some(BoolOp::And)),
            BoolOp::And => (Token::And, None),
        };
        let parse_operand = |parser: &mut Self| match next {
            Some(inner) => parser.parse_bool_chain(inner),
            None => parser.parse_not(),
        };
        let first = parse_operand(self)?;
        if !self.check(&token) {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.consume(&token) {
            values.push(parse_operand(self)?);
        }
        Ok(Expression::BoolOp { op, values })
    }

    fn parse_not(&mut self) -> ParseResult<Expression> {
        if self.consume(&Token::Not) {
            let operand = self.parse_not()?;
            return Ok(Expression::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let left = self.parse_binary_expr(0)?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.take_comparison_op() {
            ops.push(op);
            comparators.push(self.parse_binary_expr(0)?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(Expression::Compare {
            left: Box::new(left),
            ops,
            comparators,
        })
    }

    /// Consume a comparison operator, including `is not` and `not in`.
    fn take_comparison_op(&mut self) -> Option<CmpOp> {
        let next_is = |parser: &Self, token: &Token| parser.peek_nth(1) == Some(token);
        let (op, width) = match self.peek()? {
            Token::EqEq => (CmpOp::Eq, 1),
            Token::NotEq => (CmpOp::NotEq, 1),
            Token::Lt => (CmpOp::Lt, 1),
            Token::LtEq => (CmpOp::LtEq, 1),
            Token::Gt => (CmpOp::Gt, 1),
            Token::GtEq => (CmpOp::GtEq, 1),
            Token::In => (CmpOp::In, 1),
            Token::Is if next_is(self, &Token::Not) => (CmpOp::IsNot, 2),
            Token::Is => (CmpOp::Is, 1),
            Token::Not if next_is(self, &Token::In) => (CmpOp::NotIn, 2),
            _ => return None,
        };
        self.pos += width;
        Some(op)
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance(); // consume operator

            let right = self.parse_binary_expr(prec + 1)?;
            left = Expression::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse unary expression.
    fn parse_unary_expr(&mut self) -> ParseResult<Expression> {
        let op = match self.peek() {
            Some(Token::Tilde) => UnaryOp::Invert,
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Pos,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_unary_expr()?;
        Ok(Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    /// `**` binds tighter than a unary operator on its left and is right
    /// associative.
    fn parse_power(&mut self) -> ParseResult<Expression> {
        let base = self.parse_postfix()?;
        if !self.consume(&Token::Power) {
            return Ok(base);
        }
        let exponent = self.parse_unary_expr()?;
        Ok(Expression::BinOp {
            left: Box::new(base),
            op: BinOp::Pow,
            right: Box::new(exponent),
        })
    }

    /// Parse calls, subscripts and attribute accesses on an atom.
    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            if self.consume(&Token::LParen) {
                let args = self.parse_call_arguments()?;
                expr = Expression::Call {
                    func: Box::new(expr),
                    args,
                };
            } else if self.consume(&Token::LBracket) {
                let index = self.parse_index()?;
                self.expect(Token::RBracket)?;
                expr = Expression::Subscript {
                    value: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.consume(&Token::Dot) {
                let attr = self.parse_identifier()?;
                expr = Expression::Attribute {
                    value: Box::new(expr),
                    attr,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_call_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut args = Vec::new();
        while !self.check(&Token::RParen) {
            args.push(self.parse_expression()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(args)
    }

    /// Parse the inside of `[...]`.
    fn parse_index(&mut self) -> ParseResult<Index> {
        let upper = if self.check(&Token::Colon) {
            None
        } else {
            let first = self.parse_expression()?;
            if !self.check(&Token::Colon) {
                return Ok(Index::Single(first));
            }
            Some(first)
        };
        self.expect(Token::Colon)?;
        let lower = self.parse_optional_bound()?;
        let step = if self.consume(&Token::Colon) {
            self.parse_optional_bound()?
        } else {
            None
        };
        Ok(Index::Slice { upper, lower, step })
    }

    fn parse_optional_bound(&mut self) -> ParseResult<Option<Expression>> {
        if self.check(&Token::Colon) || self.check(&Token::RBracket) {
            Ok(None)
        } else {
            self.parse_expression().map(Some)
        }
    }

    /// Parse primary expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        let expr = match token {
            Token::Identifier(name) => Expression::Name(name),
            Token::IntLiteral(v) => Expression::Int(v),
            Token::FloatLiteral(v) => Expression::Float(v),
            Token::StringLiteral(s) => Expression::Str(s),
            Token::True => Expression::Bool(true),
            Token::False => Expression::Bool(false),
            Token::None => Expression::None,
            Token::LParen => {
                self.advance();
                return self.parse_parenthesized();
            }
            Token::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(&Token::RBracket) {
                    elements.push(self.parse_expression()?);
                    if !self.consume(&Token::Comma) {
                        break;
                    }
                }
                self.expect(Token::RBracket)?;
                return Ok(Expression::List(elements));
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance();
        Ok(expr)
    }

    /// Parse after `(`: a parenthesised expression or a tuple.
    fn parse_parenthesized(&mut self) -> ParseResult<Expression> {
        if self.consume(&Token::RParen) {
            return Ok(Expression::Tuple(Vec::new()));
        }
        let expr = self.parse_expression_list()?;
        self.expect(Token::RParen)?;
        Ok(expr)
    }

    /// Peek at binary operator.
    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::DoubleSlash => Some(BinOp::FloorDiv),
            Token::Percent => Some(BinOp::Mod),
            Token::At => Some(BinOp::MatMul),
            Token::LShift => Some(BinOp::LShift),
            Token::RShift => Some(BinOp::RShift),
            Token::Ampersand => Some(BinOp::BitAnd),
            Token::Pipe => Some(BinOp::BitOr),
            Token::Caret => Some(BinOp::BitXor),
            _ => None,
        }
    }
}

/// Get operator precedence.
fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::BitOr => 1,
        BinOp::BitXor => 2,
        BinOp::BitAnd => 3,
        BinOp::LShift | BinOp::RShift => 4,
        BinOp::Add | BinOp::Sub => 5,
        BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod | BinOp::MatMul => 6,
        BinOp::Pow => 7,
    }
}

/// Check if a token can start an expression.
fn starts_expression(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(_)
            | Token::IntLiteral(_)
            | Token::FloatLiteral(_)
            | Token::StringLiteral(_)
            | Token::True
            | Token::False
            | Token::None
            | Token::LParen
            | Token::LBracket
            | Token::Tilde
            | Token::Minus
            | Token::Plus
            | Token::Not
    )
}
