//! Statement parsing.

use super::Parser;
use crate::ast::{BinOp, Expression, FunctionDef, Parameter, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::At | Token::Def => self.parse_function_def(),
            Token::If => self.parse_if(),
            Token::For => self.parse_for(),
            Token::While => self.parse_while(),
            _ => {
                let stmt = self.parse_simple_statement()?;
                self.end_of_line()?;
                Ok(stmt)
            }
        }
    }

    /// Parse a statement that fits on one logical line.
    fn parse_simple_statement(&mut self) -> ParseResult<Statement> {
        if self.consume(&Token::Pass) {
            return Ok(Statement::Pass);
        }
        if self.consume(&Token::Return) {
            if self.check(&Token::Newline) || self.is_eof() {
                return Ok(Statement::Return(None));
            }
            return Ok(Statement::Return(Some(self.parse_expression_list()?)));
        }

        let first = self.parse_expression_list()?;

        if let Some(op) = self.peek_augmented_op() {
            self.pos += 1;
            let value = self.parse_expression_list()?;
            return Ok(Statement::AugAssign {
                target: first,
                op,
                value,
            });
        }

        if !self.check(&Token::Eq) {
            return Ok(Statement::Expr(first));
        }

        // `a = b = value`: every expression but the last is a target.
        let mut targets = vec![first];
        while self.consume(&Token::Eq) {
            targets.push(self.parse_expression_list()?);
        }
        let value = targets
            .pop()
            .ok_or_else(|| ParseError::UnexpectedEof("assignment value".into()))?;
        Ok(Statement::Assign { targets, value })
    }

    fn peek_augmented_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::PlusEq => Some(BinOp::Add),
            Token::MinusEq => Some(BinOp::Sub),
            Token::AmpersandEq => Some(BinOp::BitAnd),
            Token::PipeEq => Some(BinOp::BitOr),
            Token::CaretEq => Some(BinOp::BitXor),
            _ => None,
        }
    }

    /// Expect the end of a logical line.
    fn end_of_line(&mut self) -> ParseResult<()> {
        if self.is_eof() || self.consume(&Token::Newline) {
            Ok(())
        } else {
            Err(self.unexpected("end of line"))
        }
    }

    /// Parse `: NEWLINE INDENT stmt+ DEDENT` or `: simple_stmt NEWLINE`.
    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect(Token::Colon)?;
        if !self.consume(&Token::Newline) {
            let stmt = self.parse_simple_statement()?;
            self.end_of_line()?;
            return Ok(vec![stmt]);
        }
        self.expect(Token::Indent)?;
        let mut body = Vec::new();
        while !self.consume(&Token::Dedent) {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEof("end of block".into()));
            }
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    /// Parse decorators and a function definition.
    fn parse_function_def(&mut self) -> ParseResult<Statement> {
        let mut decorators = Vec::new();
        while self.consume(&Token::At) {
            decorators.push(self.parse_expression()?);
            self.expect(Token::Newline)?;
        }

        let line = self.line();
        self.expect(Token::Def)?;
        let name = self.parse_identifier()?;

        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        while !self.check(&Token::RParen) {
            let param_name = self.parse_identifier()?;
            let annotation = if self.consume(&Token::Colon) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            params.push(Parameter {
                name: param_name,
                annotation,
            });
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;

        let returns = if self.consume(&Token::Arrow) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        Ok(Statement::FunctionDef(FunctionDef {
            name,
            params,
            returns,
            body,
            decorators,
            line,
        }))
    }

    /// Parse `if`/`elif`/`else`.
    fn parse_if(&mut self) -> ParseResult<Statement> {
        // Called on either `if` or `elif`.
        self.advance();
        let test = self.parse_expression()?;
        let body = self.parse_block()?;
        let orelse = if self.check(&Token::Elif) {
            vec![self.parse_if()?]
        } else if self.consume(&Token::Else) {
            self.parse_block()?
        } else {
            Vec::new()
        };
        Ok(Statement::If { test, body, orelse })
    }

    /// Parse a `for` loop.
    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect(Token::For)?;
        let target = self.parse_target_list()?;
        self.expect(Token::In)?;
        let iter = self.parse_expression_list()?;
        let body = self.parse_block()?;
        Ok(Statement::For { target, iter, body })
    }

    /// Parse a `while` loop.
    fn parse_while(&mut self) -> ParseResult<Statement> {
        self.expect(Token::While)?;
        let test = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::While { test, body })
    }

    /// Parse loop targets, which stop before `in`.
    fn parse_target_list(&mut self) -> ParseResult<Expression> {
        let mut targets = vec![Expression::Name(self.parse_identifier()?)];
        while self.consume(&Token::Comma) {
            targets.push(Expression::Name(self.parse_identifier()?));
        }
        Ok(if targets.len() == 1 {
            targets.remove(0)
        } else {
            Expression::Tuple(targets)
        })
    }
}
