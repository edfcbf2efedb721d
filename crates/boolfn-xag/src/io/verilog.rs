//! Reader for gate-level structural Verilog.
//!
//! Supported subset: a single `module` with `input`, `output` and `wire`
//! declarations of scalar nets and `assign` statements over `~ & ^ |`,
//! parentheses, net names and the constants `1'b0`/`1'b1`.

use std::fmt;
use std::path::Path;

use logos::Logos;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{XagError, XagResult};
use crate::network::LogicNetwork;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
enum Token {
    #[token("module")]
    Module,

    #[token("endmodule")]
    EndModule,

    #[token("input")]
    Input,

    #[token("output")]
    Output,

    #[token("wire")]
    Wire,

    #[token("assign")]
    Assign,

    #[regex(r"1'[bB][01]", |lex| lex.slice().ends_with('1'))]
    Constant(bool),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    #[regex(r"\\[^ \t\r\n]+", |lex| lex.slice()[1..].to_string())]
    Identifier(String),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Eq,

    #[token("~")]
    Tilde,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Module => write!(f, "module"),
            Token::EndModule => write!(f, "endmodule"),
            Token::Input => write!(f, "input"),
            Token::Output => write!(f, "output"),
            Token::Wire => write!(f, "wire"),
            Token::Assign => write!(f, "assign"),
            Token::Constant(v) => write!(f, "1'b{}", u8::from(*v)),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Eq => write!(f, "="),
            Token::Tilde => write!(f, "~"),
            Token::Ampersand => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
        }
    }
}

/// Net state while reading the module body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NetKind {
    Input,
    Output,
    Wire,
}

struct Reader<'s, N: LogicNetwork> {
    source: &'s str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
    network: N,
    kinds: FxHashMap<String, NetKind>,
    values: FxHashMap<String, N::Signal>,
    outputs: Vec<String>,
}

impl<'s, N: LogicNetwork> Reader<'s, N> {
    fn new(source: &'s str) -> XagResult<Self> {
        let mut lexer = Token::lexer(source);
        let mut tokens = Vec::new();
        while let Some(result) = lexer.next() {
            let start = lexer.span().start;
            match result {
                Ok(token) => tokens.push((token, start)),
                Err(()) => {
                    return Err(XagError::Verilog {
                        line: line_of(source, start),
                        message: format!("invalid token '{}'", lexer.slice()),
                    });
                }
            }
        }
        Ok(Self {
            source,
            tokens,
            pos: 0,
            network: N::default(),
            kinds: FxHashMap::default(),
            values: FxHashMap::default(),
            outputs: Vec::new(),
        })
    }

    fn line(&self) -> usize {
        let offset = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(self.source.len(), |(_, start)| *start);
        line_of(self.source, offset)
    }

    fn error(&self, message: impl Into<String>) -> XagError {
        XagError::Verilog {
            line: self.line(),
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> XagResult<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .map(|(t, _)| t.clone())
            .ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> XagResult<()> {
        let found = self.advance()?;
        if std::mem::discriminant(&found) != std::mem::discriminant(expected) {
            self.pos -= 1;
            return Err(self.error(format!("expected '{expected}', found '{found}'")));
        }
        Ok(())
    }

    fn consume(&mut self, token: &Token) -> bool {
        let matches = self
            .peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token));
        if matches {
            self.pos += 1;
        }
        matches
    }

    fn identifier(&mut self) -> XagResult<String> {
        match self.advance()? {
            Token::Identifier(name) => Ok(name),
            other => {
                self.pos -= 1;
                Err(self.error(format!("expected identifier, found '{other}'")))
            }
        }
    }

    fn read_module(mut self) -> XagResult<N> {
        self.expect(&Token::Module)?;
        let name = self.identifier()?;
        if self.consume(&Token::LParen) {
            if !self.consume(&Token::RParen) {
                loop {
                    self.identifier()?;
                    if !self.consume(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
            }
        }
        self.expect(&Token::Semicolon)?;

        loop {
            match self.advance()? {
                Token::Input => self.declare(NetKind::Input)?,
                Token::Output => self.declare(NetKind::Output)?,
                Token::Wire => self.declare(NetKind::Wire)?,
                Token::Assign => self.assign()?,
                Token::EndModule => break,
                other => {
                    self.pos -= 1;
                    return Err(self.error(format!("unexpected '{other}' in module body")));
                }
            }
        }

        for output in &self.outputs {
            let signal = *self.values.get(output).ok_or_else(|| XagError::Verilog {
                line: line_of(self.source, self.source.len()),
                message: format!("output '{output}' is never assigned"),
            })?;
            self.network.create_po(signal);
        }
        debug!(
            module = %name,
            num_pis = self.network.num_pis(),
            num_pos = self.network.num_pos(),
            "Parsed Verilog module"
        );
        Ok(self.network)
    }

    fn declare(&mut self, kind: NetKind) -> XagResult<()> {
        loop {
            let name = self.identifier()?;
            if self.kinds.contains_key(&name) {
                return Err(self.error(format!("net '{name}' declared twice")));
            }
            match kind {
                NetKind::Input => {
                    let signal = self.network.create_pi(Some(&name));
                    self.values.insert(name.clone(), signal);
                }
                NetKind::Output => self.outputs.push(name.clone()),
                NetKind::Wire => {}
            }
            self.kinds.insert(name, kind);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::Semicolon)
    }

    fn assign(&mut self) -> XagResult<()> {
        let target = self.identifier()?;
        match self.kinds.get(&target) {
            None => return Err(self.error(format!("assignment to undeclared net '{target}'"))),
            Some(NetKind::Input) => {
                return Err(self.error(format!("assignment to input '{target}'")));
            }
            Some(_) if self.values.contains_key(&target) => {
                return Err(self.error(format!("net '{target}' assigned twice")));
            }
            Some(_) => {}
        }
        self.expect(&Token::Eq)?;
        let value = self.or_expr()?;
        self.expect(&Token::Semicolon)?;
        self.values.insert(target, value);
        Ok(())
    }

    fn or_expr(&mut self) -> XagResult<N::Signal> {
        let mut lhs = self.xor_expr()?;
        while self.consume(&Token::Pipe) {
            let rhs = self.xor_expr()?;
            lhs = self.network.create_or(lhs, rhs);
        }
        Ok(lhs)
    }

    fn xor_expr(&mut self) -> XagResult<N::Signal> {
        let mut lhs = self.and_expr()?;
        while self.consume(&Token::Caret) {
            let rhs = self.and_expr()?;
            lhs = self.network.create_xor(lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> XagResult<N::Signal> {
        let mut lhs = self.unary_expr()?;
        while self.consume(&Token::Ampersand) {
            let rhs = self.unary_expr()?;
            lhs = self.network.create_and(lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary_expr(&mut self) -> XagResult<N::Signal> {
        match self.advance()? {
            Token::Tilde => {
                let inner = self.unary_expr()?;
                Ok(self.network.create_not(inner))
            }
            Token::LParen => {
                let inner = self.or_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Constant(value) => Ok(self.network.get_constant(value)),
            Token::Identifier(name) => {
                if let Some(signal) = self.values.get(&name).copied() {
                    return Ok(signal);
                }
                self.pos -= 1;
                if self.kinds.contains_key(&name) {
                    Err(self.error(format!("net '{name}' used before it is assigned")))
                } else {
                    Err(self.error(format!("undeclared net '{name}'")))
                }
            }
            other => {
                self.pos -= 1;
                Err(self.error(format!("unexpected '{other}' in expression")))
            }
        }
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|b| *b == b'\n')
        .count()
        + 1
}

/// Parse a structural Verilog module.
///
/// Inputs become primary inputs in declaration order, named after the net.
/// Outputs become primary outputs in declaration order. Every net must be
/// assigned before it is read.
pub fn parse_verilog<N: LogicNetwork>(text: &str) -> XagResult<N> {
    Reader::new(text)?.read_module()
}

/// Read a structural Verilog file from disk.
pub fn read_verilog<N: LogicNetwork>(path: impl AsRef<Path>) -> XagResult<N> {
    let text = std::fs::read_to_string(path)?;
    parse_verilog(&text)
}
