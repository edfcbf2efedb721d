//! Lexer for the restricted function syntax.
//!
//! Tokenization happens in two steps. [`Token`] is a plain `logos` lexer that
//! reports physical newlines; [`tokenize`] then runs a layout pass over the
//! raw stream which turns line structure into `Newline`, `Indent` and `Dedent`
//! tokens with offside-rule block structure.

use std::fmt;
use std::ops::Range;

use logos::Logos;
use num_bigint::BigUint;

use crate::error::{ParseError, ParseResult};

fn parse_int(slice: &str, radix: u32) -> Option<BigUint> {
    let digits: String = slice.chars().filter(|c| *c != '_').collect();
    let digits = if radix == 10 { &digits[..] } else { &digits[2..] };
    BigUint::parse_bytes(digits.as_bytes(), radix)
}

fn unquote(slice: &str) -> String {
    slice[1..slice.len() - 1].to_string()
}

fn unquote_triple(slice: &str) -> String {
    slice[3..slice.len() - 3].to_string()
}

/// Raw tokens.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"\\\r?\n")]
pub enum Token {
    // Keywords
    #[token("def")]
    Def,

    #[token("return")]
    Return,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token("not")]
    Not,

    #[token("is")]
    Is,

    #[token("in")]
    In,

    #[token("if")]
    If,

    #[token("elif")]
    Elif,

    #[token("else")]
    Else,

    #[token("for")]
    For,

    #[token("while")]
    While,

    #[token("pass")]
    Pass,

    #[token("lambda")]
    Lambda,

    #[token("True")]
    True,

    #[token("False")]
    False,

    #[token("None")]
    None,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9][0-9_]*", |lex| parse_int(lex.slice(), 10))]
    #[regex(r"0[bB][01_]+", |lex| parse_int(lex.slice(), 2))]
    #[regex(r"0[oO][0-7_]+", |lex| parse_int(lex.slice(), 8))]
    #[regex(r"0[xX][0-9a-fA-F_]+", |lex| parse_int(lex.slice(), 16))]
    IntLiteral(BigUint),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| unquote(lex.slice()))]
    #[regex(r#""""([^"]|"[^"]|""[^"])*""""#, |lex| unquote_triple(lex.slice()))]
    #[regex(r"'''([^']|'[^']|''[^'])*'''", |lex| unquote_triple(lex.slice()))]
    StringLiteral(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("//")]
    DoubleSlash,

    #[token("%")]
    Percent,

    #[token("**")]
    Power,

    #[token("@")]
    At,

    #[token("<<")]
    LShift,

    #[token(">>")]
    RShift,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("~")]
    Tilde,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("=")]
    Eq,

    #[token("+=")]
    PlusEq,

    #[token("-=")]
    MinusEq,

    #[token("&=")]
    AmpersandEq,

    #[token("|=")]
    PipeEq,

    #[token("^=")]
    CaretEq,

    #[token("->")]
    Arrow,

    // Punctuation
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    // Layout
    #[regex(r"\r?\n")]
    Newline,

    /// Start of a more indented block. Only produced by the layout pass.
    Indent,

    /// End of an indented block. Only produced by the layout pass.
    Dedent,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Def => write!(f, "def"),
            Token::Return => write!(f, "return"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::Is => write!(f, "is"),
            Token::In => write!(f, "in"),
            Token::If => write!(f, "if"),
            Token::Elif => write!(f, "elif"),
            Token::Else => write!(f, "else"),
            Token::For => write!(f, "for"),
            Token::While => write!(f, "while"),
            Token::Pass => write!(f, "pass"),
            Token::Lambda => write!(f, "lambda"),
            Token::True => write!(f, "True"),
            Token::False => write!(f, "False"),
            Token::None => write!(f, "None"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "'{s}'"),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::DoubleSlash => write!(f, "//"),
            Token::Percent => write!(f, "%"),
            Token::Power => write!(f, "**"),
            Token::At => write!(f, "@"),
            Token::LShift => write!(f, "<<"),
            Token::RShift => write!(f, ">>"),
            Token::Ampersand => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::Tilde => write!(f, "~"),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Eq => write!(f, "="),
            Token::PlusEq => write!(f, "+="),
            Token::MinusEq => write!(f, "-="),
            Token::AmpersandEq => write!(f, "&="),
            Token::PipeEq => write!(f, "|="),
            Token::CaretEq => write!(f, "^="),
            Token::Arrow => write!(f, "->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Dot => write!(f, "."),
            Token::Newline => write!(f, "newline"),
            Token::Indent => write!(f, "indent"),
            Token::Dedent => write!(f, "dedent"),
        }
    }
}

/// A token with the line it starts on.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Byte offsets of line starts, for offset-to-line lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    /// One-based line number of `offset`.
    fn line(&self, offset: usize) -> usize {
        self.starts.partition_point(|start| *start <= offset)
    }

    /// Indentation width of the line holding `offset`, with tabs advancing to
    /// the next multiple of eight.
    fn column(&self, source: &str, offset: usize) -> usize {
        let start = self.starts[self.line(offset) - 1];
        source[start..offset].chars().fold(0, |col, c| match c {
            '\t' => (col / 8 + 1) * 8,
            _ => col + 1,
        })
    }
}

/// Tokenize without the layout pass.
pub fn tokenize_raw(source: &str) -> Vec<Result<(Token, Range<usize>), Range<usize>>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Ok((token, span))),
            Err(()) => tokens.push(Err(span)),
        }
    }

    tokens
}

/// Tokenize a source string into a layout-aware token stream.
///
/// The stream ends with a `Newline` after the last logical line followed by
/// one `Dedent` per open block. The column of the first token is the base
/// indentation, so uniformly indented snippets are accepted.
pub fn tokenize(source: &str) -> ParseResult<Vec<SpannedToken>> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut indents: Vec<usize> = Vec::new();
    let mut nesting = 0usize;
    let mut at_line_start = true;
    let mut last_line = 1;

    for result in tokenize_raw(source) {
        let (token, span) = result.map_err(|span| ParseError::LexerError {
            line: lines.line(span.start),
            message: format!("Invalid token: '{}'", &source[span]),
        })?;
        let line = lines.line(span.start);
        last_line = line;

        if token == Token::Newline {
            if nesting == 0 && !at_line_start {
                tokens.push(SpannedToken { token, line });
                at_line_start = true;
            }
            continue;
        }

        if at_line_start {
            let column = lines.column(source, span.start);
            match indents.last().copied() {
                None => indents.push(column),
                Some(top) if column > top => {
                    indents.push(column);
                    tokens.push(SpannedToken {
                        token: Token::Indent,
                        line,
                    });
                }
                Some(_) => {
                    while indents.last().is_some_and(|top| column < *top) {
                        if indents.len() == 1 {
                            return Err(ParseError::Indentation {
                                line,
                                message: "unindent below the first line".into(),
                            });
                        }
                        indents.pop();
                        tokens.push(SpannedToken {
                            token: Token::Dedent,
                            line,
                        });
                    }
                    if indents.last() != Some(&column) {
                        return Err(ParseError::Indentation {
                            line,
                            message: "unindent does not match any outer indentation level".into(),
                        });
                    }
                }
            }
            at_line_start = false;
        }

        match token {
            Token::LParen | Token::LBracket | Token::LBrace => nesting += 1,
            Token::RParen | Token::RBracket | Token::RBrace => nesting = nesting.saturating_sub(1),
            _ => {}
        }
        tokens.push(SpannedToken { token, line });
    }

    if !at_line_start {
        tokens.push(SpannedToken {
            token: Token::Newline,
            line: last_line,
        });
    }
    for _ in 1..indents.len() {
        tokens.push(SpannedToken {
            token: Token::Dedent,
            line: last_line,
        });
    }

    Ok(tokens)
}
