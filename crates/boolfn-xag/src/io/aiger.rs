//! AIGER reader (ASCII `aag` and binary `aig`), combinational subset.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{XagError, XagResult};
use crate::network::LogicNetwork;

/// Largest variable index whose literals `2 * M + 1` fit a `u32` node index.
const MAX_VARIABLE: usize = (u32::MAX >> 1) as usize;

/// Header counts `M I L O A`.
#[derive(Debug, Clone, Copy)]
struct Header {
    binary: bool,
    max_var: usize,
    inputs: usize,
    latches: usize,
    outputs: usize,
    ands: usize,
}

/// Line-oriented cursor over the raw file, with varint access for the
/// binary AND section.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> XagError {
        XagError::Aiger {
            line: self.line.max(1),
            message: message.into(),
        }
    }

    fn read_line(&mut self) -> Option<&'a str> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let end = rest.iter().position(|b| *b == b'\n').unwrap_or(rest.len());
        self.pos += (end + 1).min(rest.len());
        self.line += 1;
        std::str::from_utf8(&rest[..end])
            .ok()
            .map(|s| s.trim_end_matches('\r'))
    }

    fn expect_line(&mut self, what: &str) -> XagResult<&'a str> {
        let line = self.read_line();
        line.ok_or_else(|| self.error(format!("unexpected end of file, expected {what}")))
    }

    fn read_varint(&mut self) -> XagResult<usize> {
        let mut value = 0usize;
        let mut shift = 0;
        loop {
            let byte = *self
                .data
                .get(self.pos)
                .ok_or_else(|| self.error("truncated binary AND section"))?;
            self.pos += 1;
            if shift >= usize::BITS {
                return Err(self.error("binary delta overflows"));
            }
            value |= usize::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}

fn parse_header(cursor: &mut Cursor<'_>) -> XagResult<Header> {
    let line = cursor.expect_line("header")?;
    let mut fields = line.split_whitespace();
    let binary = match fields.next() {
        Some("aag") => false,
        Some("aig") => true,
        _ => return Err(cursor.error("header must start with 'aag' or 'aig'")),
    };
    let numbers = fields
        .map(|f| f.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| cursor.error(format!("invalid header field: {e}")))?;
    if numbers.len() < 5 {
        return Err(cursor.error("header needs the five counts M I L O A"));
    }
    if numbers.len() > 5 && numbers[5..].iter().any(|n| *n != 0) {
        return Err(cursor.error("bad, constraint, justice and fairness sections are not supported"));
    }
    let header = Header {
        binary,
        max_var: numbers[0],
        inputs: numbers[1],
        latches: numbers[2],
        outputs: numbers[3],
        ands: numbers[4],
    };
    if header.latches != 0 {
        return Err(cursor.error("latches are not supported"));
    }
    if header.max_var > MAX_VARIABLE {
        return Err(cursor.error(format!(
            "M = {} exceeds the supported maximum {MAX_VARIABLE}",
            header.max_var
        )));
    }
    let declared = header
        .inputs
        .checked_add(header.latches)
        .and_then(|n| n.checked_add(header.ands))
        .ok_or_else(|| cursor.error("I + L + A overflows"))?;
    if declared > header.max_var {
        return Err(cursor.error("M is smaller than I + L + A"));
    }
    // ASCII files spend at least one line on every input, output and AND;
    // binary files at least one byte per output and two per AND.
    let body = cursor.data.len() - cursor.pos;
    let needed = if header.binary {
        header.ands.checked_mul(2).and_then(|n| n.checked_add(header.outputs))
    } else {
        header.inputs.checked_add(header.outputs).and_then(|n| n.checked_add(header.ands))
    };
    if needed.is_none_or(|n| n > body) {
        return Err(cursor.error("header counts exceed the file size"));
    }
    Ok(header)
}

fn parse_literal(cursor: &Cursor<'_>, text: &str) -> XagResult<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|_| cursor.error(format!("invalid literal '{}'", text.trim())))
}

/// Parse an AIGER file held in memory.
///
/// Both the ASCII and the binary variant are accepted. Input names come from
/// `i<k>` symbol table entries; inputs without an entry stay unnamed.
pub fn parse_aiger<N: LogicNetwork>(data: &[u8]) -> XagResult<N> {
    let mut cursor = Cursor::new(data);
    let header = parse_header(&mut cursor)?;
    debug!(?header, "Parsing AIGER");

    // Binary inputs are implicit, so only ASCII literals are collected.
    let mut input_lits = Vec::new();
    if !header.binary {
        for _ in 0..header.inputs {
            let line = cursor.expect_line("input literal")?;
            let lit = parse_literal(&cursor, line)?;
            if lit < 2 || lit % 2 != 0 {
                return Err(cursor.error(format!("input literal {lit} must be even and non-constant")));
            }
            input_lits.push(lit);
        }
    }

    let mut output_lits = Vec::with_capacity(header.outputs);
    for _ in 0..header.outputs {
        let line = cursor.expect_line("output literal")?;
        output_lits.push(parse_literal(&cursor, line)?);
    }

    let mut ands = Vec::with_capacity(header.ands);
    if header.binary {
        for i in 0..header.ands {
            let lhs = 2 * (header.inputs + header.latches + i + 1);
            let delta0 = cursor.read_varint()?;
            let delta1 = cursor.read_varint()?;
            let rhs0 = lhs
                .checked_sub(delta0)
                .ok_or_else(|| cursor.error("binary delta exceeds left-hand side"))?;
            let rhs1 = rhs0
                .checked_sub(delta1)
                .ok_or_else(|| cursor.error("binary delta exceeds first operand"))?;
            ands.push((lhs, rhs0, rhs1, cursor.line));
        }
    } else {
        for _ in 0..header.ands {
            let line = cursor.expect_line("AND definition")?;
            let lits = line
                .split_whitespace()
                .map(|t| parse_literal(&cursor, t))
                .collect::<XagResult<Vec<_>>>()?;
            let [lhs, rhs0, rhs1] = lits[..] else {
                return Err(cursor.error("AND definition needs three literals"));
            };
            if lhs < 2 || lhs % 2 != 0 {
                return Err(cursor.error(format!("AND literal {lhs} must be even and non-constant")));
            }
            ands.push((lhs, rhs0, rhs1, cursor.line));
        }
    }

    let mut names: FxHashMap<usize, String> = FxHashMap::default();
    while let Some(line) = cursor.read_line() {
        if line == "c" {
            break;
        }
        let Some((kind, name)) = line.split_once(' ') else {
            continue;
        };
        if let Some(position) = kind.strip_prefix('i') {
            let index = position
                .parse::<usize>()
                .map_err(|_| cursor.error(format!("invalid symbol '{kind}'")))?;
            if index >= header.inputs {
                return Err(cursor.error(format!("symbol for missing input {index}")));
            }
            names.insert(index, name.to_string());
        }
    }

    let mut network = N::default();
    let mut signals: FxHashMap<usize, N::Signal> = FxHashMap::default();
    signals.insert(0, network.get_constant(false));
    for index in 0..header.inputs {
        let lit = if header.binary { 2 * (index + 1) } else { input_lits[index] };
        let var = lit / 2;
        let name = names.get(&index);
        if var > header.max_var {
            return Err(cursor.error(format!("input variable {var} exceeds M")));
        }
        signals.insert(var, network.create_pi(name.map(String::as_str)));
    }

    let lookup = |network: &mut N, signals: &FxHashMap<usize, N::Signal>, lit: usize| {
        signals.get(&(lit / 2)).copied().map(|s| {
            if lit % 2 == 1 {
                network.create_not(s)
            } else {
                s
            }
        })
    };

    // ASCII files do not have to list ANDs topologically; keep sweeping
    // until every definition has both operands available.
    let mut pending = ands;
    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for (lhs, rhs0, rhs1, line) in pending {
            let a = lookup(&mut network, &signals, rhs0);
            let b = lookup(&mut network, &signals, rhs1);
            match (a, b) {
                (Some(a), Some(b)) => {
                    if lhs / 2 > header.max_var {
                        return Err(XagError::Aiger {
                            line,
                            message: format!("AND variable {} exceeds M", lhs / 2),
                        });
                    }
                    let gate = network.create_and(a, b);
                    signals.insert(lhs / 2, gate);
                }
                _ => deferred.push((lhs, rhs0, rhs1, line)),
            }
        }
        if deferred.len() == before {
            let (lhs, _, _, line) = deferred[0];
            return Err(XagError::Aiger {
                line,
                message: format!("AND {lhs} depends on an undefined or cyclic literal"),
            });
        }
        pending = deferred;
    }

    for lit in output_lits {
        let signal = lookup(&mut network, &signals, lit)
            .ok_or_else(|| cursor.error(format!("output literal {lit} is undefined")))?;
        network.create_po(signal);
    }

    Ok(network)
}

/// Read an AIGER file from disk.
pub fn read_aiger<N: LogicNetwork>(path: impl AsRef<Path>) -> XagResult<N> {
    let data = std::fs::read(path)?;
    parse_aiger(&data)
}
