//! DIMACS CNF reader.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{XagError, XagResult};
use crate::network::LogicNetwork;

fn error(line: usize, message: impl Into<String>) -> XagError {
    XagError::Dimacs {
        line,
        message: message.into(),
    }
}

/// Parse a CNF formula into a single-output network.
///
/// Variables `1..=V` become primary inputs named `x1..xV`. Each clause is the
/// OR of its literals and the output is the AND of all clauses, so an empty
/// formula is constant true and an empty clause is constant false.
pub fn parse_dimacs<N: LogicNetwork>(text: &str) -> XagResult<N> {
    let mut num_vars = None;
    let mut declared_clauses = 0usize;
    let mut clauses: Vec<Vec<i64>> = Vec::new();
    let mut current = Vec::new();
    let mut last_line = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        last_line = line;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        // SATLIB benchmark files end with a `%` marker.
        if trimmed.starts_with('%') {
            break;
        }
        if let Some(problem) = trimmed.strip_prefix('p') {
            if num_vars.is_some() {
                return Err(error(line, "duplicate problem line"));
            }
            let fields: Vec<&str> = problem.split_whitespace().collect();
            let ["cnf", vars, count] = fields[..] else {
                return Err(error(line, "problem line must read 'p cnf <vars> <clauses>'"));
            };
            num_vars = Some(
                vars.parse::<usize>()
                    .map_err(|_| error(line, format!("invalid variable count '{vars}'")))?,
            );
            declared_clauses = count
                .parse::<usize>()
                .map_err(|_| error(line, format!("invalid clause count '{count}'")))?;
            continue;
        }
        let Some(limit) = num_vars else {
            return Err(error(line, "clause before problem line"));
        };
        for token in trimmed.split_whitespace() {
            let lit = token
                .parse::<i64>()
                .map_err(|_| error(line, format!("invalid literal '{token}'")))?;
            if lit == 0 {
                clauses.push(std::mem::take(&mut current));
            } else if lit.unsigned_abs() as usize > limit {
                return Err(error(
                    line,
                    format!("literal {lit} exceeds variable count {limit}"),
                ));
            } else {
                current.push(lit);
            }
        }
    }

    let Some(num_vars) = num_vars else {
        return Err(error(last_line.max(1), "missing problem line"));
    };
    if !current.is_empty() {
        clauses.push(current);
    }
    if clauses.len() != declared_clauses {
        warn!(
            declared = declared_clauses,
            found = clauses.len(),
            "DIMACS clause count differs from header"
        );
    }
    debug!(num_vars, num_clauses = clauses.len(), "Parsed DIMACS");

    let mut network = N::default();
    let inputs: Vec<N::Signal> = (1..=num_vars)
        .map(|v| network.create_pi(Some(&format!("x{v}"))))
        .collect();

    let mut clause_signals = Vec::with_capacity(clauses.len());
    for clause in &clauses {
        let literals: Vec<N::Signal> = clause
            .iter()
            .map(|lit| {
                let signal = inputs[lit.unsigned_abs() as usize - 1];
                if *lit < 0 {
                    network.create_not(signal)
                } else {
                    signal
                }
            })
            .collect();
        clause_signals.push(network.create_nary_or(&literals));
    }
    let output = network.create_nary_and(&clause_signals);
    network.create_po(output);
    Ok(network)
}

/// Read a DIMACS CNF file from disk.
pub fn read_dimacs<N: LogicNetwork>(path: impl AsRef<Path>) -> XagResult<N> {
    let text = std::fs::read_to_string(path)?;
    parse_dimacs(&text)
}
