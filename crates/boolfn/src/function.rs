//! The [`BoolFunction`] facade.

use std::cell::OnceCell;
use std::fmt;
use std::path::Path;

use boolfn_bitvec::BitVector;
use boolfn_frontend::{
    ExpressionParser, FunctionParser, ParsedFunction, Signature, ValueType, signature_width,
};
use boolfn_xag::io::{parse_aiger, parse_dimacs, parse_verilog, read_aiger, read_dimacs, read_verilog};
use boolfn_xag::{LogicNetwork, Simulate, TruthTable, Xag};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::SimulationConfig;
use crate::error::{BoolFnError, BoolFnResult};

/// Result of evaluating a function on one input assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionOutput {
    /// The function has one return value.
    Single(BitVector),
    /// The function returns a tuple.
    Tuple(Vec<BitVector>),
}

impl FunctionOutput {
    /// Get the returned values in order.
    pub fn values(&self) -> &[BitVector] {
        match self {
            FunctionOutput::Single(value) => std::slice::from_ref(value),
            FunctionOutput::Tuple(values) => values,
        }
    }

    /// Consume the output and return the values in order.
    pub fn into_values(self) -> Vec<BitVector> {
        match self {
            FunctionOutput::Single(value) => vec![value],
            FunctionOutput::Tuple(values) => values,
        }
    }
}

impl fmt::Display for FunctionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionOutput::Single(value) => write!(f, "{value}"),
            FunctionOutput::Tuple(values) => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A Boolean function `f: {0,1}^n -> {0,1}^m`, represented by a logic network,
/// by explicit truth tables, or by both once the tables have been computed.
///
/// Complete truth tables are computed at most once and cached. The cache is
/// a [`OnceCell`], so a `BoolFunction` is not `Sync`.
#[derive(Debug, Clone)]
pub struct BoolFunction<N = Xag> {
    name: String,
    parameters: Signature,
    returns: Signature,
    network: Option<N>,
    num_input_bits: usize,
    num_output_bits: usize,
    truth_tables: OnceCell<Vec<TruthTable>>,
    config: SimulationConfig,
}

impl BoolFunction<Xag> {
    /// Compile a single annotated function definition.
    ///
    /// ```rust
    /// use boolfn::{BitVector, BoolFunction, FunctionOutput};
    ///
    /// let f = BoolFunction::from_source(
    ///     "def f(a, b: BitVec(1)) -> BitVec(1):\n    return a & b\n",
    /// ).unwrap();
    /// let one = BitVector::from(true);
    /// assert_eq!(
    ///     f.simulate(&[one.clone(), one]).unwrap(),
    ///     FunctionOutput::Single(BitVector::from(true))
    /// );
    /// ```
    pub fn from_source(source: &str) -> BoolFnResult<Self> {
        Ok(Self::from_parsed(FunctionParser::new().parse(source)?))
    }

    /// Compile an expression; inputs are ordered by first occurrence.
    pub fn from_expression(expression: &str) -> BoolFnResult<Self> {
        Ok(Self::from_parsed(ExpressionParser::new().parse(expression)?))
    }

    /// Compile an expression with an explicit input order.
    pub fn from_expression_with_order<I, S>(expression: &str, order: I) -> BoolFnResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_parsed(
            ExpressionParser::with_order(order).parse(expression)?,
        ))
    }

    /// Build a function from one most-significant-first truth table string
    /// per output.
    ///
    /// The first character of each string is the value at the all-ones input,
    /// the last the value at the all-zeros input.
    pub fn from_truth_table<S: AsRef<str>>(tables: &[S]) -> BoolFnResult<Self> {
        let Some(first) = tables.first() else {
            return Err(BoolFnError::InvalidTruthTableLength(
                "at least one truth table is required".into(),
            ));
        };
        let len = first.as_ref().len();
        if len == 0 || !len.is_power_of_two() {
            return Err(BoolFnError::InvalidTruthTableLength(format!(
                "length {len} is not a power of 2"
            )));
        }
        if let Some(other) = tables.iter().find(|t| t.as_ref().len() != len) {
            return Err(BoolFnError::InvalidTruthTableLength(format!(
                "all tables must have length {len}, found {}",
                other.as_ref().len()
            )));
        }
        let parsed = tables
            .iter()
            .map(|t| TruthTable::from_binary_string(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let num_inputs = len.trailing_zeros() as usize;
        let function = Self {
            name: "<truth table>".to_string(),
            parameters: vec![ValueType::BIT; num_inputs],
            returns: vec![ValueType::BIT; parsed.len()],
            network: None,
            num_input_bits: num_inputs,
            num_output_bits: parsed.len(),
            truth_tables: OnceCell::from(parsed),
            config: SimulationConfig::default(),
        };
        Ok(function)
    }

    /// Build a single-output function from one truth table string.
    pub fn from_truth_table_str(table: &str) -> BoolFnResult<Self> {
        Self::from_truth_table(&[table])
    }

    /// Read an ASCII or binary AIGER file.
    pub fn from_aiger_file(path: impl AsRef<Path>) -> BoolFnResult<Self> {
        let name = file_stem(path.as_ref());
        Ok(Self::from_network(name, read_aiger(path)?))
    }

    /// Parse AIGER data held in memory.
    pub fn from_aiger_bytes(data: &[u8]) -> BoolFnResult<Self> {
        Ok(Self::from_network("<aiger>", parse_aiger(data)?))
    }

    /// Read a DIMACS CNF file; the function is the conjunction of its clauses.
    pub fn from_dimacs_file(path: impl AsRef<Path>) -> BoolFnResult<Self> {
        let name = file_stem(path.as_ref());
        Ok(Self::from_network(name, read_dimacs(path)?))
    }

    /// Parse DIMACS CNF text.
    pub fn from_dimacs_str(text: &str) -> BoolFnResult<Self> {
        Ok(Self::from_network("<dimacs>", parse_dimacs(text)?))
    }

    /// Read a structural Verilog file.
    pub fn from_verilog_file(path: impl AsRef<Path>) -> BoolFnResult<Self> {
        let name = file_stem(path.as_ref());
        Ok(Self::from_network(name, read_verilog(path)?))
    }

    /// Parse structural Verilog text.
    pub fn from_verilog_str(text: &str) -> BoolFnResult<Self> {
        Ok(Self::from_network("<verilog>", parse_verilog(text)?))
    }
}

impl<N: LogicNetwork + Simulate> BoolFunction<N> {
    /// Wrap the result of a front-end parse.
    pub fn from_parsed(parsed: ParsedFunction<N>) -> Self {
        let ParsedFunction {
            name,
            parameters,
            returns,
            network,
        } = parsed;
        let num_input_bits = signature_width(&parameters);
        let num_output_bits = signature_width(&returns);
        debug_assert_eq!(num_input_bits, network.num_pis());
        debug_assert_eq!(num_output_bits, network.num_pos());
        Self {
            name,
            parameters,
            returns,
            num_input_bits,
            num_output_bits,
            network: Some(network),
            truth_tables: OnceCell::new(),
            config: SimulationConfig::default(),
        }
    }

    /// Wrap a network whose inputs and outputs are all single bits.
    pub fn from_network(name: impl Into<String>, network: N) -> Self {
        let (inputs, outputs) = (network.num_pis(), network.num_pos());
        Self {
            name: name.into(),
            parameters: vec![ValueType::BIT; inputs],
            returns: vec![ValueType::BIT; outputs],
            network: Some(network),
            num_input_bits: inputs,
            num_output_bits: outputs,
            truth_tables: OnceCell::new(),
            config: SimulationConfig::default(),
        }
    }

    /// Replace the simulation configuration.
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parameter types.
    pub fn parameters(&self) -> &[ValueType] {
        &self.parameters
    }

    /// Get the return types.
    pub fn returns(&self) -> &[ValueType] {
        &self.returns
    }

    /// Get the simulation configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get the number of parameters.
    pub fn num_inputs(&self) -> usize {
        self.parameters.len()
    }

    /// Get the number of return values.
    pub fn num_outputs(&self) -> usize {
        self.returns.len()
    }

    /// Get the total number of input bits.
    pub fn num_input_bits(&self) -> usize {
        self.num_input_bits
    }

    /// Get the total number of output bits.
    pub fn num_output_bits(&self) -> usize {
        self.num_output_bits
    }

    /// Get the logic network, if the function has one.
    pub fn logic_network(&self) -> Option<&N> {
        self.network.as_ref()
    }

    /// Evaluate the function on one argument per parameter.
    ///
    /// Uses the cached truth tables when they exist and simulates the network
    /// otherwise.
    pub fn simulate(&self, args: &[BitVector]) -> BoolFnResult<FunctionOutput> {
        if args.len() != self.num_inputs() {
            return Err(BoolFnError::Arity {
                expected: self.num_inputs(),
                got: args.len(),
            });
        }
        let mut inputs = Vec::with_capacity(self.num_input_bits);
        for (index, (arg, expected)) in args.iter().zip(&self.parameters).enumerate() {
            if arg.len() != expected.width {
                return Err(BoolFnError::ArgumentType {
                    index,
                    expected: *expected,
                    actual: ValueType::bitvec(arg.len()),
                });
            }
            inputs.extend(arg.to_bits_lsb_first());
        }

        let outputs = match self.truth_tables.get() {
            Some(tables) => {
                let position = inputs
                    .iter()
                    .enumerate()
                    .fold(0usize, |acc, (k, bit)| acc | (usize::from(*bit) << k));
                debug!("Looking up position {} in cached truth tables", position);
                tables.iter().map(|t| t.bit(position)).collect()
            }
            None => self.network()?.simulate_pattern(&inputs)?,
        };
        self.pack(&outputs)
    }

    /// Compute the complete truth table of every output bit.
    ///
    /// The tables are computed once; later calls return the cached tables.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn simulate_all(&self) -> BoolFnResult<&[TruthTable]> {
        if let Some(tables) = self.truth_tables.get() {
            return Ok(tables);
        }
        let network = self.network()?;
        let limit = self.config.max_truth_table_inputs;
        if self.num_input_bits > limit {
            return Err(BoolFnError::TooManyInputs {
                limit,
                got: self.num_input_bits,
            });
        }
        info!(
            "Computing truth tables for {} outputs over {} inputs",
            self.num_output_bits, self.num_input_bits
        );
        let tables = network.simulate_truth_tables()?;
        Ok(self.truth_tables.get_or_init(|| tables))
    }

    /// Get the truth table of one output bit.
    pub fn truth_table(&self, output_bit: usize) -> BoolFnResult<&TruthTable> {
        let tables = self.simulate_all()?;
        tables.get(output_bit).ok_or(BoolFnError::OutputOutOfRange {
            index: output_bit,
            num_outputs: tables.len(),
        })
    }

    /// Evaluate the function at every input position, in position order.
    pub fn enumerate(&self) -> BoolFnResult<Vec<FunctionOutput>> {
        let tables = self.simulate_all()?;
        (0..1usize << self.num_input_bits)
            .map(|position| {
                let bits: Vec<bool> = tables.iter().map(|t| t.bit(position)).collect();
                self.pack(&bits)
            })
            .collect()
    }

    /// Count the true positions of every output bit.
    pub fn count_ones(&self) -> BoolFnResult<Vec<u64>> {
        Ok(self.simulate_all()?.iter().map(TruthTable::count_ones).collect())
    }

    /// Render the truth tables as a table.
    ///
    /// Input columns are lettered from `a` (input 0), the highest input on the
    /// left; output columns are numbered, the highest output on the left.
    ///
    /// ```text
    ///  b  a  |  0
    /// ------------
    ///  0  0  |  0
    ///  0  1  |  0
    ///  1  0  |  0
    ///  1  1  |  1
    /// ```
    pub fn truth_table_display(&self) -> BoolFnResult<String> {
        let tables = self.simulate_all()?;
        let (n, m) = (self.num_input_bits, tables.len());
        let mut out = String::new();

        let mut line = String::new();
        for i in (0..n).rev() {
            line.push_str(&format!("{:^3}", input_label(i)));
        }
        line.push_str(" | ");
        for j in (0..m).rev() {
            line.push_str(&format!("{j:^3}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
        out.push_str(&"-".repeat((n + m) * 3 + 3));
        out.push('\n');

        for position in 0..1usize << n {
            let mut line = String::new();
            for i in (0..n).rev() {
                line.push_str(&format!("{:^3}", (position >> i) & 1));
            }
            line.push_str(" | ");
            for table in tables.iter().rev() {
                line.push_str(&format!("{:^3}", u8::from(table.bit(position))));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out)
    }

    fn network(&self) -> BoolFnResult<&N> {
        self.network.as_ref().ok_or(BoolFnError::NoNetwork)
    }

    /// Split flat output bits into one value per return slot.
    fn pack(&self, bits: &[bool]) -> BoolFnResult<FunctionOutput> {
        let mut values = Vec::with_capacity(self.returns.len());
        let mut offset = 0;
        for ty in &self.returns {
            let slot = bits.get(offset..offset + ty.width).ok_or(BoolFnError::OutputOutOfRange {
                index: offset + ty.width - 1,
                num_outputs: bits.len(),
            })?;
            values.push(BitVector::from_bits_lsb_first(slot)?);
            offset += ty.width;
        }
        Ok(if values.len() == 1 {
            FunctionOutput::Single(values.remove(0))
        } else {
            FunctionOutput::Tuple(values)
        })
    }
}

fn input_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'a' + i).to_string(),
        _ => format!("x{index}"),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned())
}
