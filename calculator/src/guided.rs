//! Guided calculator: asks for an operation name, then for each operand.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::debug;

use crate::ops::{self, CalcError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Velocity,
}

/// What the user typed at the operation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run(Operation),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOperation;

impl FromStr for Choice {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let operation = match s.trim().to_lowercase().as_str() {
            "quit" => return Ok(Choice::Quit),
            "add" => Operation::Add,
            "subtract" => Operation::Subtract,
            "multiply" => Operation::Multiply,
            "divide" => Operation::Divide,
            "velocity" => Operation::Velocity,
            _ => return Err(UnknownOperation),
        };
        Ok(Choice::Run(operation))
    }
}

impl Operation {
    fn prompts(self) -> (&'static str, &'static str) {
        match self {
            Operation::Velocity => ("Enter distance (meters): ", "Enter time (seconds): "),
            _ => ("Enter first number: ", "Enter second number: "),
        }
    }

    fn evaluate(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operation::Add => Ok(ops::add(a, b)),
            Operation::Subtract => Ok(ops::subtract(a, b)),
            Operation::Multiply => Ok(ops::multiply(a, b)),
            Operation::Divide => ops::divide(a, b),
            Operation::Velocity => ops::calculate_velocity(a, b),
        }
    }

    fn describe(self, a: f64, b: f64, result: f64) -> String {
        let symbol = match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Velocity => {
                return format!("Velocity: {a:?} m / {b:?} s = {result:?} m/s");
            }
        };
        format!("{a:?} {symbol} {b:?} = {result:?}")
    }
}

enum Operands {
    Values(f64, f64),
    /// The offending input, trimmed.
    Invalid(String),
    Eof,
}

fn read_number<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<Result<f64, String>>> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let text = line.trim();
    Ok(Some(text.parse().map_err(|_| text.to_string())))
}

fn read_operands<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    operation: Operation,
) -> io::Result<Operands> {
    let (first, second) = operation.prompts();
    let a = match read_number(input, output, first)? {
        None => return Ok(Operands::Eof),
        Some(Err(text)) => return Ok(Operands::Invalid(text)),
        Some(Ok(a)) => a,
    };
    let b = match read_number(input, output, second)? {
        None => return Ok(Operands::Eof),
        Some(Err(text)) => return Ok(Operands::Invalid(text)),
        Some(Ok(b)) => b,
    };
    Ok(Operands::Values(a, b))
}

/// Runs the guided loop until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(mut input: R, output: &mut W) -> io::Result<()> {
    writeln!(output, "=== Simple Calculator ===")?;
    writeln!(output, "Operations: add, subtract, multiply, divide, velocity")?;

    let mut line = String::new();
    loop {
        writeln!(output)?;
        writeln!(
            output,
            "Enter operation (add, subtract, multiply, divide, velocity) or 'quit' to exit:"
        )?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let operation = match line.parse::<Choice>() {
            Ok(Choice::Quit) => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            Ok(Choice::Run(operation)) => operation,
            Err(UnknownOperation) => {
                writeln!(
                    output,
                    "Invalid operation. Please choose: add, subtract, multiply, divide, or velocity"
                )?;
                continue;
            }
        };
        debug!(?operation, "selected");

        match read_operands(&mut input, output, operation)? {
            Operands::Eof => break,
            Operands::Invalid(text) => {
                writeln!(output, "Error: could not convert string to float: '{text}'")?
            }
            Operands::Values(a, b) => match operation.evaluate(a, b) {
                Ok(result) => writeln!(output, "{}", operation.describe(a, b, result))?,
                Err(err) => writeln!(output, "Error: {err}")?,
            },
        }
    }

    Ok(())
}
