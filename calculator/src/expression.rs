//! Expression calculator: one `<a> <op> <b>` or `velocity <d> <t>` per line.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::ops::{self, CalcError};

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            _ => Err(ParseError::UnknownOperator),
        }
    }
}

impl Operator {
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(ops::add(lhs, rhs)),
            Operator::Subtract => Ok(ops::subtract(lhs, rhs)),
            Operator::Multiply => Ok(ops::multiply(lhs, rhs)),
            Operator::Divide => ops::divide(lhs, rhs),
        }
    }
}

/// A single parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Empty,
    Velocity { distance: f64, time: f64 },
    Binary { lhs: f64, op: Operator, rhs: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid format for velocity. Use: velocity distance time")]
    VelocityFormat,
    #[error("Invalid format. Use: number operator number")]
    BinaryFormat,
    #[error("Invalid operator. Use +, -, *, /")]
    UnknownOperator,
    #[error("could not convert string to float: '{0}'")]
    InvalidNumber(String),
}

fn number(token: &str) -> Result<f64, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            return Ok(Command::Quit);
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => Ok(Command::Empty),
            [keyword, rest @ ..] if keyword.eq_ignore_ascii_case("velocity") => match rest {
                [distance, time] => Ok(Command::Velocity {
                    distance: number(distance)?,
                    time: number(time)?,
                }),
                _ => Err(ParseError::VelocityFormat),
            },
            [lhs, op, rhs] => {
                // Operands are converted before the operator is checked.
                let lhs = number(lhs)?;
                let rhs = number(rhs)?;
                Ok(Command::Binary {
                    lhs,
                    op: op.parse()?,
                    rhs,
                })
            }
            _ => Err(ParseError::BinaryFormat),
        }
    }
}

/// Runs the read-eval-print loop until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(mut input: R, output: &mut W) -> io::Result<()> {
    writeln!(output, "Simple Calculator and Velocity Calculator")?;
    writeln!(output, "Arithmetic operations: +, -, *, / (e.g., 2 + 3)")?;
    writeln!(
        output,
        "Velocity calculation: velocity distance time (e.g., velocity 100 10)"
    )?;
    writeln!(output, "Enter 'quit' to exit")?;

    let mut line = String::new();
    loop {
        write!(output, "Enter expression: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err @ ParseError::InvalidNumber(_)) => {
                writeln!(output, "Error: {err}")?;
                continue;
            }
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };
        debug!(?command, "evaluating");

        match command {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Velocity { distance, time } => {
                match ops::calculate_velocity(distance, time) {
                    Ok(velocity) => writeln!(output, "Velocity: {velocity:?} units per time unit")?,
                    Err(err) => writeln!(output, "Error: {err}")?,
                }
            }
            Command::Binary { lhs, op, rhs } => match op.apply(lhs, rhs) {
                Ok(result) => writeln!(output, "Result: {result:?}")?,
                Err(err) => writeln!(output, "Error: {err}")?,
            },
        }
    }

    Ok(())
}
