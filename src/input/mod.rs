//! Keypad input: button events and the per-mode state machine that turns
//! them into a pending expression.

mod keypad;
mod state;

pub use keypad::{Keypad, Layout};
pub use state::{Entry, Pending};

use crate::error::Error;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Power,
        Operator::Modulo,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
            Operator::Modulo => "mod",
        }
    }

    /// The four operators of the standard keypad.
    pub fn is_basic(self) -> bool {
        matches!(
            self,
            Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
}

impl Function {
    /// Text written around the operand; the second-function variant when `inverse` is set.
    pub fn label(self, inverse: bool) -> &'static str {
        match (self, inverse) {
            (Function::Sin, false) => "sin",
            (Function::Cos, false) => "cos",
            (Function::Tan, false) => "tan",
            (Function::Log, false) => "log",
            (Function::Ln, false) => "ln",
            (Function::Sin, true) => "sin⁻¹",
            (Function::Cos, true) => "cos⁻¹",
            (Function::Tan, true) => "tan⁻¹",
            (Function::Log, true) => "10^",
            (Function::Ln, true) => "e^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn symbol(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
        }
    }
}

/// Transforms applied straight to the numeric value of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Percent,
    Reciprocal,
    Negate,
    Abs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Decimal,
    Operator(Operator),
    OpenParen,
    CloseParen,
    Function(Function),
    Factorial,
    Constant(Constant),
    Square,
    SquareRoot,
    Unary(UnaryOp),
    /// Start the exponent of a number typed in scientific notation.
    Exponent,
    ToggleInverse,
    ToggleAngle,
    Equals,
    Clear,
    AllClear,
    MemoryAdd,
    MemorySubtract,
    MemoryRecall,
    MemoryClear,
    /// Recall the last result.
    Ans,
}

impl Key {
    pub fn on_standard_keypad(self) -> bool {
        match self {
            Key::Digit(_)
            | Key::Decimal
            | Key::Equals
            | Key::Clear
            | Key::AllClear
            | Key::MemoryAdd
            | Key::MemorySubtract
            | Key::MemoryRecall
            | Key::MemoryClear
            | Key::Unary(UnaryOp::Percent)
            | Key::Unary(UnaryOp::Negate) => true,
            Key::Operator(op) => op.is_basic(),
            _ => false,
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse a button label such as `7`, `+`, `sin`, `M+` or `AC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim() {
            d if d.len() == 1 && d.chars().all(|c| c.is_ascii_digit()) => {
                Key::Digit(d.chars().next().unwrap_or('0'))
            }
            "." => Key::Decimal,
            "+" => Key::Operator(Operator::Add),
            "-" | "−" => Key::Operator(Operator::Subtract),
            "*" | "×" | "x" => Key::Operator(Operator::Multiply),
            "/" | "÷" => Key::Operator(Operator::Divide),
            "^" | "xʸ" => Key::Operator(Operator::Power),
            "mod" => Key::Operator(Operator::Modulo),
            "(" => Key::OpenParen,
            ")" => Key::CloseParen,
            "sin" => Key::Function(Function::Sin),
            "cos" => Key::Function(Function::Cos),
            "tan" => Key::Function(Function::Tan),
            "log" => Key::Function(Function::Log),
            "ln" => Key::Function(Function::Ln),
            "!" | "n!" => Key::Factorial,
            "π" | "pi" => Key::Constant(Constant::Pi),
            "e" => Key::Constant(Constant::E),
            "x²" | "x2" | "sq" => Key::Square,
            "√" | "sqrt" => Key::SquareRoot,
            "%" => Key::Unary(UnaryOp::Percent),
            "1/x" => Key::Unary(UnaryOp::Reciprocal),
            "±" | "+/-" | "neg" => Key::Unary(UnaryOp::Negate),
            "|x|" | "abs" => Key::Unary(UnaryOp::Abs),
            "EXP" | "exp" | "EE" => Key::Exponent,
            "2nd" | "inv" | "INV" => Key::ToggleInverse,
            "DEG" | "RAD" | "deg" | "rad" | "drg" => Key::ToggleAngle,
            "=" => Key::Equals,
            "C" => Key::Clear,
            "AC" => Key::AllClear,
            "M+" => Key::MemoryAdd,
            "M-" | "M−" => Key::MemorySubtract,
            "MR" => Key::MemoryRecall,
            "MC" => Key::MemoryClear,
            "Ans" | "ans" => Key::Ans,
            other => return Err(Error::InvalidArgument(format!("unknown key '{}'", other))),
        };
        Ok(key)
    }
}

/// Split a whitespace-separated key script like `"1 2 + 3 ="` into keys.
/// Runs of digits are split into single presses.
pub fn parse_keys(script: &str) -> crate::error::Result<Vec<Key>> {
    let mut keys = Vec::new();
    for word in script.split_whitespace() {
        if word.len() > 1 && word.chars().all(|c| c.is_ascii_digit() || c == '.') {
            for c in word.chars() {
                keys.push(c.to_string().parse()?);
            }
        } else {
            keys.push(word.parse()?);
        }
    }
    Ok(keys)
}
