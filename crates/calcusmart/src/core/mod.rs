//! Core calculator engine
//!
//! Everything in here is free of presentation concerns: operators, scientific
//! functions, number formatting, the history ring and the engine state
//! machine that ties them together.

pub mod engine;
pub mod format;
pub mod functions;
pub mod history;
pub mod key;
mod operations;

pub use engine::{EngineSettings, EngineState, PendingOperation, Transition};
pub use format::{DecimalPlaces, NumberFormat};
pub use functions::{AngleMode, ScientificFunction};
pub use key::Key;
pub use operations::{Calculator, Operator};

use thiserror::Error;

/// Text shown in the display after any numeric failure
pub const ERROR_TOKEN: &str = "Error";

/// Text shown in an empty display
pub const ZERO_TOKEN: &str = "0";

/// Maximum number of characters accepted while typing an entry
pub const MAX_INPUT_LEN: usize = 12;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Calculator error kinds. The engine recovers from all of them locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The display did not hold a number
    #[error("Invalid operand: {0:?}")]
    InvalidOperand(String),
    /// Division by zero attempted
    #[error("Division by zero")]
    DivisionByZero,
    /// Factorial of a negative or non-integer value
    #[error("Factorial is only defined for non-negative integers, got {0}")]
    FactorialDomain(String),
    /// Result overflowed or was not a number
    #[error("Result is not a finite number")]
    NonFinite,
}

/// Parses display text into an operand.
///
/// Accepts the same numerals the display can hold (optionally signed, with an
/// optional trailing decimal point); the error token and anything else is
/// rejected.
pub fn parse_operand(text: &str) -> CalcResult<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CalcError::InvalidOperand(text.to_string())),
    }
}

/// Rejects NaN and infinite results
pub fn check_finite(value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}
