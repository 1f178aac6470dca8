//! Binary operators and their arithmetic

use crate::core::{check_finite, CalcError, CalcResult};
use serde::{Deserialize, Serialize};

/// Binary operator keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (×)
    Multiply,
    /// Division (÷)
    Divide,
    /// Percent of the left operand (%)
    Percent,
    /// Exponentiation (^)
    Power,
}

impl Operator {
    /// Every operator, in keypad order
    pub const ALL: [Operator; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Percent,
        Self::Power,
    ];

    /// Returns the operator symbol used in expressions and history
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Percent => "%",
            Self::Power => "^",
        }
    }

    /// Maps a typed character to an operator
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            '%' => Some(Self::Percent),
            '^' => Some(Self::Power),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Arithmetic for the binary operators
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    /// Applies `op` to two operands
    pub fn calculate(left: f64, right: f64, op: Operator) -> CalcResult<f64> {
        match op {
            Operator::Add => Self::add(left, right),
            Operator::Subtract => Self::subtract(left, right),
            Operator::Multiply => Self::multiply(left, right),
            Operator::Divide => Self::divide(left, right),
            Operator::Percent => Self::percent(left, right),
            Operator::Power => Self::power(left, right),
        }
    }

    /// Addition: a + b
    pub fn add(a: f64, b: f64) -> CalcResult<f64> {
        check_finite(a + b)
    }

    /// Subtraction: a - b
    pub fn subtract(a: f64, b: f64) -> CalcResult<f64> {
        check_finite(a - b)
    }

    /// Multiplication: a * b
    pub fn multiply(a: f64, b: f64) -> CalcResult<f64> {
        check_finite(a * b)
    }

    /// Division: a / b
    pub fn divide(a: f64, b: f64) -> CalcResult<f64> {
        if b == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        check_finite(a / b)
    }

    /// Percent: b percent of a, i.e. a * (b / 100)
    pub fn percent(a: f64, b: f64) -> CalcResult<f64> {
        check_finite(a * (b / 100.0))
    }

    /// Power: a ^ b
    pub fn power(a: f64, b: f64) -> CalcResult<f64> {
        check_finite(a.powf(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_operator_symbols() {
        assert_eq!(Operator::Add.symbol(), "+");
        assert_eq!(Operator::Subtract.symbol(), "-");
        assert_eq!(Operator::Multiply.symbol(), "×");
        assert_eq!(Operator::Divide.symbol(), "÷");
        assert_eq!(Operator::Percent.symbol(), "%");
        assert_eq!(Operator::Power.symbol(), "^");
    }

    #[test]
    fn test_operator_display_matches_symbol() {
        for op in Operator::ALL {
            assert_eq!(op.to_string(), op.symbol());
        }
    }

    #[test]
    fn test_operator_from_char() {
        assert_eq!(Operator::from_char('*'), Some(Operator::Multiply));
        assert_eq!(Operator::from_char('×'), Some(Operator::Multiply));
        assert_eq!(Operator::from_char('/'), Some(Operator::Divide));
        assert_eq!(Operator::from_char('^'), Some(Operator::Power));
        assert_eq!(Operator::from_char('x'), None);
    }

    #[test]
    fn test_add_subtract_multiply() {
        assert_eq!(Calculator::add(2.0, 3.0), Ok(5.0));
        assert_eq!(Calculator::subtract(3.0, 5.0), Ok(-2.0));
        assert_eq!(Calculator::multiply(-2.0, 3.0), Ok(-6.0));
    }

    #[test]
    fn test_divide() {
        assert_eq!(Calculator::divide(6.0, 2.0), Ok(3.0));
        assert_eq!(Calculator::divide(0.0, 5.0), Ok(0.0));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            Calculator::divide(10.0, 0.0),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            Calculator::calculate(1.0, -0.0, Operator::Divide),
            Err(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_percent_of_left_operand() {
        assert_eq!(Calculator::percent(200.0, 10.0), Ok(20.0));
        assert_eq!(Calculator::percent(50.0, 50.0), Ok(25.0));
    }

    #[test]
    fn test_power() {
        assert_eq!(Calculator::power(2.0, 10.0), Ok(1024.0));
        assert_eq!(Calculator::power(2.0, -1.0), Ok(0.5));
        assert_eq!(Calculator::power(5.0, 0.0), Ok(1.0));
    }

    #[test]
    fn test_power_overflow_is_non_finite() {
        assert_eq!(Calculator::power(10.0, 1000.0), Err(CalcError::NonFinite));
    }

    #[test]
    fn test_power_negative_base_fractional_exponent() {
        assert_eq!(Calculator::power(-2.0, 0.5), Err(CalcError::NonFinite));
    }

    #[test]
    fn test_calculate_dispatch() {
        assert_eq!(Calculator::calculate(6.0, 7.0, Operator::Multiply), Ok(42.0));
        assert_eq!(Calculator::calculate(200.0, 10.0, Operator::Percent), Ok(20.0));
        assert_eq!(Calculator::calculate(2.0, 3.0, Operator::Power), Ok(8.0));
    }

    proptest! {
        #[test]
        fn prop_add_matches_ieee_sum(a in -1e12f64..1e12f64, b in -1e12f64..1e12f64) {
            prop_assert_eq!(Calculator::calculate(a, b, Operator::Add), Ok(a + b));
        }

        #[test]
        fn prop_subtract_matches_ieee_difference(a in -1e12f64..1e12f64, b in -1e12f64..1e12f64) {
            prop_assert_eq!(Calculator::calculate(a, b, Operator::Subtract), Ok(a - b));
        }

        #[test]
        fn prop_multiply_matches_ieee_product(a in -1e6f64..1e6f64, b in -1e6f64..1e6f64) {
            prop_assert_eq!(Calculator::calculate(a, b, Operator::Multiply), Ok(a * b));
        }

        #[test]
        fn prop_divide_by_zero_always_fails(a in -1e12f64..1e12f64) {
            prop_assert_eq!(
                Calculator::calculate(a, 0.0, Operator::Divide),
                Err(CalcError::DivisionByZero)
            );
        }
    }
}
