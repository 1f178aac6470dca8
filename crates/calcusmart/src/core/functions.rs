//! Scientific functions and angle units

use crate::core::{check_finite, CalcError, CalcResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::{E, PI};

/// Largest n whose factorial is finite in f64
const MAX_FACTORIAL: f64 = 170.0;

/// Unit used by the trigonometric functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngleMode {
    /// Angles in degrees
    #[default]
    #[serde(rename = "DEG")]
    Degrees,
    /// Angles in radians
    #[serde(rename = "RAD")]
    Radians,
}

impl AngleMode {
    /// Persisted / displayed label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Degrees => "DEG",
            Self::Radians => "RAD",
        }
    }

    /// Parses a persisted label
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "DEG" => Some(Self::Degrees),
            "RAD" => Some(Self::Radians),
            _ => None,
        }
    }

    /// The other unit
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }

    fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }

    fn from_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_degrees(),
            Self::Radians => angle,
        }
    }
}

impl std::fmt::Display for AngleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary functions of the scientific keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScientificFunction {
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Tangent
    Tan,
    /// Inverse sine
    ArcSin,
    /// Inverse cosine
    ArcCos,
    /// Inverse tangent
    ArcTan,
    /// Base-10 logarithm
    Log10,
    /// Natural logarithm
    Ln,
    /// Square root
    Sqrt,
    /// x²
    Square,
    /// x³
    Cube,
    /// 1/x
    Reciprocal,
    /// n!
    Factorial,
    /// eˣ
    Exp,
    /// The constant π
    Pi,
    /// The constant e
    E,
}

impl ScientificFunction {
    /// Every function, in keypad order
    pub const ALL: [ScientificFunction; 16] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::ArcSin,
        Self::ArcCos,
        Self::ArcTan,
        Self::Log10,
        Self::Ln,
        Self::Sqrt,
        Self::Square,
        Self::Cube,
        Self::Reciprocal,
        Self::Factorial,
        Self::Exp,
        Self::Pi,
        Self::E,
    ];

    /// Symbol used in history entries, e.g. `sin⁻¹(0.5)`
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::ArcSin => "sin⁻¹",
            Self::ArcCos => "cos⁻¹",
            Self::ArcTan => "tan⁻¹",
            Self::Log10 => "log",
            Self::Ln => "ln",
            Self::Sqrt => "√",
            Self::Square => "x²",
            Self::Cube => "x³",
            Self::Reciprocal => "1/",
            Self::Factorial => "fact",
            Self::Exp => "exp",
            Self::Pi => "π",
            Self::E => "e",
        }
    }

    /// True for the constants, which ignore the display
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Pi | Self::E)
    }

    /// The SHIFT variant of a trig function; other functions are unchanged
    #[must_use]
    pub const fn shifted(self) -> Self {
        match self {
            Self::Sin => Self::ArcSin,
            Self::Cos => Self::ArcCos,
            Self::Tan => Self::ArcTan,
            other => other,
        }
    }

    /// Evaluates the function.
    ///
    /// `input` is ignored by the constants. Trig inputs and inverse-trig
    /// outputs follow `angle_mode`.
    pub fn apply(self, input: f64, angle_mode: AngleMode) -> CalcResult<f64> {
        let result = match self {
            Self::Sin => angle_mode.to_radians(input).sin(),
            Self::Cos => angle_mode.to_radians(input).cos(),
            Self::Tan => angle_mode.to_radians(input).tan(),
            Self::ArcSin => angle_mode.from_radians(input.asin()),
            Self::ArcCos => angle_mode.from_radians(input.acos()),
            Self::ArcTan => angle_mode.from_radians(input.atan()),
            Self::Log10 => input.log10(),
            Self::Ln => input.ln(),
            Self::Sqrt => input.sqrt(),
            Self::Square => input.powi(2),
            Self::Cube => input.powi(3),
            Self::Reciprocal => 1.0 / input,
            Self::Factorial => factorial(input)?,
            Self::Exp => input.exp(),
            Self::Pi => PI,
            Self::E => E,
        };
        check_finite(result)
    }
}

impl std::fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// n! for non-negative integers
fn factorial(n: f64) -> CalcResult<f64> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(CalcError::FactorialDomain(n.to_string()));
    }
    if n > MAX_FACTORIAL {
        return Err(CalcError::NonFinite);
    }
    Ok((2..=n as u32).fold(1.0, |acc, k| acc * f64::from(k)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ===== AngleMode =====

    #[test]
    fn test_angle_mode_labels() {
        assert_eq!(AngleMode::Degrees.as_str(), "DEG");
        assert_eq!(AngleMode::Radians.to_string(), "RAD");
        assert_eq!(AngleMode::parse("RAD"), Some(AngleMode::Radians));
        assert_eq!(AngleMode::parse("deg"), None);
    }

    #[test]
    fn test_angle_mode_default_and_toggle() {
        assert_eq!(AngleMode::default(), AngleMode::Degrees);
        assert_eq!(AngleMode::Degrees.toggled(), AngleMode::Radians);
        assert_eq!(AngleMode::Radians.toggled(), AngleMode::Degrees);
    }

    #[test]
    fn test_angle_mode_serde_uses_labels() {
        let json = serde_json::to_string(&AngleMode::Radians).unwrap();
        assert_eq!(json, "\"RAD\"");
        let parsed: AngleMode = serde_json::from_str("\"DEG\"").unwrap();
        assert_eq!(parsed, AngleMode::Degrees);
    }

    // ===== Trigonometry =====

    #[test]
    fn test_sin_degrees() {
        let v = ScientificFunction::Sin.apply(30.0, AngleMode::Degrees).unwrap();
        assert!(close(v, 0.5));
    }

    #[test]
    fn test_sin_radians() {
        let v = ScientificFunction::Sin
            .apply(PI / 2.0, AngleMode::Radians)
            .unwrap();
        assert!(close(v, 1.0));
    }

    #[test]
    fn test_cos_and_tan_degrees() {
        let c = ScientificFunction::Cos.apply(60.0, AngleMode::Degrees).unwrap();
        let t = ScientificFunction::Tan.apply(45.0, AngleMode::Degrees).unwrap();
        assert!(close(c, 0.5));
        assert!(close(t, 1.0));
    }

    #[test]
    fn test_inverse_trig_degrees() {
        let a = ScientificFunction::ArcSin.apply(0.5, AngleMode::Degrees).unwrap();
        let b = ScientificFunction::ArcCos.apply(0.5, AngleMode::Degrees).unwrap();
        let c = ScientificFunction::ArcTan.apply(1.0, AngleMode::Degrees).unwrap();
        assert!(close(a, 30.0));
        assert!(close(b, 60.0));
        assert!(close(c, 45.0));
    }

    #[test]
    fn test_inverse_trig_radians() {
        let v = ScientificFunction::ArcTan.apply(1.0, AngleMode::Radians).unwrap();
        assert!(close(v, PI / 4.0));
    }

    #[test]
    fn test_arcsin_out_of_domain() {
        assert_eq!(
            ScientificFunction::ArcSin.apply(2.0, AngleMode::Degrees),
            Err(CalcError::NonFinite)
        );
    }

    // ===== Logs, powers, roots =====

    #[test]
    fn test_logs() {
        let f = AngleMode::Degrees;
        assert!(close(ScientificFunction::Log10.apply(1000.0, f).unwrap(), 3.0));
        assert!(close(ScientificFunction::Ln.apply(E, f).unwrap(), 1.0));
        assert_eq!(
            ScientificFunction::Log10.apply(0.0, f),
            Err(CalcError::NonFinite)
        );
    }

    #[test]
    fn test_roots_and_powers() {
        let f = AngleMode::Degrees;
        assert_eq!(ScientificFunction::Sqrt.apply(81.0, f), Ok(9.0));
        assert_eq!(ScientificFunction::Square.apply(-4.0, f), Ok(16.0));
        assert_eq!(ScientificFunction::Cube.apply(3.0, f), Ok(27.0));
        assert_eq!(
            ScientificFunction::Sqrt.apply(-1.0, f),
            Err(CalcError::NonFinite)
        );
    }

    #[test]
    fn test_reciprocal_and_exp() {
        let f = AngleMode::Radians;
        assert_eq!(ScientificFunction::Reciprocal.apply(4.0, f), Ok(0.25));
        assert_eq!(
            ScientificFunction::Reciprocal.apply(0.0, f),
            Err(CalcError::NonFinite)
        );
        assert_eq!(ScientificFunction::Exp.apply(0.0, f), Ok(1.0));
    }

    // ===== Factorial =====

    #[test]
    fn test_factorial_values() {
        let f = AngleMode::Degrees;
        assert_eq!(ScientificFunction::Factorial.apply(0.0, f), Ok(1.0));
        assert_eq!(ScientificFunction::Factorial.apply(1.0, f), Ok(1.0));
        assert_eq!(ScientificFunction::Factorial.apply(5.0, f), Ok(120.0));
        assert_eq!(ScientificFunction::Factorial.apply(10.0, f), Ok(3_628_800.0));
    }

    #[test]
    fn test_factorial_domain_errors() {
        let f = AngleMode::Degrees;
        assert!(matches!(
            ScientificFunction::Factorial.apply(-1.0, f),
            Err(CalcError::FactorialDomain(_))
        ));
        assert!(matches!(
            ScientificFunction::Factorial.apply(2.5, f),
            Err(CalcError::FactorialDomain(_))
        ));
    }

    #[test]
    fn test_factorial_overflow() {
        let f = AngleMode::Degrees;
        assert!(ScientificFunction::Factorial.apply(170.0, f).is_ok());
        assert_eq!(
            ScientificFunction::Factorial.apply(171.0, f),
            Err(CalcError::NonFinite)
        );
    }

    // ===== Constants and metadata =====

    #[test]
    fn test_constants_ignore_input() {
        assert_eq!(ScientificFunction::Pi.apply(f64::NAN, AngleMode::Degrees), Ok(PI));
        assert_eq!(ScientificFunction::E.apply(123.0, AngleMode::Radians), Ok(E));
        assert!(ScientificFunction::Pi.is_constant());
        assert!(!ScientificFunction::Sqrt.is_constant());
    }

    #[test]
    fn test_shifted_trig() {
        assert_eq!(ScientificFunction::Sin.shifted(), ScientificFunction::ArcSin);
        assert_eq!(ScientificFunction::Cos.shifted(), ScientificFunction::ArcCos);
        assert_eq!(ScientificFunction::Tan.shifted(), ScientificFunction::ArcTan);
        assert_eq!(ScientificFunction::Log10.shifted(), ScientificFunction::Log10);
    }

    #[test]
    fn test_symbols_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for f in ScientificFunction::ALL {
            assert!(seen.insert(f.symbol()), "duplicate symbol {}", f.symbol());
        }
    }
}
