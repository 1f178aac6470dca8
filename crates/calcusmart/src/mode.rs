//! Calculator modes and the key set each one exposes

use crate::core::{Key, Operator, ScientificFunction};
use serde::{Deserialize, Serialize};

/// Which calculator front-end is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorMode {
    /// Four-function calculator with percent and memory
    #[default]
    Standard,
    /// Adds power, trigonometry, logarithms and constants
    Scientific,
}

impl CalculatorMode {
    /// Both modes, in tab order
    pub const ALL: [CalculatorMode; 2] = [Self::Standard, Self::Scientific];

    /// Persisted name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Scientific => "scientific",
        }
    }

    /// Parses a persisted name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::Standard),
            "scientific" => Some(Self::Scientific),
            _ => None,
        }
    }

    /// Binary operators available in this mode
    #[must_use]
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            Self::Standard => &[
                Operator::Add,
                Operator::Subtract,
                Operator::Multiply,
                Operator::Divide,
                Operator::Percent,
            ],
            Self::Scientific => &Operator::ALL,
        }
    }

    /// Scientific functions available in this mode
    #[must_use]
    pub fn functions(&self) -> &'static [ScientificFunction] {
        match self {
            Self::Standard => &[],
            Self::Scientific => &ScientificFunction::ALL,
        }
    }

    /// Returns true if the key belongs to this mode's key set
    #[must_use]
    pub fn supports(&self, key: Key) -> bool {
        match key {
            Key::Operator(op) => self.operators().contains(&op),
            Key::Function(f) => self.functions().contains(&f),
            Key::Digit(d) => d <= 9,
            _ => true,
        }
    }
}

impl std::fmt::Display for CalculatorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
