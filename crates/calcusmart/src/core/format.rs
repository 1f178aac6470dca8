//! Display formatting for results

use crate::core::ERROR_TOKEN;
use serde::{Deserialize, Serialize};

/// Decimal places offered by the precision selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DecimalPlaces {
    /// Two places
    Two,
    /// Four places
    #[default]
    Four,
    /// Six places
    Six,
    /// Eight places
    Eight,
}

impl DecimalPlaces {
    /// Every selectable precision, in selector order
    pub const ALL: [DecimalPlaces; 4] = [Self::Two, Self::Four, Self::Six, Self::Eight];

    /// Number of places after the decimal point
    #[must_use]
    pub const fn get(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Six => 6,
            Self::Eight => 8,
        }
    }

    /// Maps a place count to a selectable precision
    #[must_use]
    pub const fn from_places(places: u8) -> Option<Self> {
        match places {
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            6 => Some(Self::Six),
            8 => Some(Self::Eight),
            _ => None,
        }
    }
}

impl TryFrom<u8> for DecimalPlaces {
    type Error = String;

    fn try_from(places: u8) -> Result<Self, Self::Error> {
        Self::from_places(places).ok_or_else(|| format!("unsupported decimal places: {places}"))
    }
}

impl From<DecimalPlaces> for u8 {
    fn from(places: DecimalPlaces) -> Self {
        places.get() as u8
    }
}

/// Number formatter used for results shown in the display and history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberFormat {
    /// Precision for non-integer results
    pub decimal_places: DecimalPlaces,
}

impl NumberFormat {
    /// Creates a formatter with the given precision
    #[must_use]
    pub const fn new(decimal_places: DecimalPlaces) -> Self {
        Self { decimal_places }
    }

    /// Formats a result.
    ///
    /// Integers print without a decimal point; other values are rounded to
    /// the configured places with trailing zeros removed. NaN and infinities
    /// print as the error token.
    #[must_use]
    pub fn format(&self, n: f64) -> String {
        if !n.is_finite() {
            return ERROR_TOKEN.to_string();
        }
        if n.fract() == 0.0 {
            return normalize_zero(format!("{}", n));
        }
        let fixed = format!("{:.*}", self.decimal_places.get(), n);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        normalize_zero(trimmed.to_string())
    }
}

/// Renders a value as editable display text (shortest round-trip form)
#[must_use]
pub fn to_buffer_text(n: f64) -> String {
    if n.is_finite() {
        normalize_zero(format!("{}", n))
    } else {
        ERROR_TOKEN.to_string()
    }
}

fn normalize_zero(s: String) -> String {
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}
