//! Engine-level key actions

use crate::core::{Operator, ScientificFunction};
use serde::{Deserialize, Serialize};

/// One key press as seen by the engine.
///
/// Keypad buttons and keyboard events both resolve to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Digit 0-9
    Digit(u8),
    /// Decimal point
    Decimal,
    /// Binary operator
    Operator(Operator),
    /// Unary scientific function or constant
    Function(ScientificFunction),
    /// Resolve the pending operation
    Equals,
    /// Reset entry, pending operation and last result
    ClearAll,
    /// Reset the entry only
    ClearEntry,
    /// Delete the last typed character
    Backspace,
    /// Negate the entry
    ToggleSign,
    /// MS
    MemoryStore,
    /// MR
    MemoryRecall,
    /// M+
    MemoryAdd,
    /// MC
    MemoryClear,
}

impl Key {
    /// Button caption for this key
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::Function(f) => function_label(*f).to_string(),
            Self::Equals => "=".to_string(),
            Self::ClearAll => "AC".to_string(),
            Self::ClearEntry => "CE".to_string(),
            Self::Backspace => "⌫".to_string(),
            Self::ToggleSign => "±".to_string(),
            Self::MemoryStore => "MS".to_string(),
            Self::MemoryRecall => "MR".to_string(),
            Self::MemoryAdd => "M+".to_string(),
            Self::MemoryClear => "MC".to_string(),
        }
    }

    /// Character typed into the entry, for digit and decimal keys
    #[must_use]
    pub fn to_char(&self) -> Option<char> {
        match self {
            Self::Digit(d) if *d <= 9 => char::from_digit(u32::from(*d), 10),
            Self::Decimal => Some('.'),
            _ => None,
        }
    }
}

/// Keypad captions differ from the history symbols for a few functions
const fn function_label(f: ScientificFunction) -> &'static str {
    match f {
        ScientificFunction::Reciprocal => "1/x",
        ScientificFunction::Factorial => "n!",
        other => other.symbol(),
    }
}
