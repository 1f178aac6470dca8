//! Keyboard bindings
//!
//! Maps `KeyboardEvent.key`-style names (`"7"`, `"Enter"`, `"Escape"`, `"s"`)
//! to engine keys. Scientific mode layers letter mnemonics and the power
//! operator on top of the bindings shared by both modes. SHIFT is a keypad
//! concept and never affects the keyboard.

use crate::core::{Key, Operator, ScientificFunction};
use crate::mode::CalculatorMode;

/// Keyboard map for one calculator mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardMap {
    mode: CalculatorMode,
}

impl KeyboardMap {
    /// Creates the keyboard map for a mode
    #[must_use]
    pub const fn for_mode(mode: CalculatorMode) -> Self {
        Self { mode }
    }

    /// Mode this map belongs to
    #[must_use]
    pub const fn mode(&self) -> CalculatorMode {
        self.mode
    }

    /// Maps a key name to an engine key
    #[must_use]
    pub fn map(&self, name: &str) -> Option<Key> {
        if let Some(key) = Self::map_shared(name) {
            return Some(key);
        }
        match self.mode {
            CalculatorMode::Standard => None,
            CalculatorMode::Scientific => Self::map_scientific(name),
        }
    }

    fn map_shared(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(d) = c.to_digit(10) {
                return Some(Key::Digit(d as u8));
            }
        }
        match name {
            "." => Some(Key::Decimal),
            "+" => Some(Key::Operator(Operator::Add)),
            "-" => Some(Key::Operator(Operator::Subtract)),
            "*" => Some(Key::Operator(Operator::Multiply)),
            "/" => Some(Key::Operator(Operator::Divide)),
            "%" => Some(Key::Operator(Operator::Percent)),
            "Enter" | "=" => Some(Key::Equals),
            "Escape" => Some(Key::ClearAll),
            "Backspace" => Some(Key::Backspace),
            _ => None,
        }
    }

    fn map_scientific(name: &str) -> Option<Key> {
        let f = match name {
            "^" | "p" => return Some(Key::Operator(Operator::Power)),
            "s" => ScientificFunction::Sin,
            "c" => ScientificFunction::Cos,
            "t" => ScientificFunction::Tan,
            "l" => ScientificFunction::Log10,
            "n" => ScientificFunction::Ln,
            "r" => ScientificFunction::Sqrt,
            "q" => ScientificFunction::Square,
            "i" => ScientificFunction::Pi,
            "e" => ScientificFunction::E,
            _ => return None,
        };
        Some(Key::Function(f))
    }

    /// Key names bound in this mode, one per distinct action where possible
    #[must_use]
    pub fn bound_names(&self) -> Vec<&'static str> {
        let mut names = vec![
            "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ".", "+", "-", "*", "/", "%",
            "Enter", "=", "Escape", "Backspace",
        ];
        if self.mode == CalculatorMode::Scientific {
            names.extend(["^", "p", "s", "c", "t", "l", "n", "r", "q", "i", "e"]);
        }
        names
    }
}
