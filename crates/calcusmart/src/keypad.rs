//! Button grids for both calculator modes
//!
//! A keypad is pure data: every button carries the [`Key`] it presses, an
//! element id for click routing, and its place in the grid. The scientific
//! keypad also has two toggle controls above the grid (SHIFT and DEG/RAD)
//! that change session settings instead of pressing a key.

use crate::core::{Key, Operator, ScientificFunction};
use crate::mode::CalculatorMode;

/// A single keypad button definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButtonDef {
    /// The key this button presses
    pub action: Key,
    /// Element ID used to route clicks
    pub id: String,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
    /// Number of columns the button covers
    pub span: usize,
}

impl KeypadButtonDef {
    /// Creates a one-column button
    #[must_use]
    pub fn new(action: Key, row: usize, col: usize) -> Self {
        Self {
            id: button_id(action),
            action,
            row,
            col,
            span: 1,
        }
    }

    /// Widens the button to cover `span` columns
    #[must_use]
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span.max(1);
        self
    }

    /// Caption, taking SHIFT into account for the trig buttons
    #[must_use]
    pub fn label(&self, shift: bool) -> String {
        self.key(shift).label()
    }

    /// The key pressed by this button under the given SHIFT state
    #[must_use]
    pub fn key(&self, shift: bool) -> Key {
        match self.action {
            Key::Function(f) if shift => Key::Function(f.shifted()),
            other => other,
        }
    }

    fn covers(&self, row: usize, col: usize) -> bool {
        self.row == row && col >= self.col && col < self.col + self.span
    }
}

/// Element ID for a key's button
#[must_use]
pub fn button_id(key: Key) -> String {
    let name = match key {
        Key::Digit(d) => return format!("btn-{d}"),
        Key::Decimal => "decimal",
        Key::Operator(op) => match op {
            Operator::Add => "plus",
            Operator::Subtract => "minus",
            Operator::Multiply => "times",
            Operator::Divide => "divide",
            Operator::Percent => "percent",
            Operator::Power => "power",
        },
        Key::Function(f) => match f {
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::ArcSin => "asin",
            ScientificFunction::ArcCos => "acos",
            ScientificFunction::ArcTan => "atan",
            ScientificFunction::Log10 => "log",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Sqrt => "sqrt",
            ScientificFunction::Square => "square",
            ScientificFunction::Cube => "cube",
            ScientificFunction::Reciprocal => "reciprocal",
            ScientificFunction::Factorial => "factorial",
            ScientificFunction::Exp => "exp",
            ScientificFunction::Pi => "pi",
            ScientificFunction::E => "e",
        },
        Key::Equals => "equals",
        Key::ClearAll => "clear",
        Key::ClearEntry => "clear-entry",
        Key::Backspace => "backspace",
        Key::ToggleSign => "sign",
        Key::MemoryStore => "ms",
        Key::MemoryRecall => "mr",
        Key::MemoryAdd => "mplus",
        Key::MemoryClear => "mc",
    };
    format!("btn-{name}")
}

/// Setting toggles that sit outside the key grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadControl {
    /// SHIFT: swaps sin/cos/tan for their inverses
    Shift,
    /// DEG/RAD switch
    AngleToggle,
}

impl KeypadControl {
    /// Element ID of the control
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Shift => "btn-shift",
            Self::AngleToggle => "btn-angle",
        }
    }
}

/// Keypad layout for one calculator mode
///
/// Standard:
/// ```text
/// [MC] [MR] [M+] [MS]
/// [AC] [CE] [ % ] [ ÷ ]
/// [ 7 ] [ 8 ] [ 9 ] [ × ]
/// [ 4 ] [ 5 ] [ 6 ] [ - ]
/// [ 1 ] [ 2 ] [ 3 ] [ + ]
/// [ ± ] [ 0 ] [ . ] [ = ]
/// ```
///
/// Scientific:
/// ```text
/// [sin] [cos] [tan] [ π ] [ e ]
/// [log] [ ln] [ √ ] [ x²] [ x³]
/// [MC ] [MR ] [M+ ] [MS ] [ n!]
/// [AC ] [CE ] [ % ] [ ÷ ] [ ⌫ ]
/// [ 7 ] [ 8 ] [ 9 ] [ × ] [ ^ ]
/// [ 4 ] [ 5 ] [ 6 ] [ - ] [1/x]
/// [ 1 ] [ 2 ] [ 3 ] [ + ] [exp]
/// [ ± ] [ 0 ] [ . ] [    =    ]
/// ```
#[derive(Debug, Clone)]
pub struct Keypad {
    mode: CalculatorMode,
    buttons: Vec<KeypadButtonDef>,
    controls: Vec<KeypadControl>,
    cols: usize,
    rows: usize,
}

impl Keypad {
    /// Keypad for the given mode
    #[must_use]
    pub fn for_mode(mode: CalculatorMode) -> Self {
        match mode {
            CalculatorMode::Standard => Self::standard(),
            CalculatorMode::Scientific => Self::scientific(),
        }
    }

    /// The 4-column standard keypad
    #[must_use]
    pub fn standard() -> Self {
        let op = Key::Operator;
        let grid: [[Key; 4]; 6] = [
            [Key::MemoryClear, Key::MemoryRecall, Key::MemoryAdd, Key::MemoryStore],
            [
                Key::ClearAll,
                Key::ClearEntry,
                op(Operator::Percent),
                op(Operator::Divide),
            ],
            [Key::Digit(7), Key::Digit(8), Key::Digit(9), op(Operator::Multiply)],
            [Key::Digit(4), Key::Digit(5), Key::Digit(6), op(Operator::Subtract)],
            [Key::Digit(1), Key::Digit(2), Key::Digit(3), op(Operator::Add)],
            [Key::ToggleSign, Key::Digit(0), Key::Decimal, Key::Equals],
        ];
        let buttons = grid
            .iter()
            .enumerate()
            .flat_map(|(row, keys)| {
                keys.iter()
                    .enumerate()
                    .map(move |(col, key)| KeypadButtonDef::new(*key, row, col))
            })
            .collect();

        Self {
            mode: CalculatorMode::Standard,
            buttons,
            controls: Vec::new(),
            cols: 4,
            rows: 6,
        }
    }

    /// The 5-column scientific keypad
    #[must_use]
    pub fn scientific() -> Self {
        use ScientificFunction as F;
        let op = Key::Operator;
        let func = Key::Function;
        let grid: [[Key; 5]; 7] = [
            [func(F::Sin), func(F::Cos), func(F::Tan), func(F::Pi), func(F::E)],
            [func(F::Log10), func(F::Ln), func(F::Sqrt), func(F::Square), func(F::Cube)],
            [
                Key::MemoryClear,
                Key::MemoryRecall,
                Key::MemoryAdd,
                Key::MemoryStore,
                func(F::Factorial),
            ],
            [
                Key::ClearAll,
                Key::ClearEntry,
                op(Operator::Percent),
                op(Operator::Divide),
                Key::Backspace,
            ],
            [
                Key::Digit(7),
                Key::Digit(8),
                Key::Digit(9),
                op(Operator::Multiply),
                op(Operator::Power),
            ],
            [
                Key::Digit(4),
                Key::Digit(5),
                Key::Digit(6),
                op(Operator::Subtract),
                func(F::Reciprocal),
            ],
            [
                Key::Digit(1),
                Key::Digit(2),
                Key::Digit(3),
                op(Operator::Add),
                func(F::Exp),
            ],
        ];
        let mut buttons: Vec<KeypadButtonDef> = grid
            .iter()
            .enumerate()
            .flat_map(|(row, keys)| {
                keys.iter()
                    .enumerate()
                    .map(move |(col, key)| KeypadButtonDef::new(*key, row, col))
            })
            .collect();
        // Row 7: ± 0 . with a double-width =
        buttons.push(KeypadButtonDef::new(Key::ToggleSign, 7, 0));
        buttons.push(KeypadButtonDef::new(Key::Digit(0), 7, 1));
        buttons.push(KeypadButtonDef::new(Key::Decimal, 7, 2));
        buttons.push(KeypadButtonDef::new(Key::Equals, 7, 3).with_span(2));

        Self {
            mode: CalculatorMode::Scientific,
            buttons,
            controls: vec![KeypadControl::Shift, KeypadControl::AngleToggle],
            cols: 5,
            rows: 8,
        }
    }

    /// Mode this keypad belongs to
    #[must_use]
    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Gets all button definitions
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButtonDef] {
        &self.buttons
    }

    /// Setting toggles shown above the grid
    #[must_use]
    pub fn controls(&self) -> &[KeypadControl] {
        &self.controls
    }

    /// Gets the button covering a grid cell
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButtonDef> {
        if row < self.rows && col < self.cols {
            self.buttons.iter().find(|b| b.covers(row, col))
        } else {
            None
        }
    }

    /// Finds a button by element ID
    #[must_use]
    pub fn find_button_by_id(&self, id: &str) -> Option<&KeypadButtonDef> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Finds a setting control by element ID
    #[must_use]
    pub fn find_control_by_id(&self, id: &str) -> Option<KeypadControl> {
        self.controls.iter().copied().find(|c| c.id() == id)
    }

    /// Processes a button click and returns the key it presses
    #[must_use]
    pub fn handle_click(&self, element_id: &str, shift: bool) -> Option<Key> {
        self.find_button_by_id(element_id).map(|btn| btn.key(shift))
    }

    /// All element IDs, controls first
    #[must_use]
    pub fn element_ids(&self) -> Vec<String> {
        self.controls
            .iter()
            .map(|c| c.id().to_string())
            .chain(self.buttons.iter().map(|b| b.id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // ===== KeypadButtonDef tests =====

    #[test]
    fn test_button_def_new_digit() {
        let btn = KeypadButtonDef::new(Key::Digit(5), 1, 1);
        assert_eq!(btn.id, "btn-5");
        assert_eq!(btn.row, 1);
        assert_eq!(btn.col, 1);
        assert_eq!(btn.span, 1);
    }

    #[test]
    fn test_button_ids() {
        assert_eq!(button_id(Key::Operator(Operator::Add)), "btn-plus");
        assert_eq!(button_id(Key::Operator(Operator::Divide)), "btn-divide");
        assert_eq!(button_id(Key::Function(ScientificFunction::Sqrt)), "btn-sqrt");
        assert_eq!(button_id(Key::MemoryAdd), "btn-mplus");
        assert_eq!(button_id(Key::ClearAll), "btn-clear");
        assert_eq!(button_id(Key::Equals), "btn-equals");
    }

    #[test]
    fn test_span_is_at_least_one() {
        let btn = KeypadButtonDef::new(Key::Equals, 0, 0).with_span(0);
        assert_eq!(btn.span, 1);
    }

    #[test]
    fn test_shifted_label() {
        let sin = KeypadButtonDef::new(Key::Function(ScientificFunction::Sin), 0, 0);
        assert_eq!(sin.label(false), "sin");
        assert_eq!(sin.label(true), "sin⁻¹");
        let seven = KeypadButtonDef::new(Key::Digit(7), 0, 0);
        assert_eq!(seven.label(true), "7");
    }

    // ===== Standard keypad tests =====

    #[test]
    fn test_standard_dimensions() {
        let keypad = Keypad::standard();
        assert_eq!(keypad.dimensions(), (6, 4));
        assert_eq!(keypad.button_count(), 24);
        assert!(keypad.controls().is_empty());
    }

    #[test]
    fn test_standard_layout() {
        let keypad = Keypad::standard();
        let label = |r, c| keypad.get_button_at(r, c).unwrap().label(false);
        assert_eq!(label(0, 0), "MC");
        assert_eq!(label(0, 3), "MS");
        assert_eq!(label(1, 0), "AC");
        assert_eq!(label(1, 3), "÷");
        assert_eq!(label(2, 3), "×");
        assert_eq!(label(5, 0), "±");
        assert_eq!(label(5, 3), "=");
        assert!(keypad.get_button_at(6, 0).is_none());
        assert!(keypad.get_button_at(0, 4).is_none());
    }

    #[test]
    fn test_standard_has_no_backspace_or_power() {
        let keypad = Keypad::standard();
        assert!(keypad.find_button_by_id("btn-backspace").is_none());
        assert!(keypad.find_button_by_id("btn-power").is_none());
    }

    #[test]
    fn test_standard_keys_supported_by_mode() {
        let keypad = Keypad::standard();
        for btn in keypad.buttons() {
            assert!(CalculatorMode::Standard.supports(btn.action));
        }
    }

    // ===== Scientific keypad tests =====

    #[test]
    fn test_scientific_dimensions() {
        let keypad = Keypad::scientific();
        assert_eq!(keypad.dimensions(), (8, 5));
        assert_eq!(keypad.button_count(), 39);
        assert_eq!(keypad.controls().len(), 2);
    }

    #[test]
    fn test_scientific_layout() {
        let keypad = Keypad::scientific();
        let label = |r, c| keypad.get_button_at(r, c).unwrap().label(false);
        assert_eq!(label(0, 0), "sin");
        assert_eq!(label(0, 3), "π");
        assert_eq!(label(1, 2), "√");
        assert_eq!(label(2, 4), "n!");
        assert_eq!(label(3, 4), "⌫");
        assert_eq!(label(4, 4), "^");
        assert_eq!(label(5, 4), "1/x");
        assert_eq!(label(6, 4), "exp");
    }

    #[test]
    fn test_scientific_equals_spans_two_columns() {
        let keypad = Keypad::scientific();
        let a = keypad.get_button_at(7, 3).unwrap();
        let b = keypad.get_button_at(7, 4).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.action, Key::Equals);
        assert_eq!(a.span, 2);
    }

    #[test]
    fn test_scientific_shift_click() {
        let keypad = Keypad::scientific();
        assert_eq!(
            keypad.handle_click("btn-cos", true),
            Some(Key::Function(ScientificFunction::ArcCos))
        );
        assert_eq!(
            keypad.handle_click("btn-cos", false),
            Some(Key::Function(ScientificFunction::Cos))
        );
        assert_eq!(
            keypad.handle_click("btn-log", true),
            Some(Key::Function(ScientificFunction::Log10))
        );
    }

    #[test]
    fn test_scientific_controls() {
        let keypad = Keypad::scientific();
        assert_eq!(keypad.find_control_by_id("btn-shift"), Some(KeypadControl::Shift));
        assert_eq!(
            keypad.find_control_by_id("btn-angle"),
            Some(KeypadControl::AngleToggle)
        );
        assert_eq!(Keypad::standard().find_control_by_id("btn-shift"), None);
    }

    // ===== Shared tests =====

    #[test]
    fn test_ids_unique() {
        for mode in CalculatorMode::ALL {
            let ids = Keypad::for_mode(mode).element_ids();
            let unique: HashSet<_> = ids.iter().collect();
            assert_eq!(ids.len(), unique.len(), "duplicate id in {mode} keypad");
        }
    }

    #[test]
    fn test_every_cell_covered() {
        for mode in CalculatorMode::ALL {
            let keypad = Keypad::for_mode(mode);
            let (rows, cols) = keypad.dimensions();
            for r in 0..rows {
                for c in 0..cols {
                    assert!(keypad.get_button_at(r, c).is_some(), "{mode} ({r},{c})");
                }
            }
        }
    }

    #[test]
    fn test_unknown_click() {
        assert_eq!(Keypad::standard().handle_click("btn-nope", false), None);
    }
}
