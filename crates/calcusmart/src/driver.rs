//! Unified calculator drivers
//!
//! Behaviour is written once against [`CalculatorDriver`] and run through
//! every input surface: [`KeypadDriver`] clicks buttons by element id and
//! [`KeyboardDriver`] sends key names. Both end up in the same session, so a
//! divergence between them is a routing bug.

use crate::core::{Key, Operator, ScientificFunction, ERROR_TOKEN};
use crate::input::KeyboardMap;
use crate::keypad::KeypadControl;
use crate::mode::CalculatorMode;
use crate::session::CalculatorApp;
use thiserror::Error;

/// Result type for driver interactions
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised when a driver cannot deliver a key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The surface has no way to press this key in the current mode
    #[error("{key:?} has no {surface} binding in {mode} mode")]
    Unbound {
        /// The key that could not be delivered
        key: Key,
        /// `keypad` or `keyboard`
        surface: &'static str,
        /// Mode at the time of the press
        mode: CalculatorMode,
    },
}

/// Abstract driver trait for calculator interactions
pub trait CalculatorDriver {
    /// Presses keys in order through this driver's input surface
    fn press_sequence(&mut self, keys: &[Key]) -> DriverResult<()>;

    /// Current display text
    fn display(&self) -> String;

    /// Current pending-expression text
    fn expression(&self) -> String;

    /// Whether the memory indicator is lit
    fn memory_indicator(&self) -> bool;

    /// History entries (newest first)
    fn history(&self) -> Vec<HistoryItem>;

    /// Clears entry, pending operation and last result
    fn clear(&mut self);

    /// Switches calculator mode
    fn switch_mode(&mut self, mode: CalculatorMode);
}

/// A simplified history item for driver results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    /// What was computed
    pub expression: String,
    /// The formatted result
    pub result: String,
}

fn history_items(app: &CalculatorApp) -> Vec<HistoryItem> {
    app.history()
        .iter()
        .map(|entry| HistoryItem {
            expression: entry.expression.clone(),
            result: entry.result.clone(),
        })
        .collect()
}

/// Driver that clicks keypad buttons
#[derive(Debug, Default)]
pub struct KeypadDriver {
    app: CalculatorApp,
}

impl KeypadDriver {
    /// Creates a keypad driver over a fresh session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a keypad driver over an existing session
    #[must_use]
    pub fn with_app(app: CalculatorApp) -> Self {
        Self { app }
    }

    /// Returns a reference to the underlying session
    #[must_use]
    pub fn app(&self) -> &CalculatorApp {
        &self.app
    }

    fn press(&mut self, key: Key) -> DriverResult<()> {
        let shift = self.app.shift();
        let keypad = self.app.keypad();

        if let Some(btn) = keypad.buttons().iter().find(|b| b.key(shift) == key) {
            let id = btn.id.clone();
            self.app.click(&id);
            return Ok(());
        }

        // Reachable only with SHIFT flipped, e.g. sin⁻¹
        let has_shift = keypad.controls().contains(&KeypadControl::Shift);
        if let Some(btn) = keypad.buttons().iter().find(|b| b.key(!shift) == key) {
            if has_shift {
                let id = btn.id.clone();
                self.app.click(KeypadControl::Shift.id());
                self.app.click(&id);
                self.app.click(KeypadControl::Shift.id());
                return Ok(());
            }
        }

        Err(DriverError::Unbound {
            key,
            surface: "keypad",
            mode: self.app.mode(),
        })
    }
}

impl CalculatorDriver for KeypadDriver {
    fn press_sequence(&mut self, keys: &[Key]) -> DriverResult<()> {
        keys.iter().try_for_each(|key| self.press(*key))
    }

    fn display(&self) -> String {
        self.app.view().buffer
    }

    fn expression(&self) -> String {
        self.app.view().expression
    }

    fn memory_indicator(&self) -> bool {
        self.app.view().memory_indicator
    }

    fn history(&self) -> Vec<HistoryItem> {
        history_items(&self.app)
    }

    fn clear(&mut self) {
        self.app.click("btn-clear");
    }

    fn switch_mode(&mut self, mode: CalculatorMode) {
        self.app.switch_mode(mode);
    }
}

/// Driver that sends keyboard events
#[derive(Debug, Default)]
pub struct KeyboardDriver {
    app: CalculatorApp,
}

impl KeyboardDriver {
    /// Creates a keyboard driver over a fresh session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a keyboard driver over an existing session
    #[must_use]
    pub fn with_app(app: CalculatorApp) -> Self {
        Self { app }
    }

    /// Returns a reference to the underlying session
    #[must_use]
    pub fn app(&self) -> &CalculatorApp {
        &self.app
    }

    fn press(&mut self, key: Key) -> DriverResult<()> {
        let map = KeyboardMap::for_mode(self.app.mode());
        match map.bound_names().into_iter().find(|n| map.map(n) == Some(key)) {
            Some(name) => {
                self.app.key_down(name);
                Ok(())
            }
            None => Err(DriverError::Unbound {
                key,
                surface: "keyboard",
                mode: self.app.mode(),
            }),
        }
    }
}

impl CalculatorDriver for KeyboardDriver {
    fn press_sequence(&mut self, keys: &[Key]) -> DriverResult<()> {
        keys.iter().try_for_each(|key| self.press(*key))
    }

    fn display(&self) -> String {
        self.app.view().buffer
    }

    fn expression(&self) -> String {
        self.app.view().expression
    }

    fn memory_indicator(&self) -> bool {
        self.app.view().memory_indicator
    }

    fn history(&self) -> Vec<HistoryItem> {
        history_items(&self.app)
    }

    fn clear(&mut self) {
        self.app.key_down("Escape");
    }

    fn switch_mode(&mut self, mode: CalculatorMode) {
        self.app.switch_mode(mode);
    }
}

// ===== Unified behaviour checks =====
// These work with ANY CalculatorDriver implementation

/// Parses a compact key script such as `"12+3="`.
///
/// Digits, `.`, `+ - * / % ^` and `=` map to their keys; `C` is clear-all
/// and `<` is backspace. Other characters are skipped.
#[must_use]
pub fn keys(script: &str) -> Vec<Key> {
    script
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => c.to_digit(10).map(|d| Key::Digit(d as u8)),
            '.' => Some(Key::Decimal),
            '=' => Some(Key::Equals),
            'C' => Some(Key::ClearAll),
            '<' => Some(Key::Backspace),
            other => Operator::from_char(other).map(Key::Operator),
        })
        .collect()
}

/// Add, subtract, multiply and divide
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    for (script, expected) in [("2+3=", "5"), ("10-4=", "6"), ("6*7=", "42"), ("20/4=", "5")] {
        driver.clear();
        driver.press_sequence(&keys(script))?;
        assert_eq!(driver.display(), expected, "{script}");
    }
    driver.clear();
    Ok(())
}

/// Operators apply left to right, each resolving the previous one
pub fn verify_chaining<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.clear();
    driver.press_sequence(&keys("5+3+"))?;
    assert_eq!(driver.expression(), "8 +");
    driver.press_sequence(&keys("2="))?;
    assert_eq!(driver.display(), "10");
    assert_eq!(driver.expression(), "");
    driver.clear();
    Ok(())
}

/// Percent takes a share of the left operand
pub fn verify_percent<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.clear();
    driver.press_sequence(&keys("200%10="))?;
    assert_eq!(driver.display(), "20");
    driver.clear();
    Ok(())
}

/// Power, scientific mode only
pub fn verify_power<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.switch_mode(CalculatorMode::Scientific);
    driver.press_sequence(&keys("2^10="))?;
    assert_eq!(driver.display(), "1024");
    driver.switch_mode(CalculatorMode::Standard);
    Ok(())
}

/// Division by zero shows the error token and drops the pending operation;
/// the next digit starts over
pub fn verify_division_by_zero<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.clear();
    driver.press_sequence(&keys("7/0="))?;
    assert_eq!(driver.display(), ERROR_TOKEN);
    assert_eq!(driver.expression(), "");
    driver.press_sequence(&keys("4"))?;
    assert_eq!(driver.display(), "4");
    driver.clear();
    Ok(())
}

/// Results are rounded to four places by default, integers print bare
pub fn verify_formatting<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.clear();
    driver.press_sequence(&keys("1/3="))?;
    assert_eq!(driver.display(), "0.3333");
    driver.press_sequence(&keys("4/2="))?;
    assert_eq!(driver.display(), "2");
    driver.clear();
    Ok(())
}

/// Only the ten newest calculations are kept, newest first
pub fn verify_history_cap<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.clear();
    for i in 1..=11 {
        driver.press_sequence(&keys(&format!("{i}+0=")))?;
    }
    let history = driver.history();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].expression, "11 + 0");
    assert_eq!(history[9].expression, "2 + 0");
    driver.clear();
    Ok(())
}

/// Backspace never leaves an empty display (scientific keypad has the key)
pub fn verify_backspace<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.switch_mode(CalculatorMode::Scientific);
    driver.press_sequence(&keys("123"))?;
    driver.press_sequence(&keys("<"))?;
    assert_eq!(driver.display(), "12");
    driver.press_sequence(&keys("<<<<"))?;
    assert_eq!(driver.display(), "0");
    driver.press_sequence(&keys("9+1=<"))?;
    assert_eq!(driver.display(), "0");
    driver.switch_mode(CalculatorMode::Standard);
    Ok(())
}

/// Trigonometry in degrees, forward through the keyboard-reachable keys
pub fn verify_trigonometry<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.switch_mode(CalculatorMode::Scientific);
    driver.press_sequence(&keys("30"))?;
    driver.press_sequence(&[Key::Function(ScientificFunction::Sin)])?;
    assert_eq!(driver.display(), "0.5");
    assert_eq!(
        driver.history().first().map(|h| h.expression.as_str()),
        Some("sin(30)")
    );
    driver.switch_mode(CalculatorMode::Standard);
    Ok(())
}

/// Factorial and inverse trig (keypad only)
pub fn verify_keypad_functions<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    let fact = Key::Function(ScientificFunction::Factorial);
    driver.switch_mode(CalculatorMode::Scientific);

    driver.press_sequence(&keys("5"))?;
    driver.press_sequence(&[fact])?;
    assert_eq!(driver.display(), "120");

    driver.press_sequence(&keys("0"))?;
    driver.press_sequence(&[fact])?;
    assert_eq!(driver.display(), "1");

    driver.press_sequence(&keys("2.5"))?;
    driver.press_sequence(&[fact])?;
    assert_eq!(driver.display(), ERROR_TOKEN);

    driver.press_sequence(&keys("1"))?;
    driver.press_sequence(&[Key::ToggleSign, fact])?;
    assert_eq!(driver.display(), ERROR_TOKEN);

    driver.press_sequence(&keys("0.5"))?;
    driver.press_sequence(&[Key::Function(ScientificFunction::ArcSin)])?;
    assert_eq!(driver.display(), "30");

    driver.switch_mode(CalculatorMode::Standard);
    Ok(())
}

/// Memory keys, which survive a mode switch (keypad only)
pub fn verify_memory<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    driver.clear();
    driver.press_sequence(&keys("6"))?;
    driver.press_sequence(&[Key::MemoryAdd])?;
    assert!(driver.memory_indicator());
    driver.press_sequence(&keys("C4"))?;
    driver.press_sequence(&[Key::MemoryAdd])?;

    driver.switch_mode(CalculatorMode::Scientific);
    assert!(driver.memory_indicator());
    driver.press_sequence(&[Key::MemoryRecall])?;
    assert_eq!(driver.display(), "10");

    driver.press_sequence(&[Key::MemoryClear])?;
    assert!(!driver.memory_indicator());
    driver.switch_mode(CalculatorMode::Standard);
    Ok(())
}

/// Everything reachable from the keyboard
pub fn run_keyboard_suite<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    verify_basic_arithmetic(driver)?;
    verify_chaining(driver)?;
    verify_percent(driver)?;
    verify_power(driver)?;
    verify_division_by_zero(driver)?;
    verify_formatting(driver)?;
    verify_history_cap(driver)?;
    verify_backspace(driver)?;
    verify_trigonometry(driver)
}

/// Complete verification suite
pub fn run_full_suite<D: CalculatorDriver>(driver: &mut D) -> DriverResult<()> {
    run_keyboard_suite(driver)?;
    verify_keypad_functions(driver)?;
    verify_memory(driver)
}
