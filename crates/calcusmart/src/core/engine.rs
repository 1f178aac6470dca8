//! The calculator state machine.
//!
//! [`EngineState`] is a plain value. Every key press is one transition on it:
//! either in place through the `&mut self` operations, or functionally
//! through [`EngineState::step`], which leaves the original untouched.
//!
//! Numeric failures never escape as errors. They put the error token in the
//! display, drop the pending operation and lock the display so the next digit
//! starts a fresh entry. The failure is still reported through
//! [`Transition::Failed`] for front-ends that want to show why.

use crate::core::format::to_buffer_text;
use crate::core::history::HistoryEntry;
use crate::core::{
    check_finite, parse_operand, AngleMode, CalcError, Calculator, Key, NumberFormat, Operator,
    ScientificFunction, ERROR_TOKEN, MAX_INPUT_LEN, ZERO_TOKEN,
};
use tracing::debug;

/// Settings the engine reads but does not own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineSettings {
    /// Result formatting
    pub format: NumberFormat,
    /// Unit for the trigonometric functions
    pub angle_mode: AngleMode,
}

/// A binary operation waiting for its right operand
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOperation {
    /// The operator that was pressed
    pub operator: Operator,
    /// Left operand captured when the operator was pressed
    pub left: f64,
    /// Left operand as shown in the expression line
    pub left_text: String,
    /// True until the display changes after the operator was pressed
    pub awaiting_operand: bool,
}

/// Outcome of one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// State changed
    Updated,
    /// The key had no effect in the current state
    Ignored,
    /// A calculation finished and should be recorded in the history
    Completed(HistoryEntry),
    /// A numeric failure put the engine in the error state
    Failed(CalcError),
}

impl Transition {
    /// The finished calculation, if any
    #[must_use]
    pub fn history_entry(&self) -> Option<&HistoryEntry> {
        match self {
            Self::Completed(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns true if the key was ignored
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Calculator state for one mode session
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    display: String,
    pending: Option<PendingOperation>,
    last_result: Option<f64>,
    memory: Option<f64>,
    result_locked: bool,
    last_error: Option<CalcError>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineState {
    /// Creates a cleared state showing `0`
    #[must_use]
    pub fn new() -> Self {
        Self {
            display: ZERO_TOKEN.to_string(),
            pending: None,
            last_result: None,
            memory: None,
            result_locked: false,
            last_error: None,
        }
    }

    /// Creates a cleared state that keeps an existing memory register
    #[must_use]
    pub fn with_memory(memory: Option<f64>) -> Self {
        Self {
            memory,
            ..Self::new()
        }
    }

    // ===== Accessors =====

    /// Current display text
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Pending-expression line, e.g. `12 ×`; empty when nothing is pending
    #[must_use]
    pub fn expression(&self) -> String {
        self.pending
            .as_ref()
            .map(|p| format!("{} {}", p.left_text, p.operator.symbol()))
            .unwrap_or_default()
    }

    /// The operation waiting for a right operand
    #[must_use]
    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    /// Unrounded value of the most recent computation
    #[must_use]
    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    /// Memory register
    #[must_use]
    pub fn memory(&self) -> Option<f64> {
        self.memory
    }

    /// Whether the memory indicator should be lit
    #[must_use]
    pub fn has_memory(&self) -> bool {
        self.memory.is_some()
    }

    /// True when the next digit starts a new entry
    #[must_use]
    pub fn is_result_locked(&self) -> bool {
        self.result_locked
    }

    /// True when the display shows the error token
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.display == ERROR_TOKEN
    }

    /// The failure behind the current error display
    #[must_use]
    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    // ===== Dispatch =====

    /// Pure form of [`EngineState::apply`]: returns the next state
    #[must_use]
    pub fn step(&self, key: Key, settings: &EngineSettings) -> (Self, Transition) {
        let mut next = self.clone();
        let transition = next.apply(key, settings);
        (next, transition)
    }

    /// Runs the operation bound to `key`
    pub fn apply(&mut self, key: Key, settings: &EngineSettings) -> Transition {
        match key {
            Key::Digit(_) | Key::Decimal => match key.to_char() {
                Some(c) => self.input_digit(c),
                None => Transition::Ignored,
            },
            Key::Operator(op) => self.apply_operator(op, &settings.format),
            Key::Function(f) => self.apply_function(f, settings.angle_mode, &settings.format),
            Key::Equals => self.evaluate(&settings.format),
            Key::ClearAll => self.clear_all(),
            Key::ClearEntry => self.clear_entry(),
            Key::Backspace => self.backspace(),
            Key::ToggleSign => self.toggle_sign(),
            Key::MemoryStore => self.memory_store(),
            Key::MemoryRecall => self.memory_recall(),
            Key::MemoryAdd => self.memory_add(),
            Key::MemoryClear => self.memory_clear(),
        }
    }

    // ===== Entry =====

    /// Types a digit or decimal point into the entry
    pub fn input_digit(&mut self, c: char) -> Transition {
        if !(c.is_ascii_digit() || c == '.') {
            return Transition::Ignored;
        }

        if self.result_locked || self.is_error() {
            self.display = if c == '.' {
                "0.".to_string()
            } else {
                c.to_string()
            };
            self.unlock_for_typing();
            return Transition::Updated;
        }

        if c == '.' && self.display.contains('.') {
            return Transition::Ignored;
        }
        if self.display == ZERO_TOKEN && c != '.' {
            self.display = c.to_string();
        } else if self.display.len() < MAX_INPUT_LEN {
            self.display.push(c);
        } else {
            return Transition::Ignored;
        }
        self.unlock_for_typing();
        Transition::Updated
    }

    /// Negates the entry
    pub fn toggle_sign(&mut self) -> Transition {
        let Ok(value) = parse_operand(&self.display) else {
            return Transition::Ignored;
        };
        if value == 0.0 {
            return Transition::Ignored;
        }
        self.display = match self.display.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{}", self.display),
        };
        if let Some(result) = self.last_result {
            self.last_result = Some(-result);
        }
        self.mark_operand_entered();
        Transition::Updated
    }

    /// Deletes the last typed character; after a result, starts fresh
    pub fn backspace(&mut self) -> Transition {
        if self.result_locked || self.is_error() {
            self.display = ZERO_TOKEN.to_string();
            self.result_locked = false;
            self.last_result = None;
            self.last_error = None;
            self.mark_operand_entered();
            return Transition::Updated;
        }

        let len = self.display.chars().count();
        if len <= 1 || (len == 2 && self.display.starts_with('-')) {
            if self.display == ZERO_TOKEN {
                return Transition::Ignored;
            }
            self.display = ZERO_TOKEN.to_string();
        } else {
            self.display.pop();
            // "-0.5" backs up through "-0." to "0", never a signed zero
            if self.display == "-0" {
                self.display = ZERO_TOKEN.to_string();
            }
        }
        self.last_result = None;
        self.mark_operand_entered();
        Transition::Updated
    }

    /// Resets entry, pending operation and last result; memory survives
    pub fn clear_all(&mut self) -> Transition {
        *self = Self::with_memory(self.memory);
        Transition::Updated
    }

    /// Resets the entry only
    pub fn clear_entry(&mut self) -> Transition {
        self.display = ZERO_TOKEN.to_string();
        self.result_locked = false;
        self.last_error = None;
        self.mark_operand_entered();
        Transition::Updated
    }

    // ===== Operations =====

    /// Records a binary operator, resolving a completed pending one first
    pub fn apply_operator(&mut self, op: Operator, format: &NumberFormat) -> Transition {
        let mut completed = None;

        if let Some(pending) = self.pending.as_mut() {
            if pending.awaiting_operand {
                pending.operator = op;
                return Transition::Updated;
            }
            match self.evaluate(format) {
                Transition::Completed(entry) => completed = Some(entry),
                failed @ Transition::Failed(_) => return failed,
                _ => {}
            }
        }

        let (left, left_text) = match self.last_result {
            Some(result) => (result, format.format(result)),
            None => match parse_operand(&self.display) {
                Ok(value) => (value, entry_text(&self.display)),
                Err(err) => {
                    debug!(%err, "left operand unreadable, using 0");
                    (0.0, ZERO_TOKEN.to_string())
                }
            },
        };

        self.pending = Some(PendingOperation {
            operator: op,
            left,
            left_text,
            awaiting_operand: true,
        });
        self.result_locked = true;
        self.last_error = None;

        completed.map_or(Transition::Updated, Transition::Completed)
    }

    /// Resolves the pending operation
    pub fn evaluate(&mut self, format: &NumberFormat) -> Transition {
        let Some(pending) = self.pending.clone() else {
            return Transition::Ignored;
        };
        let right = match parse_operand(&self.display) {
            Ok(value) => value,
            Err(err) => return self.fail(err),
        };

        match Calculator::calculate(pending.left, right, pending.operator) {
            Ok(result) => {
                let text = format.format(result);
                let expression = format!(
                    "{} {} {}",
                    pending.left_text,
                    pending.operator.symbol(),
                    entry_text(&self.display)
                );
                self.show_result(result, text.clone());
                self.pending = None;
                Transition::Completed(HistoryEntry::new(expression, text))
            }
            Err(err) => self.fail(err),
        }
    }

    /// Applies a unary scientific function to the display
    pub fn apply_function(
        &mut self,
        f: ScientificFunction,
        angle_mode: AngleMode,
        format: &NumberFormat,
    ) -> Transition {
        let (input, input_text) = if f.is_constant() {
            (0.0, None)
        } else {
            match parse_operand(&self.display) {
                Ok(value) => (value, Some(entry_text(&self.display))),
                Err(err) => return self.fail(err),
            }
        };

        match f.apply(input, angle_mode) {
            Ok(result) => {
                let text = format.format(result);
                self.show_result(result, text.clone());
                self.mark_operand_entered();
                match input_text {
                    Some(input) => Transition::Completed(HistoryEntry::new(
                        format!("{}({})", f.symbol(), input),
                        text,
                    )),
                    None => Transition::Updated,
                }
            }
            Err(err) => self.fail(err),
        }
    }

    // ===== Memory =====

    /// MS: stores the display in memory
    pub fn memory_store(&mut self) -> Transition {
        match parse_operand(&self.display) {
            Ok(value) => {
                self.memory = Some(value);
                Transition::Updated
            }
            Err(_) => Transition::Ignored,
        }
    }

    /// MR: shows the memory register as a locked result
    pub fn memory_recall(&mut self) -> Transition {
        let Some(value) = self.memory else {
            return Transition::Ignored;
        };
        self.display = to_buffer_text(value);
        self.last_result = Some(value);
        self.result_locked = true;
        self.last_error = None;
        self.mark_operand_entered();
        Transition::Updated
    }

    /// M+: adds the display to memory, or stores it when memory is empty
    pub fn memory_add(&mut self) -> Transition {
        let Some(current) = self.memory else {
            return self.memory_store();
        };
        match parse_operand(&self.display).and_then(|value| check_finite(current + value)) {
            Ok(sum) => {
                self.memory = Some(sum);
                Transition::Updated
            }
            Err(_) => Transition::Ignored,
        }
    }

    /// MC: empties the memory register
    pub fn memory_clear(&mut self) -> Transition {
        if self.memory.take().is_some() {
            Transition::Updated
        } else {
            Transition::Ignored
        }
    }

    // ===== Internals =====

    fn show_result(&mut self, value: f64, text: String) {
        self.display = text;
        self.last_result = Some(value);
        self.result_locked = true;
        self.last_error = None;
    }

    fn fail(&mut self, err: CalcError) -> Transition {
        debug!(%err, display = %self.display, "calculation failed");
        self.display = ERROR_TOKEN.to_string();
        self.pending = None;
        self.last_result = None;
        self.result_locked = true;
        self.last_error = Some(err.clone());
        Transition::Failed(err)
    }

    /// Typing replaces whatever result the display was showing
    fn unlock_for_typing(&mut self) {
        self.result_locked = false;
        self.last_result = None;
        self.last_error = None;
        self.mark_operand_entered();
    }

    fn mark_operand_entered(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            pending.awaiting_operand = false;
        }
    }
}

/// Display text as it appears inside an expression (`3.` reads as `3`)
fn entry_text(display: &str) -> String {
    display.strip_suffix('.').unwrap_or(display).to_string()
}
