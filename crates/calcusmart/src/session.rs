//! Calculator session
//!
//! [`CalculatorApp`] owns everything that outlives a single key press: the
//! engine state of the active mode, the shared history, display settings and
//! the preference store. Front-ends talk to it in their own vocabulary
//! (button ids, key names) and it routes both to the same engine transition.

use crate::core::history::History;
use crate::core::{
    AngleMode, DecimalPlaces, EngineSettings, EngineState, Key, NumberFormat, Transition,
};
use crate::input::KeyboardMap;
use crate::keypad::{Keypad, KeypadControl};
use crate::mode::CalculatorMode;
use crate::preferences::{MemoryPreferences, PreferenceStore, Preferences};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What a front-end renders after each event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySnapshot {
    /// Main display text
    pub buffer: String,
    /// Pending-expression line, empty when nothing is pending
    pub expression: String,
    /// Memory indicator (`M` when the register holds a value)
    pub memory_indicator: bool,
    /// Active calculator mode
    pub mode: CalculatorMode,
    /// Active angle unit
    pub angle_mode: AngleMode,
    /// Active precision
    pub decimal_places: DecimalPlaces,
    /// SHIFT state of the scientific keypad
    pub shift: bool,
}

/// Calculator application state
#[derive(Debug)]
pub struct CalculatorApp<S: PreferenceStore = MemoryPreferences> {
    engine: EngineState,
    history: History,
    format: NumberFormat,
    angle_mode: AngleMode,
    mode: CalculatorMode,
    shift: bool,
    keypad: Keypad,
    keyboard: KeyboardMap,
    store: S,
}

impl Default for CalculatorApp<MemoryPreferences> {
    fn default() -> Self {
        Self::new(MemoryPreferences::new())
    }
}

impl<S: PreferenceStore> CalculatorApp<S> {
    /// Creates a session, restoring mode and angle unit from `store`
    pub fn new(store: S) -> Self {
        let prefs = Preferences::load(&store);
        info!(mode = %prefs.mode, angle_mode = %prefs.angle_mode, "calculator session started");
        Self {
            engine: EngineState::new(),
            history: History::new(),
            format: NumberFormat::default(),
            angle_mode: prefs.angle_mode,
            mode: prefs.mode,
            shift: false,
            keypad: Keypad::for_mode(prefs.mode),
            keyboard: KeyboardMap::for_mode(prefs.mode),
            store,
        }
    }

    // ===== Accessors =====

    /// Returns the engine state of the active mode
    #[must_use]
    pub fn engine(&self) -> &EngineState {
        &self.engine
    }

    /// Returns the shared calculation history
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the active mode
    #[must_use]
    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    /// Returns the active angle unit
    #[must_use]
    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Returns the active precision
    #[must_use]
    pub fn decimal_places(&self) -> DecimalPlaces {
        self.format.decimal_places
    }

    /// Returns the SHIFT state
    #[must_use]
    pub fn shift(&self) -> bool {
        self.shift
    }

    /// Returns the keypad of the active mode
    #[must_use]
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Returns the preference store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Settings passed to every engine transition
    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            format: self.format,
            angle_mode: self.angle_mode,
        }
    }

    /// Render snapshot
    #[must_use]
    pub fn view(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            buffer: self.engine.display().to_string(),
            expression: self.engine.expression(),
            memory_indicator: self.engine.has_memory(),
            mode: self.mode,
            angle_mode: self.angle_mode,
            decimal_places: self.format.decimal_places,
            shift: self.shift,
        }
    }

    // ===== Events =====

    /// Runs one engine transition, if the active mode exposes `key`
    pub fn press(&mut self, key: Key) -> Transition {
        if !self.mode.supports(key) {
            debug!(?key, mode = %self.mode, "key not available in this mode");
            return Transition::Ignored;
        }
        let transition = self.engine.apply(key, &self.settings());
        match &transition {
            Transition::Completed(entry) => {
                debug!(expression = %entry.expression, result = %entry.result, "calculation completed");
                self.history.push(entry.clone());
            }
            Transition::Failed(err) => debug!(%err, "calculation failed"),
            Transition::Updated | Transition::Ignored => {}
        }
        transition
    }

    /// Handles a click on a keypad element of the active mode
    pub fn click(&mut self, element_id: &str) -> Transition {
        if let Some(control) = self.keypad.find_control_by_id(element_id) {
            match control {
                KeypadControl::Shift => self.toggle_shift(),
                KeypadControl::AngleToggle => self.toggle_angle_mode(),
            }
            return Transition::Updated;
        }
        match self.keypad.handle_click(element_id, self.shift) {
            Some(key) => self.press(key),
            None => {
                debug!(element_id, mode = %self.mode, "unknown keypad element");
                Transition::Ignored
            }
        }
    }

    /// Handles a keyboard event by key name
    pub fn key_down(&mut self, name: &str) -> Transition {
        match self.keyboard.map(name) {
            Some(key) => self.press(key),
            None => Transition::Ignored,
        }
    }

    // ===== Settings =====

    /// Switches mode: persists it and starts a fresh engine that keeps memory
    pub fn switch_mode(&mut self, mode: CalculatorMode) {
        info!(from = %self.mode, to = %mode, "switching calculator mode");
        self.mode = mode;
        self.engine = EngineState::with_memory(self.engine.memory());
        self.shift = false;
        self.keypad = Keypad::for_mode(mode);
        self.keyboard = KeyboardMap::for_mode(mode);
        self.persist();
    }

    /// Sets and persists the angle unit
    pub fn set_angle_mode(&mut self, angle_mode: AngleMode) {
        if self.angle_mode != angle_mode {
            info!(%angle_mode, "angle mode changed");
        }
        self.angle_mode = angle_mode;
        self.persist();
    }

    /// Flips between degrees and radians
    pub fn toggle_angle_mode(&mut self) {
        self.set_angle_mode(self.angle_mode.toggled());
    }

    /// Sets the precision used for subsequent results
    pub fn set_decimal_places(&mut self, places: DecimalPlaces) {
        self.format = NumberFormat::new(places);
    }

    /// Flips SHIFT on the scientific keypad
    pub fn toggle_shift(&mut self) {
        self.shift = !self.shift;
    }

    /// Empties the history panel
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn persist(&mut self) {
        let prefs = Preferences {
            mode: self.mode,
            angle_mode: self.angle_mode,
        };
        if let Err(err) = prefs.save(&mut self.store) {
            warn!(%err, "failed to persist preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Operator, ScientificFunction};
    use crate::preferences::{ANGLE_MODE_KEY, MODE_KEY};

    fn app() -> CalculatorApp {
        CalculatorApp::default()
    }

    fn scientific() -> CalculatorApp {
        let mut app = app();
        app.switch_mode(CalculatorMode::Scientific);
        app
    }

    fn click_all(app: &mut CalculatorApp, ids: &[&str]) {
        for id in ids {
            app.click(id);
        }
    }

    fn type_keys(app: &mut CalculatorApp, names: &[&str]) {
        for name in names {
            app.key_down(name);
        }
    }

    // ===== Construction tests =====

    #[test]
    fn test_new_defaults() {
        let app = app();
        assert_eq!(app.mode(), CalculatorMode::Standard);
        assert_eq!(app.angle_mode(), AngleMode::Degrees);
        assert_eq!(app.decimal_places(), DecimalPlaces::Four);
        assert!(!app.shift());
        assert!(app.history().is_empty());
        assert_eq!(app.view().buffer, "0");
    }

    #[test]
    fn test_new_restores_preferences() {
        let store = MemoryPreferences::with_values([(MODE_KEY, "scientific"), (ANGLE_MODE_KEY, "RAD")]);
        let app = CalculatorApp::new(store);
        assert_eq!(app.mode(), CalculatorMode::Scientific);
        assert_eq!(app.angle_mode(), AngleMode::Radians);
        assert_eq!(app.keypad().mode(), CalculatorMode::Scientific);
    }

    // ===== Input routing tests =====

    #[test]
    fn test_click_calculation() {
        let mut app = app();
        click_all(&mut app, &["btn-5", "btn-plus", "btn-3", "btn-equals"]);
        assert_eq!(app.view().buffer, "8");
        assert_eq!(app.history().latest().unwrap().display(), "5 + 3 = 8");
    }

    #[test]
    fn test_keyboard_calculation() {
        let mut app = app();
        type_keys(&mut app, &["1", "2", "*", "3", "Enter"]);
        assert_eq!(app.view().buffer, "36");
    }

    #[test]
    fn test_view_expression() {
        let mut app = app();
        type_keys(&mut app, &["1", "2", "/"]);
        let view = app.view();
        assert_eq!(view.expression, "12 ÷");
        assert_eq!(view.buffer, "12");
    }

    #[test]
    fn test_standard_rejects_scientific_keys() {
        let mut app = app();
        assert!(app.press(Key::Operator(Operator::Power)).is_ignored());
        assert!(app.press(Key::Function(ScientificFunction::Sqrt)).is_ignored());
        assert!(app.click("btn-sqrt").is_ignored());
        assert!(app.key_down("^").is_ignored());
    }

    #[test]
    fn test_unknown_click_ignored() {
        let mut app = app();
        assert!(app.click("btn-nothing").is_ignored());
        assert!(app.key_down("F5").is_ignored());
    }

    #[test]
    fn test_error_is_not_recorded() {
        let mut app = app();
        type_keys(&mut app, &["9", "/", "0", "Enter"]);
        assert_eq!(app.view().buffer, "Error");
        assert!(app.history().is_empty());
    }

    // ===== Scientific tests =====

    #[test]
    fn test_scientific_function_recorded() {
        let mut app = scientific();
        click_all(&mut app, &["btn-8", "btn-1", "btn-sqrt"]);
        assert_eq!(app.view().buffer, "9");
        assert_eq!(app.history().latest().unwrap().expression, "√(81)");
    }

    #[test]
    fn test_shift_click_inverse() {
        let mut app = scientific();
        click_all(&mut app, &["btn-0", "btn-decimal", "btn-5", "btn-shift", "btn-sin"]);
        assert!(app.view().shift);
        assert_eq!(app.view().buffer, "30");
        assert_eq!(app.history().latest().unwrap().expression, "sin⁻¹(0.5)");
    }

    #[test]
    fn test_shift_does_not_affect_keyboard() {
        let mut app = scientific();
        app.toggle_shift();
        type_keys(&mut app, &["3", "0", "s"]);
        assert_eq!(app.view().buffer, "0.5");
    }

    #[test]
    fn test_angle_toggle_click() {
        let mut app = scientific();
        assert_eq!(app.click("btn-angle"), Transition::Updated);
        assert_eq!(app.angle_mode(), AngleMode::Radians);
        assert_eq!(app.store().get(ANGLE_MODE_KEY).unwrap().as_deref(), Some("RAD"));
        type_keys(&mut app, &["0", "c"]);
        assert_eq!(app.view().buffer, "1");
    }

    #[test]
    fn test_standard_has_no_controls() {
        let mut app = app();
        assert!(app.click("btn-shift").is_ignored());
        assert!(!app.shift());
    }

    // ===== Mode switch tests =====

    #[test]
    fn test_switch_mode_resets_engine_keeps_memory_and_history() {
        let mut app = app();
        type_keys(&mut app, &["4", "+", "4", "Enter"]);
        app.click("btn-ms");
        type_keys(&mut app, &["7", "-"]);
        app.switch_mode(CalculatorMode::Scientific);

        let view = app.view();
        assert_eq!(view.buffer, "0");
        assert_eq!(view.expression, "");
        assert!(view.memory_indicator);
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.engine().memory(), Some(8.0));
    }

    #[test]
    fn test_switch_mode_persists_and_clears_shift() {
        let mut app = scientific();
        app.toggle_shift();
        app.switch_mode(CalculatorMode::Standard);
        assert!(!app.shift());
        assert_eq!(app.store().get(MODE_KEY).unwrap().as_deref(), Some("standard"));
        assert_eq!(app.keypad().dimensions(), (6, 4));
    }

    // ===== Settings tests =====

    #[test]
    fn test_decimal_places_apply_to_next_result() {
        let mut app = app();
        app.set_decimal_places(DecimalPlaces::Eight);
        type_keys(&mut app, &["2", "/", "3", "Enter"]);
        assert_eq!(app.view().buffer, "0.66666667");
        assert_eq!(app.view().decimal_places, DecimalPlaces::Eight);
    }

    #[test]
    fn test_history_capped_at_ten() {
        let mut app = app();
        for _ in 0..11 {
            type_keys(&mut app, &["1", "+", "1", "Enter"]);
        }
        assert_eq!(app.history().len(), 10);
    }

    #[test]
    fn test_clear_history() {
        let mut app = app();
        type_keys(&mut app, &["1", "+", "1", "Enter"]);
        app.clear_history();
        assert!(app.history().is_empty());
        assert_eq!(app.view().buffer, "2");
    }

    #[test]
    fn test_view_serializes() {
        let json = serde_json::to_string(&app().view()).unwrap();
        assert!(json.contains("\"mode\":\"standard\""));
        assert!(json.contains("\"angle_mode\":\"DEG\""));
        assert!(json.contains("\"decimal_places\":4"));
    }
}
