//! CalcuSmart - standard and scientific calculator engine
//!
//! A key-driven calculator: every button click or key press becomes one
//! transition of a small state machine. Two modes share one engine, one
//! memory register and one ten-entry history.
//!
//! - **Standard**: `+ - × ÷ %`, sign change, memory keys
//! - **Scientific**: adds `^`, trigonometry in degrees or radians, logarithms,
//!   powers, factorial, `π` and `e`
//!
//! # Example
//!
//! ```rust
//! use calcusmart::prelude::*;
//!
//! let mut app = CalculatorApp::default();
//! for id in ["btn-5", "btn-plus", "btn-3", "btn-plus", "btn-2", "btn-equals"] {
//!     app.click(id);
//! }
//! assert_eq!(app.view().buffer, "10");
//! assert_eq!(app.history().latest().unwrap().display(), "8 + 2 = 10");
//!
//! // Numeric failures land in the display, never in a panic
//! app.key_down("Escape");
//! for key in ["1", "/", "0", "Enter"] {
//!     app.key_down(key);
//! }
//! assert_eq!(app.view().buffer, "Error");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod driver;
pub mod input;
pub mod keypad;
pub mod mode;
pub mod preferences;
pub mod session;

/// Terminal front-end
#[cfg(feature = "cli")]
pub mod cli;

/// Subscriber setup for the binary
#[cfg(feature = "cli")]
pub mod logging;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::{
        AngleMode, CalcError, CalcResult, Calculator, DecimalPlaces, EngineSettings, EngineState,
        Key, NumberFormat, Operator, ScientificFunction, Transition,
    };
    pub use crate::driver::{CalculatorDriver, HistoryItem, KeyboardDriver, KeypadDriver};
    pub use crate::input::KeyboardMap;
    pub use crate::keypad::{Keypad, KeypadButtonDef, KeypadControl};
    pub use crate::mode::CalculatorMode;
    pub use crate::preferences::{
        JsonFilePreferences, MemoryPreferences, PreferenceStore, Preferences,
    };
    pub use crate::session::{CalculatorApp, DisplaySnapshot};
}
