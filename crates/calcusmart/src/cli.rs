//! Terminal front-end
//!
//! Each argument (or whitespace-separated word on stdin) is one event:
//!
//! - a keypad element id: `btn-7`, `btn-sqrt`, `btn-shift`
//! - a keyboard key name: `7`, `+`, `Enter`, `Escape`, `s`
//! - a keypad caption: `sin`, `MS`, `AC`, `±`, `n!`
//! - a setting: `mode=scientific`, `angle=RAD`, `decimals=6`, `history=clear`
//!
//! ```bash
//! calcusmart 1 2 + 3 =                       # prints 15
//! calcusmart --mode scientific 3 0 sin       # prints 0.5
//! echo "2 ^ 1 0 Enter" | calcusmart -m scientific
//! ```

use crate::core::{AngleMode, DecimalPlaces, Transition};
use crate::input::KeyboardMap;
use crate::logging::{LogFormat, LoggingConfig};
use crate::mode::CalculatorMode;
use crate::preferences::{JsonFilePreferences, MemoryPreferences, PreferenceError, PreferenceStore};
use crate::session::CalculatorApp;
use clap::{Parser, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a CLI run
#[derive(Debug, Error)]
pub enum CliError {
    /// A token matched no key, button or setting
    #[error("Unknown key or button: {token:?}")]
    UnknownToken {
        /// The offending token
        token: String,
    },

    /// A setting token had a bad value
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Preference file could not be opened
    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferenceError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Output format for the final display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Display text only
    #[default]
    Text,
    /// Full render snapshot as JSON
    Json,
}

/// Log output format flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON lines
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// CalcuSmart: standard and scientific calculator
#[derive(Parser, Debug)]
#[command(name = "calcusmart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Calculator mode (overrides the saved preference)
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<CalculatorMode>,

    /// Angle unit, DEG or RAD (overrides the saved preference)
    #[arg(short, long, value_parser = parse_angle)]
    pub angle: Option<AngleMode>,

    /// Decimal places for results: 2, 4, 6 or 8
    #[arg(short, long, default_value = "4", value_parser = parse_decimals)]
    pub decimals: DecimalPlaces,

    /// JSON file holding the saved mode and angle unit
    #[arg(long, env = "CALCUSMART_PREFS")]
    pub prefs: Option<PathBuf>,

    /// Print the history panel after the display
    #[arg(long)]
    pub history: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", env = "CALCUSMART_LOG")]
    pub log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// Key tokens; read from stdin when empty
    pub keys: Vec<String>,
}

impl Cli {
    /// Logging options from the flags
    #[must_use]
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            default: self.log_level.clone(),
            format: self.log_format.into(),
        }
    }
}

fn parse_mode(s: &str) -> Result<CalculatorMode, String> {
    CalculatorMode::parse(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("expected standard or scientific, got {s:?}"))
}

fn parse_angle(s: &str) -> Result<AngleMode, String> {
    AngleMode::parse(&s.to_ascii_uppercase())
        .ok_or_else(|| format!("expected DEG or RAD, got {s:?}"))
}

fn parse_decimals(s: &str) -> Result<DecimalPlaces, String> {
    let places: u8 = s.parse().map_err(|_| format!("not a number: {s:?}"))?;
    DecimalPlaces::try_from(places)
}

/// Runs the CLI against real stdin/stdout
pub fn run(cli: &Cli) -> CliResult<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match &cli.prefs {
        Some(path) => {
            let store = JsonFilePreferences::open(path)?;
            execute(cli, store, stdin.lock(), &mut stdout.lock())
        }
        None => execute(cli, MemoryPreferences::new(), stdin.lock(), &mut stdout.lock()),
    }
}

/// Runs the CLI against the given store and streams
pub fn execute<S, R, W>(cli: &Cli, store: S, input: R, out: &mut W) -> CliResult<()>
where
    S: PreferenceStore,
    R: BufRead,
    W: Write,
{
    let mut app = CalculatorApp::new(store);
    if let Some(mode) = cli.mode {
        if mode != app.mode() {
            app.switch_mode(mode);
        }
    }
    if let Some(angle) = cli.angle {
        app.set_angle_mode(angle);
    }
    app.set_decimal_places(cli.decimals);

    if cli.keys.is_empty() {
        for line in input.lines() {
            let line = line?;
            for token in line.split_whitespace() {
                apply_token(&mut app, token)?;
            }
            print_view(cli, &app, out)?;
        }
    } else {
        for token in &cli.keys {
            apply_token(&mut app, token)?;
        }
        print_view(cli, &app, out)?;
    }
    Ok(())
}

/// Applies one token to the session
pub fn apply_token<S: PreferenceStore>(
    app: &mut CalculatorApp<S>,
    token: &str,
) -> CliResult<Transition> {
    if let Some((name, value)) = token.split_once('=').filter(|(name, _)| !name.is_empty()) {
        return apply_setting(app, name, value).map(|()| Transition::Updated);
    }

    if token.starts_with("btn-") {
        let transition = app.click(token);
        if transition.is_ignored() && app.keypad().find_button_by_id(token).is_none() {
            return Err(CliError::UnknownToken {
                token: token.to_string(),
            });
        }
        return Ok(transition);
    }

    let keyboard = KeyboardMap::for_mode(app.mode());
    if keyboard.map(token).is_some() {
        return Ok(app.key_down(token));
    }

    let shift = app.shift();
    let id = app
        .keypad()
        .buttons()
        .iter()
        .find(|b| b.label(shift) == token || b.action.label() == token)
        .map(|b| b.id.clone());
    match id {
        Some(id) => Ok(app.click(&id)),
        None => {
            debug!(token, "unresolved token");
            Err(CliError::UnknownToken {
                token: token.to_string(),
            })
        }
    }
}

fn apply_setting<S: PreferenceStore>(
    app: &mut CalculatorApp<S>,
    name: &str,
    value: &str,
) -> CliResult<()> {
    match name {
        "mode" => app.switch_mode(parse_mode(value).map_err(CliError::invalid_argument)?),
        "angle" => app.set_angle_mode(parse_angle(value).map_err(CliError::invalid_argument)?),
        "decimals" => {
            app.set_decimal_places(parse_decimals(value).map_err(CliError::invalid_argument)?);
        }
        "history" if value == "clear" => app.clear_history(),
        _ => {
            return Err(CliError::invalid_argument(format!(
                "unknown setting {name}={value}"
            )))
        }
    }
    Ok(())
}

fn print_view<S: PreferenceStore, W: Write>(
    cli: &Cli,
    app: &CalculatorApp<S>,
    out: &mut W,
) -> CliResult<()> {
    match cli.output {
        OutputFormat::Text => {
            let view = app.view();
            if view.expression.is_empty() {
                writeln!(out, "{}", view.buffer)?;
            } else {
                writeln!(out, "{}  [{}]", view.buffer, view.expression)?;
            }
            if cli.history && !app.history().is_empty() {
                writeln!(out, "{}", app.history().export_formatted())?;
            }
        }
        // One JSON document per line: the view, then the history array
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string(&app.view())?)?;
            if cli.history {
                writeln!(out, "{}", app.history().to_json()?)?;
            }
        }
    }
    Ok(())
}
