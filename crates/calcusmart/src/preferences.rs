//! Persisted user preferences
//!
//! Only two values survive a restart: the last calculator mode
//! (`calculatorType`) and the angle unit (`angleMode`). Storage is a plain
//! string key-value store so the same keys and values work against browser
//! local storage, a JSON file or memory.

use crate::core::AngleMode;
use crate::mode::CalculatorMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Storage key for the calculator mode
pub const MODE_KEY: &str = "calculatorType";

/// Storage key for the angle unit
pub const ANGLE_MODE_KEY: &str = "angleMode";

/// Result type for preference storage
pub type PreferenceResult<T> = Result<T, PreferenceError>;

/// Errors raised by a preference backend
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Reading or writing the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON string map
    #[error("Invalid preferences file: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage for preferences
pub trait PreferenceStore {
    /// Reads a value
    fn get(&self, key: &str) -> PreferenceResult<Option<String>>;

    /// Writes a value
    fn set(&mut self, key: &str, value: &str) -> PreferenceResult<()>;
}

/// Typed view of the persisted values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Last selected calculator mode
    pub mode: CalculatorMode,
    /// Last selected angle unit
    pub angle_mode: AngleMode,
}

impl Preferences {
    /// Reads preferences, falling back to defaults for missing, unknown or
    /// unreadable values
    pub fn load<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        let mode = read(store, MODE_KEY, CalculatorMode::parse).unwrap_or_default();
        let angle_mode = read(store, ANGLE_MODE_KEY, AngleMode::parse).unwrap_or_default();
        Self { mode, angle_mode }
    }

    /// Writes both values
    pub fn save<S: PreferenceStore + ?Sized>(&self, store: &mut S) -> PreferenceResult<()> {
        store.set(MODE_KEY, self.mode.as_str())?;
        store.set(ANGLE_MODE_KEY, self.angle_mode.as_str())
    }
}

fn read<S, T>(store: &S, key: &str, parse: fn(&str) -> Option<T>) -> Option<T>
where
    S: PreferenceStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) => {
            let parsed = parse(&raw);
            if parsed.is_none() {
                warn!(key, value = %raw, "ignoring unknown preference value");
            }
            parsed
        }
        Ok(None) => None,
        Err(err) => {
            warn!(key, %err, "failed to read preference, using default");
            None
        }
    }
}

/// Volatile store, the default for tests and one-shot runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given pairs
    #[must_use]
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PreferenceResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk, rewritten on every change
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFilePreferences {
    /// Opens the file, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> PreferenceResult<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => HashMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> PreferenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PreferenceResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
