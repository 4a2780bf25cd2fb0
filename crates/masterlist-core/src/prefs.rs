//! Persisted view preferences
//!
//! The record is a flat JSON object `{ "locked": bool, "empty": bool, "full": bool }`
//! stored under a single key. It is read once when the store is created and
//! rewritten in full on every change.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

/// Category toggles shown above the list. All default to `true`.
///
/// A stored record that lacks a key gets `true` for that key only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPreferences {
    #[serde(rename = "locked", default = "enabled")]
    pub show_locked: bool,
    #[serde(rename = "empty", default = "enabled")]
    pub show_empty: bool,
    #[serde(rename = "full", default = "enabled")]
    pub show_full: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            show_locked: true,
            show_empty: true,
            show_full: true,
        }
    }
}

impl ViewPreferences {
    pub fn get(&self, toggle: PreferenceToggle) -> bool {
        match toggle {
            PreferenceToggle::Locked => self.show_locked,
            PreferenceToggle::Empty => self.show_empty,
            PreferenceToggle::Full => self.show_full,
        }
    }

    pub fn set(&mut self, toggle: PreferenceToggle, value: bool) {
        match toggle {
            PreferenceToggle::Locked => self.show_locked = value,
            PreferenceToggle::Empty => self.show_empty = value,
            PreferenceToggle::Full => self.show_full = value,
        }
    }

    /// Parse a stored record, `None` if it is not a valid record.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceToggle {
    Locked,
    Empty,
    Full,
}

impl PreferenceToggle {
    pub const ALL: [Self; 3] = [Self::Locked, Self::Empty, Self::Full];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Empty => "empty",
            Self::Full => "full",
        }
    }
}

/// Client-local key/value storage holding the preference record.
pub trait PreferenceBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-process storage, used by tests and hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(key: &str, value: &str) -> Self {
        let backend = Self::new();
        if let Ok(mut values) = backend.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        backend
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let values = self
            .values
            .lock()
            .map_err(|e| PreferenceError::Unavailable(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PreferenceError::Unavailable(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PreferenceBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Sole owner of the live [`ViewPreferences`].
#[derive(Debug)]
pub struct PreferenceStore<B> {
    backend: B,
    key: String,
    prefs: ViewPreferences,
}

impl<B: PreferenceBackend> PreferenceStore<B> {
    /// Read the stored record. Absent, unreadable or corrupt storage yields
    /// the defaults; a corrupt record is replaced on the next save.
    pub fn load(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let prefs = match backend.read(&key) {
            Ok(Some(raw)) => ViewPreferences::decode(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring corrupt preference record under '{}'", key);
                ViewPreferences::default()
            }),
            Ok(None) => ViewPreferences::default(),
            Err(e) => {
                tracing::warn!("Failed to read preferences: {}", e);
                ViewPreferences::default()
            }
        };

        tracing::debug!("Loaded preferences {:?}", prefs);
        Self {
            backend,
            key,
            prefs,
        }
    }

    pub fn preferences(&self) -> ViewPreferences {
        self.prefs
    }

    /// Replace the whole record. The in-memory value is updated even when
    /// the write fails, so the session keeps the user's choice.
    pub fn save(&mut self, prefs: ViewPreferences) -> Result<(), PreferenceError> {
        self.prefs = prefs;
        let raw = serde_json::to_string(&prefs)?;
        self.backend.write(&self.key, &raw)
    }

    pub fn set(&mut self, toggle: PreferenceToggle, value: bool) -> Result<(), PreferenceError> {
        let mut prefs = self.prefs;
        prefs.set(toggle, value);
        self.save(prefs)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
