//! Persisted key/value settings store
//!
//! A process-wide mapping from string keys to primitive JSON values,
//! persisted as pretty-printed JSON in the application data directory.
//! Reads and writes are synchronous; last write wins. Boolean-flavored keys
//! hold the literal strings `"true"`/`"false"` for compatibility with the
//! settings files written by earlier releases of the app.

pub mod keys;

use m365_core::config::{app_data_dir, PolicyConfig, DEFAULT_WINDOW_FRACTION};
use m365_core::{M365Error, M365Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const SETTINGS_FILE: &str = "settings.json";

/// Synchronous, file-backed settings store
#[derive(Debug)]
pub struct SettingsStore {
    values: HashMap<String, Value>,
    path: PathBuf,
}

impl SettingsStore {
    /// Load the store from the default settings file, starting empty if the
    /// file is missing or unreadable
    pub fn load_default() -> Self {
        Self::load(app_data_dir().join(SETTINGS_FILE))
    }

    /// Load the store from the given file
    pub fn load(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Settings file {:?} is corrupt, starting fresh: {}", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        log::info!("Loaded {} settings from {:?}", values.len(), path);
        Self { values, path }
    }

    /// Get the raw value for a key, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a value and persist the store. Persistence failures are logged
    /// and do not lose the in-memory write.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
        if let Err(e) = self.save() {
            log::error!("Failed to persist settings: {}", e);
        }
    }

    fn save(&self) -> M365Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.values)
            .map_err(|e| M365Error::settings(format!("Failed to serialize settings: {}", e)))?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    /// Read a boolean-flavored key. Accepts the literal strings
    /// `"true"`/`"false"` as well as native JSON booleans; anything else
    /// (including a missing key) yields `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.as_str() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Read a screen-fraction key. Values outside (0, 1] fall back to
    /// `default`.
    pub fn fraction_or(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key).and_then(Value::as_f64) {
            Some(f) if f > 0.0 && f <= 1.0 => f,
            _ => default,
        }
    }

    /// Read a string key, falling back to `default` when missing or not a
    /// string
    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    /// Snapshot the policy-relevant subset for a single decision
    pub fn policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            external_links_enabled: self.bool_or(keys::EXTERNAL_LINKS, false),
            open_in_new_window: self.bool_or(keys::WEBSITES_IN_NEW_WINDOW, false),
            window_width_fraction: self.fraction_or(keys::WINDOW_WIDTH, DEFAULT_WINDOW_FRACTION),
            window_height_fraction: self.fraction_or(keys::WINDOW_HEIGHT, DEFAULT_WINDOW_FRACTION),
        }
    }
}
