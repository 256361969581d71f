//! TOML-based settings persistence.
//!
//! Stores the user's [`Settings`] at `<data_dir>/settings.toml`. Values can be
//! read and written by dot-separated key (`notifications.streak`, `theme`),
//! which is what the CLI's `settings get/set` commands use.

use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::settings::Settings;

const FILE_NAME: &str = "settings.toml";

/// Settings file on disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

fn get_json_value_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if key.is_empty() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .trim()
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as true/false")))?,
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.trim().into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}

impl SettingsStore {
    /// Store in the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, ConfigError> {
        Ok(Self::at(data_dir()?.join(FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load from disk, writing and returning defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the defaults cannot be written.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Settings::default();
                self.save(&settings)?;
                Ok(settings)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default settings");
            Settings::default()
        })
    }

    /// Persist the whole settings value.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        let content = toml::to_string_pretty(settings).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(&self.path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Write defaults and return them.
    pub fn reset(&self) -> Result<Settings, ConfigError> {
        let settings = Settings::default();
        self.save(&settings)?;
        Ok(settings)
    }

    /// Get a value as string by dot-separated key.
    pub fn get(settings: &Settings, key: &str) -> Option<String> {
        let json = serde_json::to_value(settings).ok()?;
        match get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Apply a dot-path change to `settings` without saving.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not parse
    /// (including theme names outside the theme table).
    pub fn apply(settings: &Settings, key: &str, value: &str) -> Result<Settings, ConfigError> {
        let mut json = serde_json::to_value(settings).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_json_value_by_path(&mut json, key, value)?;
        serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Load, apply a dot-path change, save, and return the new settings.
    pub fn set(&self, key: &str, value: &str) -> Result<Settings, ConfigError> {
        let next = Self::apply(&self.load()?, key, value)?;
        self.save(&next)?;
        Ok(next)
    }
}
