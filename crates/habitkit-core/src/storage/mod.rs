pub mod database;
pub mod migrations;
pub mod settings_store;

pub use database::{DataResetSummary, HabitDb};
pub use settings_store::SettingsStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `HABITKIT_DATA_DIR` overrides the location. Otherwise this is
/// `~/.config/habitkit[-dev]/`, with the `-dev` suffix when
/// `HABITKIT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("HABITKIT_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABITKIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitkit-dev")
            } else {
                base_dir.join("habitkit")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
