pub mod achievements;
pub mod habit;
pub mod notify;
pub mod platform;
pub mod reset;
pub mod settings;
pub mod share;
pub mod stats;

use chrono::{Local, NaiveDate};
use habitkit_core::{Achievement, CoreError, Habit, HabitDb, Settings, SettingsScreen};

pub type CliResult = Result<(), CoreError>;

/// Local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse `--date` or fall back to today.
pub fn day_or_today(date: Option<&str>) -> Result<NaiveDate, CoreError> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| CoreError::Custom(format!("invalid date '{d}' (expected YYYY-MM-DD): {e}"))),
        None => Ok(today()),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a habit by id, id prefix, or name.
pub fn require_habit(db: &HabitDb, key: &str) -> Result<Habit, CoreError> {
    db.find_habit(key)?
        .ok_or_else(|| CoreError::Custom(format!("habit not found: {key}")))
}

/// Drive a visible settings screen over the given state.
///
/// Returns `f`'s result and the last settings value the screen proposed.
pub fn with_screen<R>(
    settings: &Settings,
    habits: &[Habit],
    achievements: &[Achievement],
    f: impl FnOnce(&mut SettingsScreen<'_, Habit, Achievement>) -> R,
) -> (R, Option<Settings>) {
    let mut proposed = None;
    let result = {
        let mut screen = SettingsScreen::new(
            true,
            settings,
            habits,
            achievements,
            |next| proposed = Some(next),
            || tracing::debug!("settings screen closed"),
        );
        f(&mut screen)
    };
    (result, proposed)
}
