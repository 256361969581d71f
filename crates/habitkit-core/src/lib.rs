//! # HabitKit Core Library
//!
//! This library provides the core logic for the HabitKit habit tracker. It
//! follows a CLI-first layout: every operation is available through the
//! standalone `habitkit` binary, and any GUI is a thin layer over the same
//! library.
//!
//! ## Architecture
//!
//! - **Settings**: an immutable preference record with a fixed theme table
//! - **Settings screen**: a presentational controller that proposes whole
//!   replacement settings through callbacks and talks to the host through
//!   small capability traits
//! - **Habits**: completions, streaks, month/year statistics and achievements
//! - **Storage**: SQLite for habits and achievements, TOML for settings
//!
//! ## Key Components
//!
//! - [`Settings`]: user preferences
//! - [`SettingsScreen`]: settings screen controller
//! - [`HabitDb`]: habit and achievement persistence
//! - [`SettingsStore`]: settings file management
//! - [`NotificationCenter`]: settings-gated notification delivery

pub mod error;
pub mod habit;
pub mod notifications;
pub mod screen;
pub mod settings;
pub mod storage;
pub mod theme;

pub use error::{ConfigError, CoreError, DatabaseError, PlatformError, Result, ThemeError, ValidationError};
pub use habit::{Achievement, AchievementKind, Habit};
pub use notifications::{Notification, NotificationCategory, NotificationCenter, NotificationManager, Notifier};
pub use screen::{Dialogs, ResetOutcome, SettingsScreen, SettingsView, ShareOutcome, ShareSheet, TestNotifier};
pub use settings::{NotificationKind, NotificationSettings, ReminderTime, Settings};
pub use storage::{DataResetSummary, HabitDb, SettingsStore};
pub use theme::{Palette, ThemeName};
