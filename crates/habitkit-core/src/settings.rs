//! User preference record.
//!
//! [`Settings`] is a plain value. Every change produces a new value through
//! one of the `with_*` builders; nothing here persists anything. Storage lives
//! in [`crate::storage::settings_store`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::theme::{self, Palette, ThemeName};

/// Per-category notification switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub reminder: bool,
    #[serde(default = "default_true")]
    pub achievement: bool,
    #[serde(default = "default_true")]
    pub streak: bool,
}

/// Which notification flag a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reminder,
    Achievement,
    Streak,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 3] = [
        NotificationKind::Reminder,
        NotificationKind::Achievement,
        NotificationKind::Streak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Reminder => "reminder",
            NotificationKind::Achievement => "achievement",
            NotificationKind::Streak => "streak",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Reminder => "Daily Reminders",
            NotificationKind::Achievement => "Achievement Alerts",
            NotificationKind::Streak => "Streak Milestones",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reminder" | "reminders" => Ok(NotificationKind::Reminder),
            "achievement" | "achievements" => Ok(NotificationKind::Achievement),
            "streak" | "streaks" => Ok(NotificationKind::Streak),
            other => Err(ValidationError::InvalidValue {
                field: "notification".into(),
                message: format!("'{other}' is not one of reminder, achievement, streak"),
            }),
        }
    }
}

/// Time of day for the daily reminder, stored as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidValue {
                field: "reminder_time".into(),
                message: format!("{hour:02}:{minute:02} is not a valid time of day"),
            });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self {
            hour: 20,
            minute: 0,
        }
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidValue {
            field: "reminder_time".into(),
            message: format!("'{s}' is not in HH:MM format"),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = h.parse::<u8>().map_err(|_| invalid())?;
        let minute = m.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReminderTime> for String {
    fn from(value: ReminderTime) -> Self {
        value.to_string()
    }
}

/// User preferences.
///
/// Serialized to/from TOML by the settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeName,
    #[serde(default)]
    pub is_dark_mode: bool,
    #[serde(default)]
    pub reminder_time: ReminderTime,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            reminder: true,
            achievement: true,
            streak: true,
        }
    }
}

impl NotificationSettings {
    pub fn is_enabled(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Reminder => self.reminder,
            NotificationKind::Achievement => self.achievement,
            NotificationKind::Streak => self.streak,
        }
    }

    /// Copy with one flag replaced.
    pub fn with(self, kind: NotificationKind, enabled: bool) -> Self {
        match kind {
            NotificationKind::Reminder => Self {
                reminder: enabled,
                ..self
            },
            NotificationKind::Achievement => Self {
                achievement: enabled,
                ..self
            },
            NotificationKind::Streak => Self {
                streak: enabled,
                ..self
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeName::Blue,
            is_dark_mode: false,
            notifications: NotificationSettings::default(),
            reminder_time: ReminderTime::default(),
        }
    }
}

impl Settings {
    pub fn with_dark_mode(&self, is_dark_mode: bool) -> Self {
        Self {
            is_dark_mode,
            ..self.clone()
        }
    }

    pub fn with_notification(&self, kind: NotificationKind, enabled: bool) -> Self {
        Self {
            notifications: self.notifications.with(kind, enabled),
            ..self.clone()
        }
    }

    pub fn with_theme(&self, theme: ThemeName) -> Self {
        Self {
            theme,
            ..self.clone()
        }
    }

    pub fn with_reminder_time(&self, reminder_time: ReminderTime) -> Self {
        Self {
            reminder_time,
            ..self.clone()
        }
    }

    /// Palette for the current theme and dark-mode state.
    pub fn palette(&self) -> &'static Palette {
        theme::palette(self.theme, self.is_dark_mode)
    }
}
