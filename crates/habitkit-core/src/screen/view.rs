use serde::Serialize;

use crate::settings::{NotificationKind, ReminderTime};
use crate::theme::{Palette, ThemeName};

/// A boolean row on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingToggle {
    DarkMode,
    Notification(NotificationKind),
}

impl SettingToggle {
    pub const ALL: [SettingToggle; 4] = [
        SettingToggle::DarkMode,
        SettingToggle::Notification(NotificationKind::Reminder),
        SettingToggle::Notification(NotificationKind::Achievement),
        SettingToggle::Notification(NotificationKind::Streak),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingToggle::DarkMode => "Dark Mode",
            SettingToggle::Notification(kind) => kind.label(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SettingToggle::DarkMode => "Use a dark color scheme",
            SettingToggle::Notification(NotificationKind::Reminder) => {
                "Daily reminder for habits you haven't completed"
            }
            SettingToggle::Notification(NotificationKind::Achievement) => {
                "Celebrate when you unlock an achievement"
            }
            SettingToggle::Notification(NotificationKind::Streak) => {
                "Cheer on streak milestones"
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleRow {
    pub toggle: SettingToggle,
    pub label: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeOption {
    pub name: ThemeName,
    pub label: &'static str,
    /// Primary color of the option in the current light/dark mode
    pub swatch: &'static str,
    pub selected: bool,
}

/// Everything the settings screen shows, resolved against the palette.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub palette: Palette,
    pub theme: ThemeName,
    pub theme_label: &'static str,
    pub toggles: Vec<ToggleRow>,
    pub reminder_time: ReminderTime,
    /// Present only while the theme selector is open
    pub theme_selector: Option<Vec<ThemeOption>>,
    pub habit_count: usize,
    pub achievement_count: usize,
}
