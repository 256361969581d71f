//! Settings screen controller.
//!
//! The screen never persists anything. It reads the caller's settings and
//! collections, and every change is handed back as a whole replacement value
//! through `on_settings_change`. Platform work (share sheet, dialogs, test
//! notifications) goes through the traits in [`super::platform`].

use chrono::NaiveDate;

use super::platform::{ButtonStyle, DialogButton, Dialogs, ShareRequest, ShareSheet, TestNotifier};
use super::view::{SettingToggle, SettingsView, ThemeOption, ToggleRow};
use crate::error::ThemeError;
use crate::settings::{NotificationKind, Settings};
use crate::theme::{self, ThemeName};

pub const SHARE_TITLE: &str = "My Habit Progress";
pub const SHARE_FAILED_TITLE: &str = "Share Failed";
pub const SHARE_FAILED_MESSAGE: &str = "Unable to share your progress right now. Please try again later.";
pub const RESET_TITLE: &str = "Reset All Data";
pub const RESET_MESSAGE: &str = "This will permanently delete all your habits, progress, and achievements. This action cannot be undone.";
pub const TEST_SENT_TITLE: &str = "Test Notification Sent";
pub const TEST_FAILED_TITLE: &str = "Notification Failed";

/// Buttons of the reset confirmation, in display order.
pub const RESET_BUTTONS: [DialogButton; 2] = [
    DialogButton {
        label: "Cancel",
        style: ButtonStyle::Cancel,
    },
    DialogButton {
        label: "Reset",
        style: ButtonStyle::Destructive,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Failed,
}

/// Result of the reset flow. On `Confirmed` the host should also clear
/// habits and achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Confirmed,
    Cancelled,
}

/// Summary text for the share sheet.
pub fn share_message(habit_count: usize, achievement_count: usize, date: NaiveDate) -> ShareRequest {
    let habits = if habit_count == 1 { "habit" } else { "habits" };
    let achievements = if achievement_count == 1 {
        "achievement"
    } else {
        "achievements"
    };
    ShareRequest {
        title: SHARE_TITLE.to_string(),
        message: format!(
            "My Habit Tracker Progress\n\n\
             Tracking {habit_count} {habits}\n\
             Unlocked {achievement_count} {achievements}\n\n\
             Shared on {}",
            date.format("%B %-d, %Y")
        ),
    }
}

/// Presentational settings screen.
///
/// `H` and `A` are opaque: only the lengths of the habit and achievement
/// slices are read.
pub struct SettingsScreen<'a, H, A> {
    visible: bool,
    settings: &'a Settings,
    habits: &'a [H],
    achievements: &'a [A],
    on_settings_change: Box<dyn FnMut(Settings) + 'a>,
    on_close: Box<dyn FnMut() + 'a>,
    theme_selector_visible: bool,
}

impl<'a, H, A> SettingsScreen<'a, H, A> {
    pub fn new(
        visible: bool,
        settings: &'a Settings,
        habits: &'a [H],
        achievements: &'a [A],
        on_settings_change: impl FnMut(Settings) + 'a,
        on_close: impl FnMut() + 'a,
    ) -> Self {
        Self {
            visible,
            settings,
            habits,
            achievements,
            on_settings_change: Box::new(on_settings_change),
            on_close: Box::new(on_close),
            theme_selector_visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    fn propose(&mut self, next: Settings) {
        tracing::debug!(?next, "settings change proposed");
        (self.on_settings_change)(next);
    }

    pub fn toggle_dark_mode(&mut self, enabled: bool) {
        let next = self.settings.with_dark_mode(enabled);
        self.propose(next);
    }

    pub fn toggle_notification(&mut self, kind: NotificationKind, enabled: bool) {
        let next = self.settings.with_notification(kind, enabled);
        self.propose(next);
    }

    pub fn toggle(&mut self, toggle: SettingToggle, enabled: bool) {
        match toggle {
            SettingToggle::DarkMode => self.toggle_dark_mode(enabled),
            SettingToggle::Notification(kind) => self.toggle_notification(kind, enabled),
        }
    }

    pub fn open_theme_selector(&mut self) {
        self.theme_selector_visible = true;
    }

    pub fn close_theme_selector(&mut self) {
        self.theme_selector_visible = false;
    }

    pub fn is_theme_selector_visible(&self) -> bool {
        self.theme_selector_visible
    }

    /// Pick a theme by key. Unknown keys are rejected without notifying.
    pub fn select_theme(&mut self, key: &str) -> Result<(), ThemeError> {
        let theme: ThemeName = key.parse()?;
        let next = self.settings.with_theme(theme);
        self.propose(next);
        self.theme_selector_visible = false;
        Ok(())
    }

    /// Hand the progress summary to the share sheet. Failures end in one
    /// alert and are not retried.
    pub fn share_progress(
        &mut self,
        share: &mut dyn ShareSheet,
        dialogs: &mut dyn Dialogs,
        today: NaiveDate,
    ) -> ShareOutcome {
        let request = share_message(self.habits.len(), self.achievements.len(), today);
        match share.share(&request) {
            Ok(()) => ShareOutcome::Shared,
            Err(e) => {
                tracing::warn!(error = %e, "sharing progress failed");
                dialogs.alert(SHARE_FAILED_TITLE, SHARE_FAILED_MESSAGE);
                ShareOutcome::Failed
            }
        }
    }

    /// Ask for destructive confirmation; on confirm forward default settings
    /// and close the screen.
    pub fn reset_all_data(&mut self, dialogs: &mut dyn Dialogs) -> ResetOutcome {
        let choice = dialogs.confirm(RESET_TITLE, RESET_MESSAGE, &RESET_BUTTONS);
        let confirmed = choice
            .and_then(|i| RESET_BUTTONS.get(i))
            .is_some_and(|b| b.style == ButtonStyle::Destructive);
        if !confirmed {
            return ResetOutcome::Cancelled;
        }

        tracing::info!("settings reset to defaults");
        self.propose(Settings::default());
        self.close();
        ResetOutcome::Confirmed
    }

    /// Returns whether the test notification went out.
    pub fn send_test_notification(
        &mut self,
        notifier: &mut dyn TestNotifier,
        dialogs: &mut dyn Dialogs,
    ) -> bool {
        match notifier.send_test_notification() {
            Ok(()) => {
                dialogs.alert(TEST_SENT_TITLE, "Check your notifications to see it.");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "test notification failed");
                dialogs.alert(
                    TEST_FAILED_TITLE,
                    &format!("Could not send the test notification: {e}"),
                );
                false
            }
        }
    }

    pub fn close(&mut self) {
        self.theme_selector_visible = false;
        (self.on_close)();
    }

    /// Resolved view, or `None` while the screen is hidden.
    pub fn render(&self) -> Option<SettingsView> {
        if !self.visible {
            return None;
        }
        let settings = self.settings;

        let toggles = SettingToggle::ALL
            .into_iter()
            .map(|toggle| ToggleRow {
                toggle,
                label: toggle.label(),
                description: toggle.description(),
                enabled: match toggle {
                    SettingToggle::DarkMode => settings.is_dark_mode,
                    SettingToggle::Notification(kind) => settings.notifications.is_enabled(kind),
                },
            })
            .collect();

        let theme_selector = self.theme_selector_visible.then(|| {
            ThemeName::ALL
                .into_iter()
                .map(|name| ThemeOption {
                    name,
                    label: name.display_name(),
                    swatch: theme::palette(name, settings.is_dark_mode).primary,
                    selected: name == settings.theme,
                })
                .collect()
        });

        Some(SettingsView {
            palette: *settings.palette(),
            theme: settings.theme,
            theme_label: settings.theme.display_name(),
            toggles,
            reminder_time: settings.reminder_time,
            theme_selector,
            habit_count: self.habits.len(),
            achievement_count: self.achievements.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::settings::NotificationSettings;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeDialogs {
        alerts: Vec<(String, String)>,
        confirms: usize,
        answer: Option<usize>,
    }

    impl Dialogs for FakeDialogs {
        fn alert(&mut self, title: &str, message: &str) {
            self.alerts.push((title.to_string(), message.to_string()));
        }

        fn confirm(&mut self, _title: &str, _message: &str, _buttons: &[DialogButton]) -> Option<usize> {
            self.confirms += 1;
            self.answer
        }
    }

    struct FakeShare {
        result: Result<(), PlatformError>,
        shared: Vec<ShareRequest>,
    }

    impl ShareSheet for FakeShare {
        fn share(&mut self, request: &ShareRequest) -> Result<(), PlatformError> {
            self.shared.push(request.clone());
            self.result.clone()
        }
    }

    struct FakeNotifier(Result<(), PlatformError>);

    impl TestNotifier for FakeNotifier {
        fn send_test_notification(&mut self) -> Result<(), PlatformError> {
            self.0.clone()
        }
    }

    fn blue_light() -> Settings {
        Settings {
            theme: ThemeName::Blue,
            is_dark_mode: false,
            notifications: NotificationSettings {
                reminder: true,
                achievement: false,
                streak: false,
            },
            ..Settings::default()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn toggling_achievement_forwards_once() {
        let settings = blue_light();
        let changes = RefCell::new(Vec::new());
        let mut screen = SettingsScreen::<(), ()>::new(
            true,
            &settings,
            &[],
            &[],
            |s| changes.borrow_mut().push(s),
            || {},
        );
        screen.toggle_notification(NotificationKind::Achievement, true);
        drop(screen);

        let changes = changes.into_inner();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0],
            Settings {
                notifications: NotificationSettings {
                    reminder: true,
                    achievement: true,
                    streak: false,
                },
                ..blue_light()
            }
        );
    }

    #[test]
    fn every_toggle_changes_a_single_field() {
        let settings = blue_light();
        for toggle in SettingToggle::ALL {
            let changes = RefCell::new(Vec::new());
            let mut screen = SettingsScreen::<(), ()>::new(
                true,
                &settings,
                &[],
                &[],
                |s| changes.borrow_mut().push(s),
                || {},
            );
            screen.toggle(toggle, true);
            drop(screen);

            let changes = changes.into_inner();
            assert_eq!(changes.len(), 1, "{toggle:?}");
            let expected = match toggle {
                SettingToggle::DarkMode => settings.with_dark_mode(true),
                SettingToggle::Notification(kind) => settings.with_notification(kind, true),
            };
            assert_eq!(changes[0], expected);
        }
    }

    #[test]
    fn selecting_theme_changes_only_theme_and_closes_selector() {
        let settings = blue_light();
        let changes = RefCell::new(Vec::new());
        let mut screen = SettingsScreen::<(), ()>::new(
            true,
            &settings,
            &[],
            &[],
            |s| changes.borrow_mut().push(s),
            || {},
        );
        screen.open_theme_selector();
        assert!(screen.render().unwrap().theme_selector.is_some());
        screen.select_theme("purple").unwrap();
        assert!(!screen.is_theme_selector_visible());
        drop(screen);

        assert_eq!(changes.into_inner(), vec![blue_light().with_theme(ThemeName::Purple)]);
    }

    #[test]
    fn unknown_theme_is_rejected_without_change() {
        let settings = blue_light();
        let calls = Cell::new(0);
        let mut screen = SettingsScreen::<(), ()>::new(
            true,
            &settings,
            &[],
            &[],
            |_| calls.set(calls.get() + 1),
            || {},
        );
        screen.open_theme_selector();
        assert!(screen.select_theme("teal").is_err());
        assert!(screen.is_theme_selector_visible());
        drop(screen);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn confirmed_reset_forwards_defaults_and_closes_once() {
        let settings = blue_light().with_dark_mode(true).with_theme(ThemeName::Orange);
        let changes = RefCell::new(Vec::new());
        let closes = Cell::new(0);
        let mut screen = SettingsScreen::<(), ()>::new(
            true,
            &settings,
            &[],
            &[],
            |s| changes.borrow_mut().push(s),
            || closes.set(closes.get() + 1),
        );
        let mut dialogs = FakeDialogs {
            answer: Some(1),
            ..Default::default()
        };
        assert_eq!(screen.reset_all_data(&mut dialogs), ResetOutcome::Confirmed);
        drop(screen);

        assert_eq!(dialogs.confirms, 1);
        assert_eq!(changes.into_inner(), vec![Settings::default()]);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn cancelled_reset_does_nothing() {
        let settings = blue_light();
        let calls = Cell::new(0);
        let closes = Cell::new(0);
        let mut screen = SettingsScreen::<(), ()>::new(
            true,
            &settings,
            &[],
            &[],
            |_| calls.set(calls.get() + 1),
            || closes.set(closes.get() + 1),
        );
        for answer in [Some(0), None] {
            let mut dialogs = FakeDialogs {
                answer,
                ..Default::default()
            };
            assert_eq!(screen.reset_all_data(&mut dialogs), ResetOutcome::Cancelled);
        }
        drop(screen);
        assert_eq!(calls.get(), 0);
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn share_failure_alerts_once_without_mutation() {
        let settings = blue_light();
        let calls = Cell::new(0);
        let habits = [1, 2, 3];
        let achievements = ["a"];
        let mut screen = SettingsScreen::new(
            true,
            &settings,
            &habits,
            &achievements,
            |_| calls.set(calls.get() + 1),
            || {},
        );
        let mut share = FakeShare {
            result: Err(PlatformError::ShareDismissed),
            shared: Vec::new(),
        };
        let mut dialogs = FakeDialogs::default();
        assert_eq!(
            screen.share_progress(&mut share, &mut dialogs, date()),
            ShareOutcome::Failed
        );
        drop(screen);

        assert_eq!(share.shared.len(), 1);
        assert_eq!(dialogs.alerts.len(), 1);
        assert_eq!(dialogs.alerts[0].0, SHARE_FAILED_TITLE);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn share_success_sends_summary() {
        let settings = blue_light();
        let habits = [1, 2, 3];
        let achievements = ["a"];
        let mut screen = SettingsScreen::new(true, &settings, &habits, &achievements, |_| {}, || {});
        let mut share = FakeShare {
            result: Ok(()),
            shared: Vec::new(),
        };
        let mut dialogs = FakeDialogs::default();
        assert_eq!(
            screen.share_progress(&mut share, &mut dialogs, date()),
            ShareOutcome::Shared
        );
        assert!(dialogs.alerts.is_empty());
        let msg = &share.shared[0].message;
        assert!(msg.contains("Tracking 3 habits"));
        assert!(msg.contains("Unlocked 1 achievement\n"));
        assert!(msg.contains("March 10, 2024"));
        assert_eq!(share.shared[0].title, SHARE_TITLE);
    }

    #[test]
    fn test_notification_reports_both_outcomes() {
        let settings = blue_light();
        let mut screen = SettingsScreen::<(), ()>::new(true, &settings, &[], &[], |_| {}, || {});
        let mut dialogs = FakeDialogs::default();

        assert!(screen.send_test_notification(&mut FakeNotifier(Ok(())), &mut dialogs));
        assert!(!screen.send_test_notification(
            &mut FakeNotifier(Err(PlatformError::Unavailable("notifications"))),
            &mut dialogs
        ));
        assert_eq!(dialogs.alerts[0].0, TEST_SENT_TITLE);
        assert_eq!(dialogs.alerts[1].0, TEST_FAILED_TITLE);
    }

    #[test]
    fn render_reflects_settings_and_visibility() {
        let settings = blue_light().with_dark_mode(true);
        let habits = [(), ()];
        let screen = SettingsScreen::<(), ()>::new(true, &settings, &habits, &[], |_| {}, || {});
        let view = screen.render().unwrap();
        assert_eq!(view.palette, *theme::palette(ThemeName::Blue, true));
        assert_eq!(view.habit_count, 2);
        assert_eq!(view.achievement_count, 0);
        assert!(view.theme_selector.is_none());
        assert!(view.toggles[0].enabled);
        assert!(!view.toggles[2].enabled);

        let hidden = SettingsScreen::<(), ()>::new(false, &settings, &[], &[], |_| {}, || {});
        assert!(hidden.render().is_none());
    }
}
