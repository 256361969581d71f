//! Integration tests for the settings screen wired to real storage.

use std::cell::RefCell;

use chrono::{NaiveDate, TimeZone, Utc};
use habitkit_core::error::PlatformError;
use habitkit_core::habit::evaluate_achievements;
use habitkit_core::screen::{DialogButton, Dialogs, ShareRequest, ShareSheet};
use habitkit_core::{
    Habit, HabitDb, Notification, NotificationCenter, Notifier, ResetOutcome, Settings,
    SettingsScreen, SettingsStore, ShareOutcome, ThemeName,
};
use tempfile::TempDir;

struct ScriptedDialogs {
    answer: Option<usize>,
    alerts: Vec<String>,
}

impl Dialogs for ScriptedDialogs {
    fn alert(&mut self, title: &str, _message: &str) {
        self.alerts.push(title.to_string());
    }

    fn confirm(&mut self, _title: &str, _message: &str, _buttons: &[DialogButton]) -> Option<usize> {
        self.answer
    }
}

#[derive(Default)]
struct CapturingShare {
    shared: Vec<ShareRequest>,
}

impl ShareSheet for CapturingShare {
    fn share(&mut self, request: &ShareRequest) -> Result<(), PlatformError> {
        self.shared.push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
struct Inbox(Vec<Notification>);

impl Notifier for Inbox {
    fn deliver(&mut self, notification: &Notification) -> Result<(), PlatformError> {
        self.0.push(notification.clone());
        Ok(())
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn seed(db: &HabitDb) -> Habit {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let mut habit = Habit::new("Read", None, created).unwrap();
    for d in 1..=7 {
        habit.complete(day(d), day(10)).unwrap();
    }
    db.create_habit(&habit).unwrap();
    let earned = evaluate_achievements(&[habit.clone()], &[], created);
    db.record_achievements(&earned).unwrap();
    habit
}

#[test]
fn test_theme_change_persists_through_store() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::at(dir.path().join("settings.toml"));
    let settings = store.load().unwrap();
    let saved = RefCell::new(None);

    {
        let habits: Vec<Habit> = Vec::new();
        let mut screen = SettingsScreen::new(
            true,
            &settings,
            &habits,
            &[] as &[()],
            |next| *saved.borrow_mut() = Some(next),
            || {},
        );
        screen.open_theme_selector();
        screen.select_theme("orange").unwrap();
        assert!(!screen.is_theme_selector_visible());
        assert!(screen.select_theme("teal").is_err());
    }

    let next = saved.into_inner().unwrap();
    store.save(&next).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.theme, ThemeName::Orange);
    assert_eq!(reloaded.notifications, settings.notifications);
}

#[test]
fn test_share_counts_stored_data() {
    let dir = TempDir::new().unwrap();
    let db = HabitDb::open_at(&dir.path().join("habitkit.db")).unwrap();
    seed(&db);
    let habits = db.list_habits(false).unwrap();
    let achievements = db.list_achievements().unwrap();
    assert_eq!(achievements.len(), 2);

    let settings = Settings::default();
    let mut screen = SettingsScreen::new(true, &settings, &habits, &achievements, |_| {}, || {});
    let mut share = CapturingShare::default();
    let mut dialogs = ScriptedDialogs {
        answer: None,
        alerts: Vec::new(),
    };

    assert_eq!(
        screen.share_progress(&mut share, &mut dialogs, day(10)),
        ShareOutcome::Shared
    );
    assert!(dialogs.alerts.is_empty());
    let message = &share.shared[0].message;
    assert!(message.contains("Tracking 1 habit\n"));
    assert!(message.contains("Unlocked 2 achievements"));
    assert!(message.ends_with("Shared on March 10, 2024"));
}

#[test]
fn test_confirmed_reset_clears_store_and_database() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::at(dir.path().join("settings.toml"));
    let db = HabitDb::open_at(&dir.path().join("habitkit.db")).unwrap();
    seed(&db);
    store.set("theme", "pink").unwrap();
    let settings = store.load().unwrap();

    let habits = db.list_habits(true).unwrap();
    let achievements = db.list_achievements().unwrap();
    let proposed = RefCell::new(None);
    let closed = RefCell::new(0);
    let mut dialogs = ScriptedDialogs {
        answer: Some(1),
        alerts: Vec::new(),
    };

    let outcome = {
        let mut screen = SettingsScreen::new(
            true,
            &settings,
            &habits,
            &achievements,
            |next| *proposed.borrow_mut() = Some(next),
            || *closed.borrow_mut() += 1,
        );
        screen.reset_all_data(&mut dialogs)
    };
    assert_eq!(outcome, ResetOutcome::Confirmed);
    assert_eq!(*closed.borrow(), 1);

    store.save(&proposed.into_inner().unwrap()).unwrap();
    let summary = db.reset_all_data().unwrap();
    assert_eq!(summary.deleted_habits, 1);
    assert_eq!(summary.deleted_completions, 7);
    assert_eq!(summary.deleted_achievements, 2);
    assert_eq!(store.load().unwrap(), Settings::default());
    assert!(db.list_achievements().unwrap().is_empty());
}

#[test]
fn test_test_notification_goes_through_center() {
    let settings = Settings::default().with_notification(habitkit_core::NotificationKind::Reminder, false);
    let mut center = NotificationCenter::new(&settings, Inbox::default());
    let mut dialogs = ScriptedDialogs {
        answer: None,
        alerts: Vec::new(),
    };

    let sent = {
        let mut screen = SettingsScreen::new(true, &settings, &[] as &[()], &[] as &[()], |_| {}, || {});
        screen.send_test_notification(&mut center, &mut dialogs)
    };
    assert!(sent);
    assert_eq!(dialogs.alerts, vec!["Test Notification Sent".to_string()]);
    assert_eq!(center.into_notifier().0.len(), 1);
}
