//! Notification content and delivery.
//!
//! [`NotificationManager`] decides *whether* and *what* to notify based on the
//! user's settings. Delivery goes through the [`Notifier`] trait, which the
//! host implements (system notifications, terminal output, a test double).

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;
use crate::habit::{Achievement, Habit};
use crate::settings::{NotificationKind, NotificationSettings, ReminderTime, Settings};

/// Streak lengths that trigger a milestone notification.
pub const STREAK_MILESTONES: [u32; 7] = [3, 7, 14, 30, 50, 100, 365];

/// Category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Reminder,
    Achievement,
    Streak,
    Test,
}

/// A message ready to hand to the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub category: NotificationCategory,
    pub title: String,
    pub body: String,
}

/// Host capability that shows a notification.
pub trait Notifier {
    fn deliver(&mut self, notification: &Notification) -> Result<(), PlatformError>;
}

/// Builds notifications gated by the per-category switches.
#[derive(Debug, Clone, Copy)]
pub struct NotificationManager {
    switches: NotificationSettings,
    reminder_time: ReminderTime,
}

impl NotificationManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            switches: settings.notifications,
            reminder_time: settings.reminder_time,
        }
    }

    pub fn is_enabled(&self, kind: NotificationKind) -> bool {
        self.switches.is_enabled(kind)
    }

    /// Daily reminder listing habits still open today.
    pub fn reminder_for(&self, habits: &[Habit], today: NaiveDate) -> Option<Notification> {
        if !self.is_enabled(NotificationKind::Reminder) {
            return None;
        }

        let pending: Vec<&str> = habits
            .iter()
            .filter(|h| !h.archived && !h.is_completed_on(today))
            .map(|h| h.name.as_str())
            .collect();
        if pending.is_empty() {
            return None;
        }

        let body = match pending.as_slice() {
            [one] => format!("Don't forget to {one} today!"),
            [first, second] => format!("Still open today: {first} and {second}"),
            [first, rest @ ..] => format!("Still open today: {first} and {} more", rest.len()),
            [] => return None,
        };
        Some(Notification {
            category: NotificationCategory::Reminder,
            title: "Habit Reminder".into(),
            body,
        })
    }

    pub fn achievement_unlocked(&self, achievement: &Achievement) -> Option<Notification> {
        if !self.is_enabled(NotificationKind::Achievement) {
            return None;
        }
        Some(Notification {
            category: NotificationCategory::Achievement,
            title: "Achievement Unlocked!".into(),
            body: format!("{}: {}", achievement.title(), achievement.kind.description()),
        })
    }

    /// Milestone message when `streak` is one of [`STREAK_MILESTONES`].
    pub fn streak_milestone(&self, habit: &Habit, streak: u32) -> Option<Notification> {
        if !self.is_enabled(NotificationKind::Streak) || !STREAK_MILESTONES.contains(&streak) {
            return None;
        }
        Some(Notification {
            category: NotificationCategory::Streak,
            title: format!("{streak}-day streak!"),
            body: format!("You've kept up \"{}\" for {streak} days in a row.", habit.name),
        })
    }

    pub fn test_notification(&self) -> Notification {
        Notification {
            category: NotificationCategory::Test,
            title: "Test Notification".into(),
            body: "Notifications are working. Keep building those habits!".into(),
        }
    }

    /// Next local time the daily reminder fires, strictly after `now`.
    pub fn next_reminder_at(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today_at = now.date().and_time(self.reminder_time.as_naive_time());
        if today_at > now {
            today_at
        } else {
            today_at + Duration::days(1)
        }
    }
}

/// A manager paired with the host's delivery channel.
pub struct NotificationCenter<N: Notifier> {
    manager: NotificationManager,
    notifier: N,
}

impl<N: Notifier> NotificationCenter<N> {
    pub fn new(settings: &Settings, notifier: N) -> Self {
        Self {
            manager: NotificationManager::new(settings),
            notifier,
        }
    }

    pub fn manager(&self) -> &NotificationManager {
        &self.manager
    }

    pub fn into_notifier(self) -> N {
        self.notifier
    }

    fn deliver(&mut self, notification: Option<Notification>) -> Result<bool, PlatformError> {
        match notification {
            Some(n) => {
                self.notifier.deliver(&n)?;
                tracing::info!(category = ?n.category, title = %n.title, "notification delivered");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns whether anything was delivered.
    pub fn send_reminder(&mut self, habits: &[Habit], today: NaiveDate) -> Result<bool, PlatformError> {
        let n = self.manager.reminder_for(habits, today);
        self.deliver(n)
    }

    /// Returns how many notifications were delivered.
    pub fn send_achievements(&mut self, achievements: &[Achievement]) -> Result<usize, PlatformError> {
        let mut sent = 0;
        for a in achievements {
            let n = self.manager.achievement_unlocked(a);
            if self.deliver(n)? {
                sent += 1;
            }
        }
        Ok(sent)
    }

    /// Milestone for a completion that moved the current streak from
    /// `previous` to `current`. Nothing is sent unless the streak grew, so
    /// back-filling an old day does not repeat a milestone.
    pub fn send_streak(&mut self, habit: &Habit, previous: u32, current: u32) -> Result<bool, PlatformError> {
        if current <= previous {
            return Ok(false);
        }
        let n = self.manager.streak_milestone(habit, current);
        self.deliver(n)
    }

    /// Test notifications ignore the category switches.
    pub fn send_test(&mut self) -> Result<(), PlatformError> {
        let n = self.manager.test_notification();
        self.deliver(Some(n)).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone, Utc};

    #[derive(Default)]
    struct Recorder {
        sent: Vec<Notification>,
        fail: bool,
    }

    impl Notifier for Recorder {
        fn deliver(&mut self, notification: &Notification) -> Result<(), PlatformError> {
            if self.fail {
                return Err(PlatformError::Unavailable("notifications"));
            }
            self.sent.push(notification.clone());
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn habit(name: &str, done_today: bool) -> Habit {
        let mut h = Habit::new(name, None, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()).unwrap();
        if done_today {
            h.completions.insert(today());
        }
        h
    }

    #[test]
    fn reminder_lists_open_habits() {
        let m = NotificationManager::new(&Settings::default());
        let habits = vec![habit("read", false), habit("walk", true), habit("stretch", false)];
        let n = m.reminder_for(&habits, today()).unwrap();
        assert_eq!(n.category, NotificationCategory::Reminder);
        assert_eq!(n.body, "Still open today: read and stretch");
    }

    #[test]
    fn reminder_skipped_when_all_done_or_disabled() {
        let m = NotificationManager::new(&Settings::default());
        assert!(m.reminder_for(&[habit("walk", true)], today()).is_none());

        let off = Settings::default().with_notification(NotificationKind::Reminder, false);
        let m = NotificationManager::new(&off);
        assert!(m.reminder_for(&[habit("walk", false)], today()).is_none());
    }

    #[test]
    fn streak_milestones_only() {
        let m = NotificationManager::new(&Settings::default());
        let h = habit("walk", true);
        assert!(m.streak_milestone(&h, 7).is_some());
        assert!(m.streak_milestone(&h, 8).is_none());

        let off = Settings::default().with_notification(NotificationKind::Streak, false);
        assert!(NotificationManager::new(&off).streak_milestone(&h, 7).is_none());
    }

    #[test]
    fn backfilled_day_does_not_repeat_milestone() {
        let mut h = habit("walk", false);
        for d in 4..=10 {
            h.completions.insert(NaiveDate::from_ymd_opt(2024, 3, d).unwrap());
        }
        let mut center = NotificationCenter::new(&Settings::default(), Recorder::default());

        let before = crate::habit::current_streak(&h, today());
        h.complete(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), today()).unwrap();
        let after = crate::habit::current_streak(&h, today());
        assert_eq!((before, after), (7, 7));
        assert!(!center.send_streak(&h, before, after).unwrap());

        // Filling the gap joins the runs and reaches a new length.
        for d in 2..=3 {
            h.complete(NaiveDate::from_ymd_opt(2024, 3, d).unwrap(), today()).unwrap();
        }
        assert!(!center.send_streak(&h, 7, crate::habit::current_streak(&h, today())).unwrap());
        assert!(center.send_streak(&h, 6, 7).unwrap());
        assert_eq!(center.into_notifier().sent.len(), 1);
    }

    #[test]
    fn next_reminder_rolls_over_after_time_passed() {
        let m = NotificationManager::new(&Settings::default());
        let morning = today().and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(
            m.next_reminder_at(morning),
            today().and_time(NaiveTime::from_hms_opt(20, 0, 0).unwrap())
        );
        let exactly = today().and_time(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(m.next_reminder_at(exactly), exactly + Duration::days(1));
    }

    #[test]
    fn test_notification_ignores_switches() {
        let mut all_off = Settings::default();
        for kind in NotificationKind::ALL {
            all_off = all_off.with_notification(kind, false);
        }
        let mut center = NotificationCenter::new(&all_off, Recorder::default());
        center.send_test().unwrap();
        assert!(!center.send_reminder(&[habit("walk", false)], today()).unwrap());
        let recorder = center.into_notifier();
        assert_eq!(recorder.sent.len(), 1);
        assert_eq!(recorder.sent[0].category, NotificationCategory::Test);
    }

    #[test]
    fn delivery_failure_propagates() {
        let mut center = NotificationCenter::new(
            &Settings::default(),
            Recorder {
                fail: true,
                ..Default::default()
            },
        );
        assert_eq!(
            center.send_test().unwrap_err(),
            PlatformError::Unavailable("notifications")
        );
    }
}
