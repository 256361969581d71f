//! Milestones unlocked by streaks and completion counts.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stats::longest_streak;
use super::Habit;

/// Active habits needed for [`AchievementKind::HabitCollector`].
pub const COLLECTOR_THRESHOLD: usize = 5;

/// Kinds of achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    /// First completion of a habit
    FirstStep,
    /// 7-day streak
    WeekStreak,
    /// 30-day streak
    MonthStreak,
    /// 100-day streak
    CenturyStreak,
    /// 10 completions of one habit
    TenCompletions,
    /// 100 completions of one habit
    HundredCompletions,
    /// Several active habits at once (global)
    HabitCollector,
}

impl AchievementKind {
    pub const PER_HABIT: [AchievementKind; 6] = [
        AchievementKind::FirstStep,
        AchievementKind::WeekStreak,
        AchievementKind::MonthStreak,
        AchievementKind::CenturyStreak,
        AchievementKind::TenCompletions,
        AchievementKind::HundredCompletions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementKind::FirstStep => "first_step",
            AchievementKind::WeekStreak => "week_streak",
            AchievementKind::MonthStreak => "month_streak",
            AchievementKind::CenturyStreak => "century_streak",
            AchievementKind::TenCompletions => "ten_completions",
            AchievementKind::HundredCompletions => "hundred_completions",
            AchievementKind::HabitCollector => "habit_collector",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first_step" => Some(AchievementKind::FirstStep),
            "week_streak" => Some(AchievementKind::WeekStreak),
            "month_streak" => Some(AchievementKind::MonthStreak),
            "century_streak" => Some(AchievementKind::CenturyStreak),
            "ten_completions" => Some(AchievementKind::TenCompletions),
            "hundred_completions" => Some(AchievementKind::HundredCompletions),
            "habit_collector" => Some(AchievementKind::HabitCollector),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::FirstStep => "First Step",
            AchievementKind::WeekStreak => "Week Warrior",
            AchievementKind::MonthStreak => "Monthly Master",
            AchievementKind::CenturyStreak => "Century Club",
            AchievementKind::TenCompletions => "Getting Started",
            AchievementKind::HundredCompletions => "Dedicated",
            AchievementKind::HabitCollector => "Habit Collector",
        }
    }

    pub fn description(&self) -> String {
        match self {
            AchievementKind::FirstStep => "Complete a habit for the first time".into(),
            AchievementKind::WeekStreak => "Keep a 7-day streak".into(),
            AchievementKind::MonthStreak => "Keep a 30-day streak".into(),
            AchievementKind::CenturyStreak => "Keep a 100-day streak".into(),
            AchievementKind::TenCompletions => "Complete a habit 10 times".into(),
            AchievementKind::HundredCompletions => "Complete a habit 100 times".into(),
            AchievementKind::HabitCollector => {
                format!("Track {COLLECTOR_THRESHOLD} habits at the same time")
            }
        }
    }

    fn is_met_by(&self, habit: &Habit) -> bool {
        match self {
            AchievementKind::FirstStep => habit.total_completions() >= 1,
            AchievementKind::WeekStreak => longest_streak(habit) >= 7,
            AchievementKind::MonthStreak => longest_streak(habit) >= 30,
            AchievementKind::CenturyStreak => longest_streak(habit) >= 100,
            AchievementKind::TenCompletions => habit.total_completions() >= 10,
            AchievementKind::HundredCompletions => habit.total_completions() >= 100,
            AchievementKind::HabitCollector => false,
        }
    }
}

/// An unlocked achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    /// `None` for global achievements
    pub habit_id: Option<String>,
    pub habit_name: Option<String>,
    pub unlocked_at: DateTime<Utc>,
}

impl Achievement {
    pub fn title(&self) -> String {
        match &self.habit_name {
            Some(name) => format!("{} ({name})", self.kind.title()),
            None => self.kind.title().to_string(),
        }
    }
}

/// Achievements newly earned by `habits` that are not already in `unlocked`.
///
/// Streak achievements use the longest streak ever recorded, so a broken
/// streak never takes an achievement away and backfilled history counts.
pub fn evaluate(habits: &[Habit], unlocked: &[Achievement], now: DateTime<Utc>) -> Vec<Achievement> {
    let have: HashSet<(AchievementKind, Option<&str>)> = unlocked
        .iter()
        .map(|a| (a.kind, a.habit_id.as_deref()))
        .collect();

    let mut earned = Vec::new();
    for habit in habits {
        for kind in AchievementKind::PER_HABIT {
            if have.contains(&(kind, Some(habit.id.as_str()))) || !kind.is_met_by(habit) {
                continue;
            }
            earned.push(Achievement {
                kind,
                habit_id: Some(habit.id.clone()),
                habit_name: Some(habit.name.clone()),
                unlocked_at: now,
            });
        }
    }

    let active = habits.iter().filter(|h| !h.archived).count();
    if active >= COLLECTOR_THRESHOLD && !have.contains(&(AchievementKind::HabitCollector, None)) {
        earned.push(Achievement {
            kind: AchievementKind::HabitCollector,
            habit_id: None,
            habit_name: None,
            unlocked_at: now,
        });
    }

    earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn habit_with_run(name: &str, days: i64) -> Habit {
        let mut h = Habit::new(name, None, now() - Duration::days(400)).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for i in 0..days {
            h.completions.insert(end - Duration::days(i));
        }
        h
    }

    fn kinds(list: &[Achievement]) -> Vec<AchievementKind> {
        list.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn nothing_for_untouched_habit() {
        let h = habit_with_run("Stretch", 0);
        assert!(evaluate(&[h], &[], now()).is_empty());
    }

    #[test]
    fn week_streak_unlocks_first_step_too() {
        let h = habit_with_run("Stretch", 7);
        let got = evaluate(&[h], &[], now());
        assert_eq!(
            kinds(&got),
            vec![AchievementKind::FirstStep, AchievementKind::WeekStreak]
        );
        assert_eq!(got[1].title(), "Week Warrior (Stretch)");
    }

    #[test]
    fn already_unlocked_is_not_repeated() {
        let h = habit_with_run("Stretch", 12);
        let first = evaluate(std::slice::from_ref(&h), &[], now());
        assert_eq!(
            kinds(&first),
            vec![
                AchievementKind::FirstStep,
                AchievementKind::WeekStreak,
                AchievementKind::TenCompletions
            ]
        );
        assert!(evaluate(&[h], &first, now()).is_empty());
    }

    #[test]
    fn collector_counts_active_habits_only() {
        let mut habits: Vec<Habit> = (0..COLLECTOR_THRESHOLD)
            .map(|i| habit_with_run(&format!("Habit {i}"), 0))
            .collect();
        let got = evaluate(&habits, &[], now());
        assert_eq!(kinds(&got), vec![AchievementKind::HabitCollector]);
        assert!(got[0].habit_id.is_none());

        habits[0].archived = true;
        assert!(evaluate(&habits, &[], now()).is_empty());
    }

    #[test]
    fn kind_string_roundtrip() {
        for kind in AchievementKind::PER_HABIT {
            assert_eq!(AchievementKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(AchievementKind::parse("nope"), None);
    }
}
