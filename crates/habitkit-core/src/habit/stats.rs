//! Streak and calendar statistics for habits.
//!
//! All functions take `today` explicitly so results are reproducible. A day
//! counts towards a completion rate when it has passed (or is today and
//! already completed) and the habit existed on it:
//! - **Completed**: the day is in the habit's completion set
//! - **Missed**: a past day after creation without a completion
//! - **Pending**: today, not completed yet
//! - **Future** / **BeforeCreated**: not counted

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Habit;
use crate::error::ValidationError;

/// Status of one calendar day for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Completed,
    Missed,
    Pending,
    Future,
    BeforeCreated,
}

impl DayStatus {
    fn counts_towards_rate(&self) -> bool {
        matches!(self, DayStatus::Completed | DayStatus::Missed)
    }
}

/// One cell of the month grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Month view for a single habit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthStatistics {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayCell>,
    /// Completed days in the month
    pub completed: u32,
    /// Days that count towards the completion rate
    pub eligible: u32,
    /// Ratio of completed to eligible days (0.0 to 1.0)
    pub completion_rate: f64,
}

/// Per-month totals inside a year view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: u32,
    pub completed: u32,
    pub eligible: u32,
}

/// Year view for a single habit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearStatistics {
    pub year: i32,
    pub months: Vec<MonthSummary>,
    pub completed: u32,
    pub eligible: u32,
    pub completion_rate: f64,
    /// Month with the most completions; earliest wins ties, `None` if empty
    pub best_month: Option<u32>,
}

/// Cross-habit summary for the home screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overview {
    pub active_habits: usize,
    pub completed_today: usize,
    pub total_completions: usize,
    pub best_current_streak: u32,
    pub best_current_streak_habit: Option<String>,
    pub longest_streak: u32,
}

/// Consecutive completed days ending today, or ending yesterday when today
/// is still open.
pub fn current_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let start = if habit.is_completed_on(today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    let mut day = start;
    while habit.is_completed_on(day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive completed days ever recorded.
pub fn longest_streak(habit: &Habit) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &day in &habit.completions {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

/// Classify a single day.
pub fn day_status(habit: &Habit, day: NaiveDate, today: NaiveDate) -> DayStatus {
    if day > today {
        DayStatus::Future
    } else if habit.is_completed_on(day) {
        DayStatus::Completed
    } else if day < habit.created_on() {
        DayStatus::BeforeCreated
    } else if day == today {
        DayStatus::Pending
    } else {
        DayStatus::Missed
    }
}

fn days_in_month(year: i32, month: u32) -> Result<u32, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ValidationError::InvalidMonth(month))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(ValidationError::InvalidMonth(month))?;
    Ok((next - first).num_days() as u32)
}

fn rate(completed: u32, eligible: u32) -> f64 {
    if eligible == 0 {
        0.0
    } else {
        completed as f64 / eligible as f64
    }
}

/// Calendar grid and completion rate for one month.
///
/// # Errors
/// Returns [`ValidationError::InvalidMonth`] when `month` is outside 1-12.
pub fn month_statistics(
    habit: &Habit,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<MonthStatistics, ValidationError> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth(month));
    }
    let len = days_in_month(year, month)?;

    let mut days = Vec::with_capacity(len as usize);
    let mut completed = 0;
    let mut eligible = 0;
    for d in 1..=len {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, d) else {
            continue;
        };
        let status = day_status(habit, date, today);
        if status == DayStatus::Completed {
            completed += 1;
        }
        if status.counts_towards_rate() {
            eligible += 1;
        }
        days.push(DayCell { date, status });
    }

    Ok(MonthStatistics {
        year,
        month,
        days,
        completed,
        eligible,
        completion_rate: rate(completed, eligible),
    })
}

/// Per-month totals and completion rate for one year.
pub fn year_statistics(habit: &Habit, year: i32, today: NaiveDate) -> YearStatistics {
    let months: Vec<MonthSummary> = (1..=12)
        .filter_map(|m| month_statistics(habit, year, m, today).ok())
        .map(|s| MonthSummary {
            month: s.month,
            completed: s.completed,
            eligible: s.eligible,
        })
        .collect();

    let completed = months.iter().map(|m| m.completed).sum();
    let eligible = months.iter().map(|m| m.eligible).sum();

    let mut best_month = None;
    let mut best = 0;
    for m in &months {
        if m.completed > best {
            best = m.completed;
            best_month = Some(m.month);
        }
    }

    YearStatistics {
        year,
        months,
        completed,
        eligible,
        completion_rate: rate(completed, eligible),
        best_month,
    }
}

/// Totals across all non-archived habits.
pub fn overview(habits: &[Habit], today: NaiveDate) -> Overview {
    let mut out = Overview::default();
    for habit in habits.iter().filter(|h| !h.archived) {
        out.active_habits += 1;
        if habit.is_completed_on(today) {
            out.completed_today += 1;
        }
        out.total_completions += habit.total_completions();

        let current = current_streak(habit, today);
        if current > out.best_current_streak {
            out.best_current_streak = current;
            out.best_current_streak_habit = Some(habit.name.clone());
        }
        out.longest_streak = out.longest_streak.max(longest_streak(habit));
    }
    out
}
