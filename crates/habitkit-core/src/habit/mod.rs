mod achievements;
mod model;
mod stats;

pub use achievements::{evaluate as evaluate_achievements, Achievement, AchievementKind, COLLECTOR_THRESHOLD};
pub use model::{validate_name, Habit, MAX_NAME_LEN};
pub use stats::{
    current_streak, day_status, longest_streak, month_statistics, overview, year_statistics,
    DayCell, DayStatus, MonthStatistics, MonthSummary, Overview, YearStatistics,
};
