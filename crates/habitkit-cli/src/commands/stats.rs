use chrono::Datelike;
use clap::Subcommand;
use habitkit_core::habit::{current_streak, longest_streak, month_statistics, overview, year_statistics, DayStatus};
use habitkit_core::HabitDb;

use super::{print_json, require_habit, today, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Summary across all active habits
    Overview {
        #[arg(long)]
        json: bool,
    },
    /// Current and longest streak of one habit
    Streak {
        /// Habit id, id prefix, or name
        habit: String,
        #[arg(long)]
        json: bool,
    },
    /// Calendar month view of one habit
    Month {
        /// Habit id, id prefix, or name
        habit: String,
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: current)
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Per-month totals of one habit for a year
    Year {
        /// Habit id, id prefix, or name
        habit: String,
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

fn status_mark(status: DayStatus) -> char {
    match status {
        DayStatus::Completed => 'x',
        DayStatus::Missed => '.',
        DayStatus::Pending => '?',
        DayStatus::Future | DayStatus::BeforeCreated => ' ',
    }
}

pub fn run(action: StatsAction) -> CliResult {
    let db = HabitDb::open()?;
    let today = today();

    match action {
        StatsAction::Overview { json } => {
            let habits = db.list_habits(false)?;
            let stats = overview(&habits, today);
            if json {
                print_json(&stats)?;
            } else {
                println!("Active habits:      {}", stats.active_habits);
                println!("Completed today:    {}", stats.completed_today);
                println!("Total completions:  {}", stats.total_completions);
                match &stats.best_current_streak_habit {
                    Some(name) => println!("Best streak now:    {} days ({name})", stats.best_current_streak),
                    None => println!("Best streak now:    0 days"),
                }
                println!("Longest streak:     {} days", stats.longest_streak);
            }
        }
        StatsAction::Streak { habit, json } => {
            let habit = require_habit(&db, &habit)?;
            let current = current_streak(&habit, today);
            let longest = longest_streak(&habit);
            if json {
                print_json(&serde_json::json!({
                    "habit_id": habit.id,
                    "name": habit.name,
                    "current_streak": current,
                    "longest_streak": longest,
                }))?;
            } else {
                println!("{}: current streak {current}, longest {longest}", habit.name);
            }
        }
        StatsAction::Month {
            habit,
            year,
            month,
            json,
        } => {
            let habit = require_habit(&db, &habit)?;
            let stats = month_statistics(
                &habit,
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
                today,
            )?;
            if json {
                print_json(&stats)?;
            } else {
                println!("{} {:04}-{:02}", habit.name, stats.year, stats.month);
                let row: String = stats.days.iter().map(|d| status_mark(d.status)).collect();
                println!("{row}");
                println!(
                    "{}/{} days ({})",
                    stats.completed,
                    stats.eligible,
                    percent(stats.completion_rate)
                );
            }
        }
        StatsAction::Year { habit, year, json } => {
            let habit = require_habit(&db, &habit)?;
            let stats = year_statistics(&habit, year.unwrap_or(today.year()), today);
            if json {
                print_json(&stats)?;
            } else {
                println!("{} {}", habit.name, stats.year);
                for m in &stats.months {
                    println!("  {:02}: {:>2}/{:<2}", m.month, m.completed, m.eligible);
                }
                println!(
                    "{}/{} days ({})",
                    stats.completed,
                    stats.eligible,
                    percent(stats.completion_rate)
                );
                if let Some(best) = stats.best_month {
                    println!("Best month: {best:02}");
                }
            }
        }
    }
    Ok(())
}
