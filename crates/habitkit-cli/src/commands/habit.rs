//! Habit management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use habitkit_core::habit::{current_streak, evaluate_achievements, longest_streak};
use habitkit_core::{Achievement, CoreError, Habit, HabitDb, NotificationCenter, SettingsStore};

use super::platform::TerminalNotifier;
use super::{day_or_today, print_json, require_habit, today, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// List habits
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one habit
    Show {
        /// Habit id, id prefix, or name
        habit: String,
    },
    /// Mark a day as completed
    Done {
        /// Habit id, id prefix, or name
        habit: String,
        /// Day to mark (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Clear a completed day
    Undo {
        /// Habit id, id prefix, or name
        habit: String,
        /// Day to clear (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Rename a habit
    Rename {
        /// Habit id, id prefix, or name
        habit: String,
        /// New name
        name: String,
    },
    /// Archive a habit, or bring it back with --restore
    Archive {
        /// Habit id, id prefix, or name
        habit: String,
        #[arg(long)]
        restore: bool,
    },
    /// Delete a habit and its history
    Remove {
        /// Habit id, id prefix, or name
        habit: String,
    },
}

pub fn run(action: HabitAction) -> CliResult {
    let db = HabitDb::open()?;

    match action {
        HabitAction::Add { name, description } => {
            let habit = Habit::new(&name, description, Utc::now())?;
            db.create_habit(&habit)?;
            println!("Habit created: {}", habit.id);
            record_achievements(&db)?;
        }
        HabitAction::List { all, json } => {
            let habits = db.list_habits(all)?;
            if json {
                print_json(&habits)?;
            } else if habits.is_empty() {
                println!("No habits yet. Add one with `habitkit habit add <name>`.");
            } else {
                let today = today();
                for h in &habits {
                    let mark = if h.is_completed_on(today) { "x" } else { " " };
                    let archived = if h.archived { " (archived)" } else { "" };
                    println!(
                        "[{mark}] {}  {}{archived}  streak {}",
                        &h.id[..8.min(h.id.len())],
                        h.name,
                        current_streak(h, today)
                    );
                }
            }
        }
        HabitAction::Show { habit } => {
            let habit = require_habit(&db, &habit)?;
            let today = today();
            let detail = serde_json::json!({
                "habit": habit,
                "current_streak": current_streak(&habit, today),
                "longest_streak": longest_streak(&habit),
                "total_completions": habit.total_completions(),
            });
            print_json(&detail)?;
        }
        HabitAction::Done { habit, date } => {
            let mut habit = require_habit(&db, &habit)?;
            let day = day_or_today(date.as_deref())?;
            let today = today();
            let previous_streak = current_streak(&habit, today);
            if !habit.complete(day, today)? {
                println!("{} was already completed on {day}", habit.name);
                return Ok(());
            }
            db.set_completion(&habit.id, day, true)?;
            println!("Completed {} on {day}", habit.name);

            let settings = SettingsStore::open()?.load_or_default();
            let mut center = NotificationCenter::new(&settings, TerminalNotifier);
            let unlocked = record_achievements(&db)?;
            center.send_achievements(&unlocked)?;
            center.send_streak(&habit, previous_streak, current_streak(&habit, today))?;
        }
        HabitAction::Undo { habit, date } => {
            let mut habit = require_habit(&db, &habit)?;
            let day = day_or_today(date.as_deref())?;
            if habit.uncomplete(day) {
                db.set_completion(&habit.id, day, false)?;
                println!("Cleared {} on {day}", habit.name);
            } else {
                println!("{} was not completed on {day}", habit.name);
            }
        }
        HabitAction::Rename { habit, name } => {
            let mut habit = require_habit(&db, &habit)?;
            habit.rename(&name)?;
            db.update_habit(&habit)?;
            println!("Habit renamed: {}", habit.name);
        }
        HabitAction::Archive { habit, restore } => {
            let mut habit = require_habit(&db, &habit)?;
            habit.archived = !restore;
            db.update_habit(&habit)?;
            if restore {
                println!("Habit restored: {}", habit.name);
            } else {
                println!("Habit archived: {}", habit.name);
            }
        }
        HabitAction::Remove { habit } => {
            let habit = require_habit(&db, &habit)?;
            db.delete_habit(&habit.id)?;
            println!("Habit deleted: {}", habit.name);
        }
    }
    Ok(())
}

/// Evaluate and store newly earned achievements.
fn record_achievements(db: &HabitDb) -> Result<Vec<Achievement>, CoreError> {
    let habits = db.list_habits(true)?;
    let unlocked = db.list_achievements()?;
    let earned = evaluate_achievements(&habits, &unlocked, Utc::now());
    if !earned.is_empty() {
        db.record_achievements(&earned)?;
        tracing::info!(count = earned.len(), "achievements unlocked");
    }
    Ok(earned)
}
