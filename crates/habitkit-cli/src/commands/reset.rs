use habitkit_core::{HabitDb, ResetOutcome, SettingsStore};

use super::platform::TerminalDialogs;
use super::{with_screen, CliResult};

pub fn run(yes: bool) -> CliResult {
    let store = SettingsStore::open()?;
    let settings = store.load_or_default();
    let db = HabitDb::open()?;
    let habits = db.list_habits(true)?;
    let achievements = db.list_achievements()?;

    let mut dialogs = TerminalDialogs::new(yes);
    let (outcome, proposed) = with_screen(&settings, &habits, &achievements, |screen| {
        screen.reset_all_data(&mut dialogs)
    });

    match outcome {
        ResetOutcome::Confirmed => {
            let summary = db.reset_all_data()?;
            if let Some(next) = proposed {
                store.save(&next)?;
            }
            println!(
                "Deleted {} habits, {} completions, {} achievements",
                summary.deleted_habits, summary.deleted_completions, summary.deleted_achievements
            );
        }
        ResetOutcome::Cancelled => println!("reset cancelled"),
    }
    Ok(())
}
