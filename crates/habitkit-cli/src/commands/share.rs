use std::path::PathBuf;

use habitkit_core::{HabitDb, SettingsStore, ShareOutcome};

use super::platform::{FileOrStdoutShare, TerminalDialogs};
use super::{today, with_screen, CliResult};

pub fn run(output: Option<PathBuf>) -> CliResult {
    let settings = SettingsStore::open()?.load_or_default();
    let db = HabitDb::open()?;
    let habits = db.list_habits(false)?;
    let achievements = db.list_achievements()?;

    let mut share = FileOrStdoutShare {
        output: output.clone(),
    };
    let mut dialogs = TerminalDialogs::new(false);
    let (outcome, _) = with_screen(&settings, &habits, &achievements, |screen| {
        screen.share_progress(&mut share, &mut dialogs, today())
    });

    match outcome {
        ShareOutcome::Shared => {
            if let Some(path) = output {
                println!("Progress written to {}", path.display());
            }
        }
        // The screen already showed the failure alert.
        ShareOutcome::Failed => std::process::exit(1),
    }
    Ok(())
}
