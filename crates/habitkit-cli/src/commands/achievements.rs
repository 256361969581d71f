use clap::Subcommand;
use habitkit_core::HabitDb;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// List unlocked achievements
    List {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AchievementsAction) -> CliResult {
    let db = HabitDb::open()?;

    match action {
        AchievementsAction::List { json } => {
            let achievements = db.list_achievements()?;
            if json {
                print_json(&achievements)?;
            } else if achievements.is_empty() {
                println!("No achievements unlocked yet.");
            } else {
                for a in &achievements {
                    println!(
                        "{}  {}  {}",
                        a.unlocked_at.format("%Y-%m-%d"),
                        a.title(),
                        a.kind.description()
                    );
                }
            }
        }
    }
    Ok(())
}
