use chrono::Local;
use clap::Subcommand;
use habitkit_core::{HabitDb, NotificationCenter, NotificationKind, SettingsStore};

use super::platform::{TerminalDialogs, TerminalNotifier};
use super::{today, with_screen, CliResult};

const LAST_REMINDER_KEY: &str = "last_reminder_day";

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Send a test notification
    Test,
    /// When the next daily reminder fires
    Next,
    /// Send today's reminder for habits still open (once per day)
    Reminder {
        /// Send even if today's reminder already went out
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: NotifyAction) -> CliResult {
    let settings = SettingsStore::open()?.load_or_default();

    match action {
        NotifyAction::Test => {
            let mut center = NotificationCenter::new(&settings, TerminalNotifier);
            let mut dialogs = TerminalDialogs::new(false);
            let (sent, _) = with_screen(&settings, &[], &[], |screen| {
                screen.send_test_notification(&mut center, &mut dialogs)
            });
            if !sent {
                std::process::exit(1);
            }
        }
        NotifyAction::Next => {
            let center = NotificationCenter::new(&settings, TerminalNotifier);
            if !center.manager().is_enabled(NotificationKind::Reminder) {
                println!("Daily reminders are off");
            } else {
                let next = center.manager().next_reminder_at(Local::now().naive_local());
                println!("Next reminder: {}", next.format("%Y-%m-%d %H:%M"));
            }
        }
        NotifyAction::Reminder { force } => {
            let db = HabitDb::open()?;
            let today = today();
            let day_key = today.format("%Y-%m-%d").to_string();
            if !force && db.kv_get(LAST_REMINDER_KEY)?.as_deref() == Some(day_key.as_str()) {
                println!("Today's reminder was already sent");
                return Ok(());
            }

            let habits = db.list_habits(false)?;
            let mut center = NotificationCenter::new(&settings, TerminalNotifier);
            if center.send_reminder(&habits, today)? {
                db.kv_set(LAST_REMINDER_KEY, &day_key)?;
            } else {
                println!("Nothing to remind about");
            }
        }
    }
    Ok(())
}
