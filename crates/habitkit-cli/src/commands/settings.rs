//! Settings commands. Toggles and theme changes go through the settings
//! screen; the store persists whatever it proposes.

use clap::Subcommand;
use habitkit_core::screen::{SettingToggle, SettingsView};
use habitkit_core::{CoreError, HabitDb, NotificationKind, SettingsStore};

use super::{print_json, with_screen, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Render the settings screen
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Get a value by dot-separated key (e.g. "theme", "notifications.streak")
    Get { key: String },
    /// Set a value by dot-separated key
    Set { key: String, value: String },
    /// Print the whole settings file
    List,
    /// Flip a switch: dark-mode, reminder, achievement or streak
    Toggle {
        name: String,
        /// on/off; flips the current value when omitted
        value: Option<String>,
    },
    /// List themes, or pick one by key
    Theme { name: Option<String> },
    /// Restore default settings
    Reset,
}

fn parse_toggle(name: &str) -> Result<SettingToggle, CoreError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "dark-mode" | "dark_mode" | "dark" => Ok(SettingToggle::DarkMode),
        other => Ok(SettingToggle::Notification(other.parse::<NotificationKind>()?)),
    }
}

fn parse_switch(value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(CoreError::Custom(format!("expected on or off, got '{other}'"))),
    }
}

fn print_view(view: &SettingsView) {
    println!("Settings");
    println!("  Theme: {} ({})", view.theme_label, view.palette.primary);
    for row in &view.toggles {
        let mark = if row.enabled { "on " } else { "off" };
        println!("  [{mark}] {:<20} {}", row.label, row.description);
    }
    println!("  Reminder time: {}", view.reminder_time);
    println!("  Tracking {} habits, {} achievements", view.habit_count, view.achievement_count);
    if let Some(options) = &view.theme_selector {
        println!("Themes");
        for opt in options {
            let mark = if opt.selected { "*" } else { " " };
            println!("  {mark} {:<8} {:<14} {}", opt.name, opt.label, opt.swatch);
        }
    }
}

pub fn run(action: SettingsAction) -> CliResult {
    let store = SettingsStore::open()?;

    match action {
        SettingsAction::Show { json } => {
            let settings = store.load()?;
            let db = HabitDb::open()?;
            let habits = db.list_habits(false)?;
            let achievements = db.list_achievements()?;
            let (view, _) = with_screen(&settings, &habits, &achievements, |screen| screen.render());
            if let Some(view) = view {
                if json {
                    print_json(&view)?;
                } else {
                    print_view(&view);
                }
            }
        }
        SettingsAction::Get { key } => {
            let settings = store.load()?;
            match SettingsStore::get(&settings, &key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        SettingsAction::Set { key, value } => {
            store.set(&key, &value)?;
            println!("ok");
        }
        SettingsAction::List => {
            let settings = store.load()?;
            print_json(&settings)?;
        }
        SettingsAction::Toggle { name, value } => {
            let toggle = parse_toggle(&name)?;
            let settings = store.load()?;
            let enabled = match value {
                Some(v) => parse_switch(&v)?,
                None => match toggle {
                    SettingToggle::DarkMode => !settings.is_dark_mode,
                    SettingToggle::Notification(kind) => !settings.notifications.is_enabled(kind),
                },
            };
            let ((), proposed) = with_screen(&settings, &[], &[], |screen| screen.toggle(toggle, enabled));
            if let Some(next) = proposed {
                store.save(&next)?;
            }
            println!("{}: {}", toggle.label(), if enabled { "on" } else { "off" });
        }
        SettingsAction::Theme { name } => {
            let settings = store.load()?;
            match name {
                Some(name) => {
                    let (result, proposed) =
                        with_screen(&settings, &[], &[], |screen| screen.select_theme(&name));
                    result?;
                    if let Some(next) = proposed {
                        store.save(&next)?;
                        println!("Theme: {}", next.theme.display_name());
                    }
                }
                None => {
                    let (view, _) = with_screen(&settings, &[], &[], |screen| {
                        screen.open_theme_selector();
                        screen.render()
                    });
                    let options = view.and_then(|v| v.theme_selector).unwrap_or_default();
                    for opt in options {
                        let mark = if opt.selected { "*" } else { " " };
                        println!("{mark} {:<8} {:<14} {}", opt.name, opt.label, opt.swatch);
                    }
                }
            }
        }
        SettingsAction::Reset => {
            store.reset()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
