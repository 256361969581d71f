use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "habitkit", version, about = "HabitKit habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Streaks and calendar statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Settings screen and preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Unlocked achievements
    Achievements {
        #[command(subcommand)]
        action: commands::achievements::AchievementsAction,
    },
    /// Share a progress summary
    Share {
        /// Write the summary to a file instead of stdout
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },
    /// Notifications
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Delete all habits, progress and achievements and restore default settings
    Reset {
        /// Confirm without prompting
        #[arg(long)]
        yes: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("HABITKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Achievements { action } => commands::achievements::run(action),
        Commands::Share { output } => commands::share::run(output),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
