//! Terminal implementations of the host capabilities.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use habitkit_core::error::PlatformError;
use habitkit_core::screen::{ButtonStyle, DialogButton, Dialogs, ShareRequest, ShareSheet};
use habitkit_core::{Notification, Notifier};

/// Alerts go to stderr; confirmations read a line from stdin.
pub struct TerminalDialogs {
    /// Pick the destructive button without asking
    pub assume_yes: bool,
}

impl TerminalDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// Match typed input against button labels or 1-based positions.
fn pick_button(input: &str, buttons: &[DialogButton]) -> Option<usize> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return (1..=buttons.len()).contains(&n).then(|| n - 1);
    }
    buttons
        .iter()
        .position(|b| b.label.eq_ignore_ascii_case(input))
}

impl Dialogs for TerminalDialogs {
    fn alert(&mut self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }

    fn confirm(&mut self, title: &str, message: &str, buttons: &[DialogButton]) -> Option<usize> {
        if self.assume_yes {
            return buttons
                .iter()
                .position(|b| b.style == ButtonStyle::Destructive);
        }

        let choices: Vec<String> = buttons
            .iter()
            .enumerate()
            .map(|(i, b)| format!("[{}] {}", i + 1, b.label))
            .collect();
        eprintln!("{title}\n{message}");
        eprint!("{} > ", choices.join("  "));
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => pick_button(&line, buttons),
        }
    }
}

/// Writes the share text to a file, or to stdout when no file is given.
pub struct FileOrStdoutShare {
    pub output: Option<PathBuf>,
}

impl ShareSheet for FileOrStdoutShare {
    fn share(&mut self, request: &ShareRequest) -> Result<(), PlatformError> {
        let failed = |e: std::io::Error| PlatformError::Failed {
            capability: "share",
            message: e.to_string(),
        };
        match &self.output {
            Some(path) => std::fs::write(path, format!("{}\n", request.message)).map_err(failed),
            None => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "{}", request.message).map_err(failed)
            }
        }
    }
}

/// Prints notifications to stdout.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn deliver(&mut self, notification: &Notification) -> Result<(), PlatformError> {
        println!("[{}] {}", notification.title, notification.body);
        Ok(())
    }
}
