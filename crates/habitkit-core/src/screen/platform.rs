use serde::{Deserialize, Serialize};

use crate::error::PlatformError;
use crate::notifications::{NotificationCenter, Notifier};

/// Text handed to the share sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub title: String,
    pub message: String,
}

/// Host share sheet. A dismissed sheet is an error too.
pub trait ShareSheet {
    fn share(&mut self, request: &ShareRequest) -> Result<(), PlatformError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Default,
    Cancel,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    pub label: &'static str,
    pub style: ButtonStyle,
}

/// Host alert and confirmation dialogs.
pub trait Dialogs {
    fn alert(&mut self, title: &str, message: &str);

    /// Index of the pressed button, or `None` if the dialog was dismissed.
    fn confirm(&mut self, title: &str, message: &str, buttons: &[DialogButton]) -> Option<usize>;
}

/// Host capability behind the "send test notification" row.
pub trait TestNotifier {
    fn send_test_notification(&mut self) -> Result<(), PlatformError>;
}

impl<N: Notifier> TestNotifier for NotificationCenter<N> {
    fn send_test_notification(&mut self) -> Result<(), PlatformError> {
        self.send_test()
    }
}
