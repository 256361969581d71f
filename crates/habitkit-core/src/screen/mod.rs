//! Settings screen: controller, host capabilities and view model.

mod platform;
mod settings_screen;
mod view;

pub use platform::{ButtonStyle, DialogButton, Dialogs, ShareRequest, ShareSheet, TestNotifier};
pub use settings_screen::{
    share_message, ResetOutcome, SettingsScreen, ShareOutcome, RESET_BUTTONS, RESET_MESSAGE,
    RESET_TITLE, SHARE_FAILED_MESSAGE, SHARE_FAILED_TITLE, SHARE_TITLE, TEST_FAILED_TITLE,
    TEST_SENT_TITLE,
};
pub use view::{SettingToggle, SettingsView, ThemeOption, ToggleRow};
