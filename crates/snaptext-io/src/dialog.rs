use std::path::PathBuf;

use rfd::{FileDialog, MessageDialog, MessageLevel};

/// Modal error dialog; returns when the user dismisses it.
pub fn show_error_blocking(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .show();
}

/// Native folder picker; `None` when cancelled.
pub fn pick_folder(title: &str) -> Option<PathBuf> {
    FileDialog::new().set_title(title).pick_folder()
}
