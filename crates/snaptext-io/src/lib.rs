mod clipboard;
mod dialog;
mod notify;

pub use clipboard::{ClipboardSink, SystemClipboard};
pub use dialog::{pick_folder, show_error_blocking};
pub use notify::{DesktopNotifier, NotificationSink};
