use anyhow::{Context, Result};
use arboard::Clipboard;

/// Destination for extracted text.
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// The OS clipboard via arboard. A fresh handle per write keeps the sink
/// stateless and avoids holding the clipboard connection between hotkey
/// activations.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to open clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to write clipboard")
    }
}
