use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::models::{HistoryItem, PasteMode};

/// Upper bound on text placed back on the clipboard; anything larger than
/// this did not come from a sane history entry.
const MAX_COPY_SIZE: usize = 4 * 1024 * 1024;

/// Clipboard writer seam; the mock implementation keeps tests off the real
/// system clipboard.
trait ClipboardWriter {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardWriter for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_copy_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("History entry has no text to copy");
    }
    if text.len() > MAX_COPY_SIZE {
        anyhow::bail!(
            "History entry too large to copy back ({} bytes, max {})",
            text.len(),
            MAX_COPY_SIZE
        );
    }
    Ok(())
}

/// Copy with an injected writer (test use).
#[cfg(test)]
fn copy_with_writer(item: &HistoryItem, writer: &mut dyn ClipboardWriter) -> Result<PasteMode> {
    let text = item.normalized_text();
    validate_copy_text(&text)?;
    writer.set_text(&text)?;
    Ok(item.paste_mode())
}

/// Place a history entry's normalized text back on the system clipboard.
///
/// CRLF line endings are collapsed to LF first, matching what a paste into an
/// editor buffer expects. Returns the entry's [`PasteMode`] so callers can
/// report whether a linewise or characterwise paste was staged.
pub fn copy_item(item: &HistoryItem) -> Result<PasteMode> {
    let text = item.normalized_text();
    validate_copy_text(&text)?;

    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(&text)?;
    Ok(item.paste_mode())
}
