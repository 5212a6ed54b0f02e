use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::navigation::shareable_url;

/// Maximum clipboard payload (64KB). Share links are short; anything larger is a bug.
const MAX_CLIPBOARD_SIZE: usize = 64 * 1024;

/// Trait for clipboard operations (allows mocking in tests)
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Real clipboard implementation using arboard
struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

fn share_link_with_provider(
    base_url: &str,
    session_id: &str,
    provider: &mut dyn ClipboardProvider,
) -> Result<String> {
    if session_id.is_empty() {
        anyhow::bail!("No session selected");
    }
    let link = shareable_url(base_url, session_id);
    validate_clipboard_text(&link)?;
    provider.set_text(&link)?;
    Ok(link)
}

/// Copy text to the system clipboard.
///
/// # Errors
/// Returns error if:
/// - Text is empty or larger than 64KB
/// - Clipboard access is denied or unavailable (headless environment)
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    // Validate first, before initializing clipboard (for better error messages in CI)
    validate_clipboard_text(text)?;

    let mut clipboard = SystemClipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Copy the shareable link for `session_id` and return it
pub fn copy_share_link(base_url: &str, session_id: &str) -> Result<String> {
    if session_id.is_empty() {
        anyhow::bail!("No session selected");
    }
    let mut clipboard = SystemClipboard::new()?;
    share_link_with_provider(base_url, session_id, &mut clipboard)
}
