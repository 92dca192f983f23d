//! Row actions that leave the terminal: clipboard and browser
//!
//! Both are fire-and-forget; failures come back as errors for a toast.

use anyhow::{Context, Result};

/// Copy `text` to the system clipboard
///
/// # Errors
///
/// Returns error if no clipboard is available (headless session, no
/// display server) or the write is rejected.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to write to clipboard")
}

/// Open a video URL in the default browser or player
pub fn open_url(url: &str) -> Result<()> {
    if !is_openable(url) {
        anyhow::bail!("Refusing to open non-http URL: {}", url);
    }
    open::that_detached(url).with_context(|| format!("Failed to open {}", url))
}

/// Only http(s) links are handed to the OS opener
fn is_openable(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_http_urls_are_openable() {
        assert!(is_openable("https://example.com/video1.mp4"));
        assert!(is_openable("http://example.com/v.mp4"));
        assert!(!is_openable("file:///etc/passwd"));
        assert!(!is_openable("rm -rf /"));
    }

    #[test]
    fn test_open_rejects_non_http() {
        assert!(open_url("javascript:alert(1)").is_err());
    }
}
