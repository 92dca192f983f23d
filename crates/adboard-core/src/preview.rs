//! Debounced hover preview
//!
//! Hover enter/leave over a preview cell is noisy when the pointer sweeps
//! across rows. Intents are delivered only after they have been stable for
//! [`HOVER_DELAY`]; a newer intent aborts the pending one, and so do
//! [`HoverDebouncer::cancel`] and drop.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay before a hover intent takes effect
pub const HOVER_DELAY: Duration = Duration::from_millis(100);

/// Requested change of the preview popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewIntent {
    /// Show the preview of this material id
    Show(String),
    Hide,
}

/// Coalesces hover intents; requires a tokio runtime
pub struct HoverDebouncer {
    delay: Duration,
    tx: mpsc::UnboundedSender<PreviewIntent>,
    pending: Option<JoinHandle<()>>,
}

impl HoverDebouncer {
    /// Debouncer plus the receiver its settled intents arrive on
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<PreviewIntent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                tx,
                pending: None,
            },
            rx,
        )
    }

    pub fn with_default_delay() -> (Self, mpsc::UnboundedReceiver<PreviewIntent>) {
        Self::new(HOVER_DELAY)
    }

    /// Replace any pending intent with `intent`
    pub fn schedule(&mut self, intent: PreviewIntent) {
        self.cancel();

        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(?intent, "Hover intent settled");
            let _ = tx.send(intent);
        }));
    }

    pub fn enter(&mut self, material_id: impl Into<String>) {
        self.schedule(PreviewIntent::Show(material_id.into()));
    }

    pub fn leave(&mut self) {
        self.schedule(PreviewIntent::Hide);
    }

    /// Abort the pending intent, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for HoverDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Currently shown preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewState {
    active: Option<String>,
}

impl PreviewState {
    pub fn apply(&mut self, intent: PreviewIntent) {
        self.active = match intent {
            PreviewIntent::Show(id) => Some(id),
            PreviewIntent::Hide => None,
        };
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    #[tokio::test(start_paused = true)]
    async fn test_intent_fires_after_delay() {
        let (mut debouncer, mut rx) = HoverDebouncer::with_default_delay();
        debouncer.enter("7");
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(rx.recv().await, Some(PreviewIntent::Show("7".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_intent_replaces_pending() {
        let (mut debouncer, mut rx) = HoverDebouncer::with_default_delay();
        debouncer.enter("1");
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.enter("2");
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.leave();

        assert_eq!(rx.recv().await, Some(PreviewIntent::Hide));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_stale_intent() {
        let (mut debouncer, mut rx) = HoverDebouncer::with_default_delay();
        debouncer.enter("3");
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending() {
        let (mut debouncer, mut rx) = HoverDebouncer::with_default_delay();
        debouncer.enter("4");
        drop(debouncer);

        // Channel closes without delivering the aborted intent
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_preview_state() {
        let mut state = PreviewState::default();
        state.apply(PreviewIntent::Show("9".to_string()));
        assert_eq!(state.active(), Some("9"));
        state.apply(PreviewIntent::Hide);
        assert_eq!(state.active(), None);
    }
}
