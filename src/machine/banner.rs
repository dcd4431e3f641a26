//! Transient informational banner
//!
//! Shows one line of text for a fixed window, then auto-dismisses. The
//! dismiss timer is its own spawned task with its own cancellation handle;
//! it is never chained to the confirmation-tone timer. Re-showing cancels
//! the previous timer so the new message always gets the full window.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Drives the transient message banner
pub struct BannerController {
    display_ms: u64,
    message: Arc<RwLock<Option<String>>>,
    dismiss: Mutex<Option<JoinHandle<()>>>,
}

impl BannerController {
    /// Create a banner with a fixed display window
    pub fn new(display_ms: u64) -> Self {
        Self {
            display_ms,
            message: Arc::new(RwLock::new(None)),
            dismiss: Mutex::new(None),
        }
    }

    /// Show a message, scheduling its auto-dismiss
    ///
    /// Any earlier dismiss timer is cancelled first.
    pub fn show(&self, text: impl Into<String>) {
        let text = text.into();
        debug!(banner = %text, "banner shown");

        {
            let mut message = self.message.write().unwrap_or_else(|p| p.into_inner());
            *message = Some(text);
        }

        let message = self.message.clone();
        let display_ms = self.display_ms;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(display_ms)).await;
            let mut message = message.write().unwrap_or_else(|p| p.into_inner());
            *message = None;
        });

        let mut dismiss = self.dismiss.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = dismiss.replace(handle) {
            previous.abort();
        }
    }

    /// The currently displayed message, if any
    pub fn current(&self) -> Option<String> {
        self.message
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Blank the banner immediately, cancelling the dismiss timer
    pub fn clear(&self) {
        let mut dismiss = self.dismiss.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = dismiss.take() {
            handle.abort();
        }
        let mut message = self.message.write().unwrap_or_else(|p| p.into_inner());
        *message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_then_auto_dismiss() {
        let banner = BannerController::new(30);
        banner.show("message one");
        assert_eq!(banner.current().as_deref(), Some("message one"));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(banner.current(), None);
    }

    #[tokio::test]
    async fn test_reshow_restarts_the_window() {
        let banner = BannerController::new(50);
        banner.show("first");
        tokio::time::sleep(Duration::from_millis(30)).await;

        // Re-show just before the first window would expire
        banner.show("second");
        tokio::time::sleep(Duration::from_millis(30)).await;

        // The first timer was cancelled, the second window is still open
        assert_eq!(banner.current().as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(banner.current(), None);
    }

    #[tokio::test]
    async fn test_clear_blanks_immediately() {
        let banner = BannerController::new(10_000);
        banner.show("long lived");
        banner.clear();
        assert_eq!(banner.current(), None);

        // Clearing an empty banner is fine
        banner.clear();
        assert_eq!(banner.current(), None);
    }
}
