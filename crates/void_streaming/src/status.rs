//! Status display seam
//!
//! The status sink is advisory: concurrent transitions may overwrite each
//! other's messages, and the last write wins.

use parking_lot::Mutex;

/// Receiver of human-readable progress messages
///
/// Calls may arrive from several transition tasks at once and must not
/// panic.
pub trait StatusSink: Send + Sync {
    /// Display a message
    fn show(&self, message: &str);

    /// Clear the display. Idempotent.
    fn hide(&self);
}

/// Snapshot of a [`StatusBoard`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Current text (empty when hidden)
    pub text: String,
    /// Whether the indicator is visible
    pub visible: bool,
    /// Number of `show` calls so far
    pub shown: u64,
    /// Number of `hide` calls so far
    pub hidden: u64,
}

/// Shared loading indicator
///
/// Holds one line of text and a visibility flag.
#[derive(Debug, Default)]
pub struct StatusBoard {
    inner: Mutex<StatusSnapshot>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current display state
    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.lock().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.lock().visible
    }

    pub fn text(&self) -> String {
        self.inner.lock().text.clone()
    }
}

impl StatusSink for StatusBoard {
    fn show(&self, message: &str) {
        let mut inner = self.inner.lock();
        inner.text.clear();
        inner.text.push_str(message);
        inner.visible = true;
        inner.shown += 1;
    }

    fn hide(&self) {
        let mut inner = self.inner.lock();
        inner.text.clear();
        inner.visible = false;
        inner.hidden += 1;
    }
}

/// Status sink that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn show(&self, message: &str) {
        log::info!("Status: {}", message);
    }

    fn hide(&self) {}
}
