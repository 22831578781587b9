//! Navigation/reload capability.
//!
//! The engine invokes `refresh()` and `navigate_to()` but does not
//! implement them; the host environment (browser shell, webview,
//! desktop frame) supplies the real behavior. The capability is a
//! trait object injected at construction so tests can substitute a
//! recording double.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Capability for page refresh and navigation side effects.
pub trait WindowService: Send + Sync {
    /// Trigger a full page/resource reload.
    fn refresh(&self);

    /// Redirect to the given absolute or relative URL.
    fn navigate_to(&self, url: &str);
}

/// Default service for headless hosts: records the directive in the
/// log and otherwise does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingWindow;

impl WindowService for LoggingWindow {
    fn refresh(&self) {
        tracing::info!("window refresh requested");
    }

    fn navigate_to(&self, url: &str) {
        tracing::info!(url, "window navigation requested");
    }
}

/// Test double capturing every call. Exported so downstream
/// applications can assert on navigation effects in their own tests.
#[derive(Debug, Default)]
pub struct RecordingWindow {
    refreshes: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

impl RecordingWindow {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `refresh()` was invoked.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Every URL passed to `navigate_to()`, in call order.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .expect("recording window lock poisoned")
            .clone()
    }
}

impl WindowService for RecordingWindow {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn navigate_to(&self, url: &str) {
        self.navigations
            .lock()
            .expect("recording window lock poisoned")
            .push(url.to_string());
    }
}
