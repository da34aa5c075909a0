//! Live text readouts of events and parameter values.

use parking_lot::Mutex;
use std::sync::Arc;

/// Receives human-readable status lines from streams and knobs.
///
/// Called on the polling thread once per event, so implementations should
/// return quickly.
pub trait DisplaySink: Send + Sync {
    fn show(&self, text: &str);
}

/// A single text value holding the latest line shown.
///
/// Clones share the same text, so one handle can be given to a stream while
/// the UI keeps another to render from.
#[derive(Debug, Clone, Default)]
pub struct TextDisplay {
    text: Arc<Mutex<String>>,
}

impl TextDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest line shown, empty if nothing was shown yet.
    pub fn value(&self) -> String {
        self.text.lock().clone()
    }
}

impl DisplaySink for TextDisplay {
    fn show(&self, text: &str) {
        let mut current = self.text.lock();
        current.clear();
        current.push_str(text);
    }
}

/// Emits each line as a `tracing` event on the `tactile::display` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDisplay;

impl DisplaySink for TracingDisplay {
    fn show(&self, text: &str) {
        tracing::info!(target: "tactile::display", "{}", text);
    }
}
