//! Browser host services used by the widgets.
//!
//! Widgets never talk to a window directly. Blocking dialogs and opening a
//! new browsing context go through [`Shell`], so a page can run headless in
//! tests and tools.

/// Window-level side effects a widget may trigger.
pub trait Shell {
    /// Show a blocking message dialog.
    fn alert(&mut self, message: &str);

    /// Open `url` in the browsing context named `target` (e.g. `_blank`).
    fn open(&mut self, url: &str, target: &str);
}

/// Shell that records every side effect for later inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingShell {
    alerts: Vec<String>,
    opened: Vec<OpenedWindow>,
}

/// A URL opened through [`Shell::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedWindow {
    pub url: String,
    pub target: String,
}

impl RecordingShell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts shown so far, oldest first.
    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Windows opened so far, oldest first.
    #[must_use]
    pub fn opened(&self) -> &[OpenedWindow] {
        &self.opened
    }
}

impl Shell for RecordingShell {
    fn alert(&mut self, message: &str) {
        tracing::debug!(message, "alert");
        self.alerts.push(message.to_owned());
    }

    fn open(&mut self, url: &str, target: &str) {
        tracing::debug!(url, target, "open window");
        self.opened.push(OpenedWindow {
            url: url.to_owned(),
            target: target.to_owned(),
        });
    }
}
