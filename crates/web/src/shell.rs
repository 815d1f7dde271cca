//! [`Shell`] backed by the browser window.

use fraterno_widgets::Shell;
use tracing::warn;

/// Shows alerts and opens windows through `window`.
#[derive(Debug, Clone)]
pub struct BrowserShell {
    window: web_sys::Window,
}

impl BrowserShell {
    #[must_use]
    pub const fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

impl Shell for BrowserShell {
    fn alert(&mut self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            warn!(error = ?e, message, "alert failed");
        }
    }

    fn open(&mut self, url: &str, target: &str) {
        match self.window.open_with_url_and_target(url, target) {
            Ok(Some(_)) => {}
            Ok(None) => warn!(url, "new window blocked"),
            Err(e) => warn!(error = ?e, url, "opening window failed"),
        }
    }
}
