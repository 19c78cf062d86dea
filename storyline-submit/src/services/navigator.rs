//! Navigation intent sink

use tracing::info;

/// Receives navigation intents; fire-and-forget
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator for headless front ends: records the intent in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(path = %path, "Navigate");
    }
}
