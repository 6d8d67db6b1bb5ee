/// Redirect seam. The client computes target URLs; whoever embeds it decides
/// what "go there" means (an HTTP 302, a webview load, a recorded string).

use std::sync::Mutex;

pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Keeps every target it was sent, most recent last.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.visited.lock().ok().and_then(|v| v.last().cloned())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(url.to_string());
        }
    }
}
