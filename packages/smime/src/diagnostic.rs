//! Surfaces for tool diagnostics
//!
//! When the tool fails, its standard-error output is handed verbatim to the
//! [`DiagnosticSink`] the caller injected, in addition to being returned in
//! [`SmimeError::ToolFailure`](crate::SmimeError::ToolFailure).

use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Something that can display a failed run's diagnostic text
pub trait DiagnosticSink: Send + Sync {
    /// Display `diagnostic`
    fn show(&self, diagnostic: &str);
}

/// Emits diagnostics as warning events
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn show(&self, diagnostic: &str) {
        warn!(diagnostic = %diagnostic.trim_end(), "CMS tool reported an error");
    }
}

/// Keeps the most recent diagnostic; later failures overwrite earlier ones
#[derive(Debug, Default)]
pub struct LastDiagnostic {
    slot: Mutex<Option<String>>,
}

impl LastDiagnostic {
    /// Empty surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently shown diagnostic
    pub fn last(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the stored diagnostic
    pub fn clear(&self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl DiagnosticSink for LastDiagnostic {
    fn show(&self, diagnostic: &str) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(diagnostic.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_diagnostic_keeps_latest() {
        let surface = LastDiagnostic::new();
        assert_eq!(surface.last(), None);

        surface.show("first failure\n");
        surface.show("second failure\n");
        assert_eq!(surface.last().as_deref(), Some("second failure\n"));

        surface.clear();
        assert_eq!(surface.last(), None);
    }
}
