//! Transient image previews.
//!
//! Before an upload is persisted the UI shows a locally generated preview
//! (a blob URL in a browser, a temp file or texture elsewhere). Whoever
//! creates the preview hands ownership to a [`PreviewHandle`], which releases
//! it exactly once when dropped. A `DesignPart` owns at most one handle, so
//! replacing its image, resetting it, or dropping the whole design set always
//! frees the previous preview.

use std::fmt;
use std::sync::Arc;

/// Frees preview resources identified by key.
pub trait PreviewReleaser: Send + Sync {
    /// Release the resource behind `key`. Called once per handle.
    fn release(&self, key: &str);
}

/// Scoped ownership of one preview resource.
pub struct PreviewHandle {
    key: String,
    releaser: Arc<dyn PreviewReleaser>,
}

impl PreviewHandle {
    #[must_use]
    pub fn new(key: impl Into<String>, releaser: Arc<dyn PreviewReleaser>) -> Self {
        Self {
            key: key.into(),
            releaser,
        }
    }

    /// Key (e.g. blob URL) used to display the preview.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        tracing::trace!(key = %self.key, "releasing image preview");
        self.releaser.release(&self.key);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Releaser that records released keys, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingReleaser {
    released: std::sync::Mutex<Vec<String>>,
}

impl RecordingReleaser {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Keys released so far, in release order.
    #[must_use]
    pub fn released(&self) -> Vec<String> {
        self.released
            .lock()
            .map(|keys| keys.clone())
            .unwrap_or_default()
    }

    /// Create a handle that reports back to this releaser.
    #[must_use]
    pub fn handle(self: &Arc<Self>, key: impl Into<String>) -> PreviewHandle {
        PreviewHandle::new(key, Arc::clone(self) as Arc<dyn PreviewReleaser>)
    }
}

impl PreviewReleaser for RecordingReleaser {
    fn release(&self, key: &str) {
        if let Ok(mut keys) = self.released.lock() {
            keys.push(key.to_string());
        }
    }
}
