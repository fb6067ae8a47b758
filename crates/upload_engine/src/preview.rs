use std::collections::HashMap;

use bytes::Bytes;
use upload_core::PreviewId;
use upload_logging::{upload_debug, upload_warn};

/// Holds decoded previews for image uploads.
///
/// A preview is acquired when its file enters the store and released when the file leaves it.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    last_id: u64,
    live: HashMap<PreviewId, Bytes>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, content: Bytes) -> PreviewId {
        self.last_id += 1;
        let id = PreviewId(self.last_id);
        upload_debug!("Acquired preview {:?} ({} bytes)", id, content.len());
        self.live.insert(id, content);
        id
    }

    /// Returns false (and logs) when the preview was never acquired or is already released.
    pub fn release(&mut self, id: PreviewId) -> bool {
        match self.live.remove(&id) {
            Some(_) => {
                upload_debug!("Released preview {:?}", id);
                true
            }
            None => {
                upload_warn!("Release of unknown preview {:?} ignored", id);
                false
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Drops every preview; used on shutdown.
    pub fn release_all(&mut self) -> usize {
        let count = self.live.len();
        self.live.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::PreviewRegistry;

    #[test]
    fn acquire_and_release_once() {
        let mut registry = PreviewRegistry::new();
        let id = registry.acquire(Bytes::from_static(b"\x89PNG"));
        assert_eq!(registry.live_count(), 1);

        assert!(registry.release(id));
        assert_eq!(registry.live_count(), 0);
        assert!(!registry.release(id));
    }

    #[test]
    fn ids_are_distinct() {
        let mut registry = PreviewRegistry::new();
        let a = registry.acquire(Bytes::new());
        let b = registry.acquire(Bytes::new());
        assert_ne!(a, b);
        assert_eq!(registry.release_all(), 2);
        assert_eq!(registry.live_count(), 0);
    }
}
