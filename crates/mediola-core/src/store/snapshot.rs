use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::model::Shutter;

/// One complete poll result. Never mutated after publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Bumped on every successful refresh; 0 means nothing fetched yet.
    pub version: u64,
    pub fetched_at: Option<DateTime<Utc>>,
    pub shutters: Vec<Shutter>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            version: 0,
            fetched_at: None,
            shutters: Vec::new(),
        }
    }

    pub fn get(&self, sid: &str) -> Option<&Shutter> {
        self.shutters.iter().find(|s| s.sid == sid)
    }

    pub fn len(&self) -> usize {
        self.shutters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shutters.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Atomically swapped snapshot slot with change notification.
pub struct ShutterStore {
    current: ArcSwap<Snapshot>,
    changes: watch::Sender<Arc<Snapshot>>,
}

impl ShutterStore {
    pub fn new() -> Self {
        let initial = Arc::new(Snapshot::empty());
        let (changes, _) = watch::channel(Arc::clone(&initial));
        Self {
            current: ArcSwap::new(initial),
            changes,
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn shutter(&self, sid: &str) -> Option<Shutter> {
        self.current.load().get(sid).cloned()
    }

    pub fn version(&self) -> u64 {
        self.current.load().version
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.changes.subscribe()
    }

    /// Publish a fresh poll result, replacing the previous snapshot whole.
    ///
    /// Callers must serialize writes; the coordinator does so through its
    /// refresh lock.
    pub(crate) fn replace(&self, shutters: Vec<Shutter>) -> Arc<Snapshot> {
        let next = Arc::new(Snapshot {
            version: self.version() + 1,
            fetched_at: Some(Utc::now()),
            shutters,
        });
        self.current.store(Arc::clone(&next));
        // `send_replace` updates even with zero receivers.
        self.changes.send_replace(Arc::clone(&next));
        next
    }
}

impl Default for ShutterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DeviceFamily;

    fn shutter(sid: &str) -> Shutter {
        Shutter::new(sid, "AA", DeviceFamily::Wir, "010000")
    }

    #[test]
    fn starts_empty() {
        let store = ShutterStore::new();
        let snap = store.snapshot();
        assert_eq!(snap.version, 0);
        assert!(snap.is_empty());
        assert!(snap.fetched_at.is_none());
    }

    #[test]
    fn replace_bumps_version_and_swaps_whole_list() {
        let store = ShutterStore::new();
        store.replace(vec![shutter("01"), shutter("02")]);
        let first = store.snapshot();
        assert_eq!(first.version, 1);
        assert_eq!(first.len(), 2);

        store.replace(vec![shutter("03")]);
        let second = store.snapshot();
        assert_eq!(second.version, 2);
        assert!(store.shutter("01").is_none());
        assert_eq!(store.shutter("03").unwrap().sid, "03");

        // Earlier readers keep their view.
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn subscribers_see_replacements() {
        let store = ShutterStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.replace(vec![shutter("01")]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().version, 1);
    }
}
