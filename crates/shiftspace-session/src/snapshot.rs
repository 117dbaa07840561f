//! In-memory snapshot store with cookie-jar semantics.

use std::sync::Mutex;

use shiftspace_core::models::snapshot::PersistedSnapshot;
use shiftspace_core::models::workspace::Workspace;
use shiftspace_core::sources::SnapshotStore;
use tracing::debug;

/// Holds at most one snapshot and applies the configured expiry on
/// read, the way a time-boxed cookie would. An expired entry is
/// dropped on the read that discovers it.
pub struct MemorySnapshotStore {
    entry: Mutex<Option<PersistedSnapshot>>,
    expiry_days: i64,
}

impl MemorySnapshotStore {
    pub fn new(expiry_days: i64) -> Self {
        Self {
            entry: Mutex::new(None),
            expiry_days,
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self) -> Option<PersistedSnapshot> {
        let mut entry = self.entry.lock().unwrap();
        match entry.as_ref() {
            Some(snap) if snap.is_expired(self.expiry_days) => {
                debug!(id = %snap.id, "discarding expired workspace snapshot");
                *entry = None;
                None
            }
            other => other.cloned(),
        }
    }

    fn set(&self, workspace: &Workspace) {
        *self.entry.lock().unwrap() = Some(PersistedSnapshot::of(workspace));
    }

    fn clear(&self) {
        *self.entry.lock().unwrap() = None;
    }
}
