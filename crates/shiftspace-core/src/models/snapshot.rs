//! Locally persisted workspace snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workspace::{Workspace, WorkspaceId};

/// The last confirmed workspace selection, persisted locally so a
/// reload lands in the same workspace. Time-boxed: a snapshot older
/// than the configured number of days is discarded on read.
///
/// The snapshot is a hint, never an authority — it is trusted only
/// while its id is a member of the currently enumerated workspace set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub id: WorkspaceId,
    pub name: String,
    pub stored_at: DateTime<Utc>,
}

impl PersistedSnapshot {
    pub fn of(workspace: &Workspace) -> Self {
        PersistedSnapshot {
            id: workspace.id.clone(),
            name: workspace.name.clone(),
            stored_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, max_age_days: i64) -> bool {
        Utc::now() - self.stored_at > chrono::Duration::days(max_age_days)
    }
}
