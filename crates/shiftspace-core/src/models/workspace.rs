//! Workspace value objects.
//!
//! A workspace is a selectable tenant context: the user's personal
//! professional workspace, one team workspace per facility the user is
//! attached to, or the platform administration workspace. Workspace
//! values are recomputed on every reconciliation pass and never
//! mutated in place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::FacilityRole;

/// The three selectable workspace kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceKind {
    Personal,
    Team,
    Admin,
}

impl WorkspaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceKind::Personal => "personal",
            WorkspaceKind::Team => "team",
            WorkspaceKind::Admin => "admin",
        }
    }
}

impl std::fmt::Display for WorkspaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workspace identity. Two workspaces are the same workspace iff their
/// ids are equal.
///
/// The canonical string form is `personal`, `admin`, or `team:<uuid>`;
/// the URL-segment form drops the `team:` prefix (a bare facility id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum WorkspaceId {
    Personal,
    Admin,
    Team(Uuid),
}

impl WorkspaceId {
    pub fn kind(&self) -> WorkspaceKind {
        match self {
            WorkspaceId::Personal => WorkspaceKind::Personal,
            WorkspaceId::Admin => WorkspaceKind::Admin,
            WorkspaceId::Team(_) => WorkspaceKind::Team,
        }
    }

    pub fn facility_id(&self) -> Option<Uuid> {
        match self {
            WorkspaceId::Team(id) => Some(*id),
            _ => None,
        }
    }

    /// The path segment identifying this workspace in a dashboard URL.
    pub fn url_segment(&self) -> String {
        match self {
            WorkspaceId::Personal => "personal".into(),
            WorkspaceId::Admin => "admin".into(),
            WorkspaceId::Team(id) => id.to_string(),
        }
    }

    /// Parse a dashboard path segment into a workspace id. Facility
    /// segments are bare UUIDs; anything else is not a workspace id.
    pub fn from_url_segment(segment: &str) -> Option<WorkspaceId> {
        match segment {
            "personal" => Some(WorkspaceId::Personal),
            "admin" => Some(WorkspaceId::Admin),
            other => Uuid::parse_str(other).ok().map(WorkspaceId::Team),
        }
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceId::Personal => f.write_str("personal"),
            WorkspaceId::Admin => f.write_str("admin"),
            WorkspaceId::Team(id) => write!(f, "team:{id}"),
        }
    }
}

impl From<WorkspaceId> for String {
    fn from(id: WorkspaceId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for WorkspaceId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "personal" => Ok(WorkspaceId::Personal),
            "admin" => Ok(WorkspaceId::Admin),
            other => {
                let raw = other
                    .strip_prefix("team:")
                    .ok_or_else(|| format!("invalid workspace id: {other}"))?;
                Uuid::parse_str(raw)
                    .map(WorkspaceId::Team)
                    .map_err(|e| format!("invalid facility uuid in workspace id: {e}"))
            }
        }
    }
}

/// A selectable workspace, derived from the user record.
///
/// Equality is by `id` alone — display name and role details do not
/// make two workspaces different.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub kind: WorkspaceKind,
    /// Backing facility for team workspaces.
    pub facility_id: Option<Uuid>,
    /// The user's roles within the facility (team workspaces only).
    pub roles: Vec<FacilityRole>,
    pub name: String,
}

impl Workspace {
    pub fn personal() -> Self {
        Workspace {
            id: WorkspaceId::Personal,
            kind: WorkspaceKind::Personal,
            facility_id: None,
            roles: Vec::new(),
            name: "Personal Workspace".into(),
        }
    }

    pub fn team(facility_id: Uuid, roles: Vec<FacilityRole>) -> Self {
        Workspace {
            id: WorkspaceId::Team(facility_id),
            kind: WorkspaceKind::Team,
            facility_id: Some(facility_id),
            roles,
            name: "Facility Workspace".into(),
        }
    }

    pub fn admin() -> Self {
        Workspace {
            id: WorkspaceId::Admin,
            kind: WorkspaceKind::Admin,
            facility_id: None,
            roles: Vec::new(),
            name: "Admin Workspace".into(),
        }
    }
}

impl PartialEq for Workspace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Workspace {}
