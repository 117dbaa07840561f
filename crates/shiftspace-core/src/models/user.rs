//! User record models.
//!
//! The user record is composed of three disjoint sub-records, each
//! delivered by an independent remote source:
//!
//! | sub-record          | owner of                                        |
//! |---------------------|-------------------------------------------------|
//! | [`UserCore`]        | role, role assignments, profile-existence flags, onboarding progress |
//! | [`ProfileExtension`]| display/contact fields of the active profile    |
//! | [`AdminExtension`]  | platform-admin activation, roles and rights     |
//!
//! Because the sub-records are separate types, an update to one can
//! never overwrite a field owned by another — the merge in
//! `shiftspace-session::loader` is total by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user's primary account role, set at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Professional,
    Facility,
}

/// Roles a user can hold within a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityRole {
    Admin,
    Scheduler,
    Recruiter,
    Employee,
}

impl FacilityRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityRole::Admin => "admin",
            FacilityRole::Scheduler => "scheduler",
            FacilityRole::Recruiter => "recruiter",
            FacilityRole::Employee => "employee",
        }
    }
}

/// One entry in the user's role-assignment list, optionally tying the
/// user to a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub facility_id: Option<Uuid>,
    pub roles: Vec<FacilityRole>,
}

/// Per-track onboarding completion flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingProgress {
    pub professional_completed: bool,
    pub facility_completed: bool,
    /// Legacy overall flag kept for accounts migrated before the
    /// per-track flags existed.
    pub completed: bool,
}

impl OnboardingProgress {
    pub fn any_completed(&self) -> bool {
        self.professional_completed || self.facility_completed || self.completed
    }
}

/// The authoritative user document.
///
/// `has_professional_profile` / `has_facility_profile` are derived from
/// the existence of the linked profile documents — they are maintained
/// by the backend, never edited by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCore {
    pub uid: Uuid,
    pub email: String,
    pub role: UserRole,
    pub assignments: Vec<RoleAssignment>,
    pub has_professional_profile: bool,
    pub has_facility_profile: bool,
    pub onboarding: OnboardingProgress,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserCore {
    /// Minimal default record created when a signed-in identity has no
    /// user document yet.
    pub fn minimal(uid: Uuid, email: impl Into<String>) -> Self {
        let now = Utc::now();
        UserCore {
            uid,
            email: email.into(),
            role: UserRole::Professional,
            assignments: Vec::new(),
            has_professional_profile: false,
            has_facility_profile: false,
            onboarding: OnboardingProgress::default(),
            metadata: serde_json::Value::Object(Default::default()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Distinct facility ids referenced by the role assignments, in
    /// assignment order.
    pub fn facility_ids(&self) -> Vec<Uuid> {
        let mut seen = Vec::new();
        for assignment in &self.assignments {
            if let Some(fid) = assignment.facility_id {
                if !seen.contains(&fid) {
                    seen.push(fid);
                }
            }
        }
        seen
    }

    /// The user's roles within one facility, empty if not attached.
    pub fn roles_in_facility(&self, facility_id: Uuid) -> Vec<FacilityRole> {
        self.assignments
            .iter()
            .filter(|a| a.facility_id == Some(facility_id))
            .flat_map(|a| a.roles.iter().copied())
            .collect()
    }
}

/// Which type-specific profile a profile extension belongs to. Also
/// names the onboarding track a user is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Professional,
    Facility,
}

impl ProfileKind {
    /// The profile extension a workspace kind reads: team workspaces
    /// use the facility profile, everything else the professional one.
    pub fn for_workspace(kind: crate::models::workspace::WorkspaceKind) -> ProfileKind {
        match kind {
            crate::models::workspace::WorkspaceKind::Team => ProfileKind::Facility,
            _ => ProfileKind::Professional,
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileKind::Professional => f.write_str("professional"),
            ProfileKind::Facility => f.write_str("facility"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    Public,
    Private,
}

/// Type-specific profile fields, selected by the active workspace kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileExtension {
    pub kind: ProfileKind,
    pub display_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub visibility: ProfileVisibility,
    pub completion_percent: u8,
    pub metadata: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Platform-administration extension. Fetched once per session and
/// cached; absent for ordinary users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminExtension {
    /// A deactivated admin document grants nothing.
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub roles: Vec<String>,
    pub rights: Vec<String>,
    pub granted_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// The merged, session-lifetime user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub core: UserCore,
    pub profile: Option<ProfileExtension>,
    pub admin: Option<AdminExtension>,
}

impl UserRecord {
    pub fn uid(&self) -> Uuid {
        self.core.uid
    }

    /// Whether the user is an active platform administrator.
    pub fn is_admin(&self) -> bool {
        self.admin.as_ref().is_some_and(|a| a.is_active)
    }

    pub fn onboarding_complete(&self) -> bool {
        self.core.onboarding.any_completed()
    }

    /// The onboarding track this user would need to complete, chosen
    /// by primary role.
    pub fn onboarding_kind(&self) -> ProfileKind {
        match self.core.role {
            UserRole::Facility => ProfileKind::Facility,
            UserRole::Professional => ProfileKind::Professional,
        }
    }
}
