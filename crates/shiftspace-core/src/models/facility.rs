//! Facility domain model.
//!
//! The existence of a facility record is the precondition for its team
//! workspace being selectable. This core only reads facilities — the
//! single exception is the recovery flow's membership removal, which
//! goes through [`crate::sources::FacilitySource::remove_member`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::FacilityRole;

/// One entry in a facility's employee list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityMember {
    pub user_id: Uuid,
    pub roles: Vec<FacilityRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: Uuid,
    pub name: String,
    pub employees: Vec<FacilityMember>,
    /// Users allowed to administer the facility.
    pub admins: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FacilityRecord {
    pub fn member(&self, user_id: Uuid) -> Option<&FacilityMember> {
        self.employees.iter().find(|m| m.user_id == user_id)
    }
}
