//! SurrealDB implementations of the `shiftspace-core` source traits.
//!
//! Point reads use `type::record` lookups keyed by the entity UUID.
//! Subscriptions are poll-based change feeds: an immediate initial
//! fetch followed by interval re-fetches, delivering only records
//! that actually changed. A failed poll is logged and the last-known
//! state retained (fail-closed), matching the engine's subscription
//! contract.

mod admin;
mod facility;
mod profile;
mod user;

pub use admin::SurrealAdminExtensionSource;
pub use facility::SurrealFacilitySource;
pub use profile::SurrealProfileSource;
pub use user::SurrealUserRecordSource;

use shiftspace_core::models::user::{FacilityRole, UserRole};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}

pub(crate) fn parse_user_role(s: &str) -> Result<UserRole, DbError> {
    match s {
        "professional" => Ok(UserRole::Professional),
        "facility" => Ok(UserRole::Facility),
        other => Err(DbError::Corrupt(format!("unknown user role: {other}"))),
    }
}

pub(crate) fn user_role_to_string(role: UserRole) -> &'static str {
    match role {
        UserRole::Professional => "professional",
        UserRole::Facility => "facility",
    }
}

pub(crate) fn parse_facility_role(s: &str) -> Result<FacilityRole, DbError> {
    match s {
        "admin" => Ok(FacilityRole::Admin),
        "scheduler" => Ok(FacilityRole::Scheduler),
        "recruiter" => Ok(FacilityRole::Recruiter),
        "employee" => Ok(FacilityRole::Employee),
        other => Err(DbError::Corrupt(format!("unknown facility role: {other}"))),
    }
}

pub(crate) fn facility_roles_to_strings(roles: &[FacilityRole]) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

pub(crate) fn parse_facility_roles(raw: &[String]) -> Result<Vec<FacilityRole>, DbError> {
    raw.iter().map(|s| parse_facility_role(s)).collect()
}
