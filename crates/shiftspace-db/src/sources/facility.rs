//! SurrealDB implementation of [`FacilitySource`].

use chrono::{DateTime, Utc};
use shiftspace_core::error::CoreResult;
use shiftspace_core::models::facility::{FacilityMember, FacilityRecord};
use shiftspace_core::sources::FacilitySource;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;
use crate::sources::{facility_roles_to_strings, parse_facility_roles, parse_uuid};

#[derive(Debug, Clone, SurrealValue)]
struct MemberRow {
    user_id: String,
    roles: Vec<String>,
}

impl MemberRow {
    fn from_member(member: &FacilityMember) -> Self {
        MemberRow {
            user_id: member.user_id.to_string(),
            roles: facility_roles_to_strings(&member.roles),
        }
    }

    fn into_member(self) -> Result<FacilityMember, DbError> {
        Ok(FacilityMember {
            user_id: parse_uuid(&self.user_id, "member")?,
            roles: parse_facility_roles(&self.roles)?,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct FacilityRow {
    name: String,
    employees: Vec<MemberRow>,
    admins: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FacilityRow {
    fn into_record(self, id: Uuid) -> Result<FacilityRecord, DbError> {
        Ok(FacilityRecord {
            id,
            name: self.name,
            employees: self
                .employees
                .into_iter()
                .map(MemberRow::into_member)
                .collect::<Result<_, _>>()?,
            admins: self
                .admins
                .iter()
                .map(|raw| parse_uuid(raw, "admin"))
                .collect::<Result<_, _>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the facility source.
#[derive(Clone)]
pub struct SurrealFacilitySource<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFacilitySource<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, facility_id: Uuid) -> Result<Option<FacilityRecord>, DbError> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('facility', $id)")
            .bind(("id", facility_id.to_string()))
            .await?;

        let rows: Vec<FacilityRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(|row| row.into_record(facility_id))
            .transpose()
    }
}

impl<C: Connection> FacilitySource for SurrealFacilitySource<C> {
    async fn get_once(&self, facility_id: Uuid) -> CoreResult<Option<FacilityRecord>> {
        Ok(self.fetch(facility_id).await?)
    }

    async fn remove_member(&self, facility_id: Uuid, user_id: Uuid) -> CoreResult<()> {
        // Read-modify-write; skipped entirely when the record is gone.
        let Some(facility) = self.fetch(facility_id).await? else {
            debug!(%facility_id, "facility already gone, membership removal skipped");
            return Ok(());
        };

        let employees: Vec<MemberRow> = facility
            .employees
            .iter()
            .filter(|m| m.user_id != user_id)
            .map(MemberRow::from_member)
            .collect();
        let admins: Vec<String> = facility
            .admins
            .iter()
            .filter(|a| **a != user_id)
            .map(|a| a.to_string())
            .collect();

        self.db
            .query(
                "UPDATE type::record('facility', $id) SET \
                 employees = $employees, \
                 admins = $admins, \
                 updated_at = time::now()",
            )
            .bind(("id", facility_id.to_string()))
            .bind(("employees", employees))
            .bind(("admins", admins))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
