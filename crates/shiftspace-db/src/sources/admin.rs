//! SurrealDB implementation of [`AdminExtensionSource`].

use chrono::{DateTime, Utc};
use shiftspace_core::error::CoreResult;
use shiftspace_core::models::user::AdminExtension;
use shiftspace_core::sources::AdminExtensionSource;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AdminRow {
    is_active: bool,
    roles: Vec<String>,
    rights: Vec<String>,
    granted_at: DateTime<Utc>,
}

impl AdminRow {
    fn into_extension(self) -> AdminExtension {
        AdminExtension {
            is_active: self.is_active,
            roles: self.roles,
            rights: self.rights,
            granted_at: self.granted_at,
        }
    }
}

/// SurrealDB implementation of the admin extension source.
#[derive(Clone)]
pub struct SurrealAdminExtensionSource<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAdminExtensionSource<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AdminExtensionSource for SurrealAdminExtensionSource<C> {
    async fn get_once(&self, uid: Uuid) -> CoreResult<Option<AdminExtension>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('admin', $id)")
            .bind(("id", uid.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdminRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(AdminRow::into_extension))
    }
}
