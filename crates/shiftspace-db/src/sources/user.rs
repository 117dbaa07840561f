//! SurrealDB implementation of [`UserRecordSource`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use shiftspace_core::error::CoreResult;
use shiftspace_core::models::user::{OnboardingProgress, RoleAssignment, UserCore};
use shiftspace_core::sources::UserRecordSource;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;
use crate::sources::{parse_facility_roles, parse_user_role, parse_uuid, user_role_to_string};

#[derive(Debug, Clone, SurrealValue)]
struct AssignmentRow {
    facility_id: Option<String>,
    roles: Vec<String>,
}

impl AssignmentRow {
    fn from_assignment(assignment: &RoleAssignment) -> Self {
        AssignmentRow {
            facility_id: assignment.facility_id.map(|id| id.to_string()),
            roles: crate::sources::facility_roles_to_strings(&assignment.roles),
        }
    }

    fn into_assignment(self) -> Result<RoleAssignment, DbError> {
        Ok(RoleAssignment {
            facility_id: self
                .facility_id
                .as_deref()
                .map(|raw| parse_uuid(raw, "facility"))
                .transpose()?,
            roles: parse_facility_roles(&self.roles)?,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    role: String,
    assignments: Vec<AssignmentRow>,
    has_professional_profile: bool,
    has_facility_profile: bool,
    onboarding_professional_completed: bool,
    onboarding_facility_completed: bool,
    onboarding_completed: bool,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_core(self, uid: Uuid) -> Result<UserCore, DbError> {
        Ok(UserCore {
            uid,
            email: self.email,
            role: parse_user_role(&self.role)?,
            assignments: self
                .assignments
                .into_iter()
                .map(AssignmentRow::into_assignment)
                .collect::<Result<_, _>>()?,
            has_professional_profile: self.has_professional_profile,
            has_facility_profile: self.has_facility_profile,
            onboarding: OnboardingProgress {
                professional_completed: self.onboarding_professional_completed,
                facility_completed: self.onboarding_facility_completed,
                completed: self.onboarding_completed,
            },
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

async fn fetch_user<C: Connection>(db: &Surreal<C>, uid: Uuid) -> Result<UserCore, DbError> {
    let id_str = uid.to_string();

    let mut result = db
        .query("SELECT * FROM type::record('user', $id)")
        .bind(("id", id_str.clone()))
        .await?;

    let rows: Vec<UserRow> = result.take(0)?;
    let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: "user".into(),
        id: id_str,
    })?;

    row.into_core(uid)
}

/// SurrealDB implementation of the user record source.
#[derive(Clone)]
pub struct SurrealUserRecordSource<C: Connection> {
    db: Surreal<C>,
    poll_interval: Duration,
}

impl<C: Connection> SurrealUserRecordSource<C> {
    pub fn new(db: Surreal<C>, poll_interval: Duration) -> Self {
        Self { db, poll_interval }
    }
}

impl<C: Connection + 'static> UserRecordSource for SurrealUserRecordSource<C> {
    async fn subscribe(&self, uid: Uuid) -> CoreResult<mpsc::Receiver<UserCore>> {
        let (tx, rx) = mpsc::channel(16);
        let db = self.db.clone();
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut last: Option<UserCore> = None;
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match fetch_user(&db, uid).await {
                    Ok(core) => {
                        if last.as_ref() != Some(&core) {
                            last = Some(core.clone());
                            if tx.send(core).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        // Fail-closed: keep polling, keep the last
                        // delivered state.
                        warn!(%uid, error = %e, "user subscription poll failed");
                    }
                }
                if tx.is_closed() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn get_once(&self, uid: Uuid) -> CoreResult<UserCore> {
        Ok(fetch_user(&self.db, uid).await?)
    }

    async fn create(&self, defaults: UserCore) -> CoreResult<()> {
        let assignments: Vec<AssignmentRow> = defaults
            .assignments
            .iter()
            .map(AssignmentRow::from_assignment)
            .collect();

        self.db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, \
                 role = $role, \
                 assignments = $assignments, \
                 has_professional_profile = $has_professional_profile, \
                 has_facility_profile = $has_facility_profile, \
                 onboarding_professional_completed = $onb_professional, \
                 onboarding_facility_completed = $onb_facility, \
                 onboarding_completed = $onb_completed, \
                 metadata = $metadata",
            )
            .bind(("id", defaults.uid.to_string()))
            .bind(("email", defaults.email.clone()))
            .bind(("role", user_role_to_string(defaults.role).to_string()))
            .bind(("assignments", assignments))
            .bind(("has_professional_profile", defaults.has_professional_profile))
            .bind(("has_facility_profile", defaults.has_facility_profile))
            .bind((
                "onb_professional",
                defaults.onboarding.professional_completed,
            ))
            .bind(("onb_facility", defaults.onboarding.facility_completed))
            .bind(("onb_completed", defaults.onboarding.completed))
            .bind(("metadata", defaults.metadata.clone()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn update_assignments(
        &self,
        uid: Uuid,
        assignments: Vec<RoleAssignment>,
    ) -> CoreResult<()> {
        let rows: Vec<AssignmentRow> = assignments.iter().map(AssignmentRow::from_assignment).collect();

        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 assignments = $assignments, \
                 updated_at = time::now()",
            )
            .bind(("id", uid.to_string()))
            .bind(("assignments", rows))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
