//! SurrealDB implementation of [`ProfileSource`].
//!
//! One table per profile kind, each keyed by the owning user's id.

use std::time::Duration;

use chrono::{DateTime, Utc};
use shiftspace_core::error::CoreResult;
use shiftspace_core::models::user::{ProfileExtension, ProfileKind, ProfileVisibility};
use shiftspace_core::sources::ProfileSource;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;

fn table_for(kind: ProfileKind) -> &'static str {
    match kind {
        ProfileKind::Professional => "professional_profile",
        ProfileKind::Facility => "facility_profile",
    }
}

fn parse_visibility(s: &str) -> Result<ProfileVisibility, DbError> {
    match s {
        "public" => Ok(ProfileVisibility::Public),
        "private" => Ok(ProfileVisibility::Private),
        other => Err(DbError::Corrupt(format!("unknown visibility: {other}"))),
    }
}

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    display_name: String,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    visibility: String,
    completion_percent: u32,
    metadata: serde_json::Value,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_extension(self, kind: ProfileKind) -> Result<ProfileExtension, DbError> {
        Ok(ProfileExtension {
            kind,
            display_name: self.display_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            visibility: parse_visibility(&self.visibility)?,
            completion_percent: u8::try_from(self.completion_percent.min(100)).unwrap_or(100),
            metadata: self.metadata,
            updated_at: self.updated_at,
        })
    }
}

async fn fetch_profile<C: Connection>(
    db: &Surreal<C>,
    uid: Uuid,
    kind: ProfileKind,
) -> Result<Option<ProfileExtension>, DbError> {
    let mut result = db
        .query("SELECT * FROM type::record($table, $id)")
        .bind(("table", table_for(kind).to_string()))
        .bind(("id", uid.to_string()))
        .await?;

    let rows: Vec<ProfileRow> = result.take(0)?;
    rows.into_iter()
        .next()
        .map(|row| row.into_extension(kind))
        .transpose()
}

/// SurrealDB implementation of the profile source.
#[derive(Clone)]
pub struct SurrealProfileSource<C: Connection> {
    db: Surreal<C>,
    poll_interval: Duration,
}

impl<C: Connection> SurrealProfileSource<C> {
    pub fn new(db: Surreal<C>, poll_interval: Duration) -> Self {
        Self { db, poll_interval }
    }
}

impl<C: Connection + 'static> ProfileSource for SurrealProfileSource<C> {
    async fn subscribe(
        &self,
        uid: Uuid,
        kind: ProfileKind,
    ) -> CoreResult<mpsc::Receiver<ProfileExtension>> {
        let (tx, rx) = mpsc::channel(16);
        let db = self.db.clone();
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let mut last: Option<ProfileExtension> = None;
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match fetch_profile(&db, uid, kind).await {
                    Ok(Some(profile)) => {
                        if last.as_ref() != Some(&profile) {
                            last = Some(profile.clone());
                            if tx.send(profile).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(%uid, %kind, error = %e, "profile subscription poll failed");
                    }
                }
                if tx.is_closed() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn get_once(&self, uid: Uuid, kind: ProfileKind) -> CoreResult<Option<ProfileExtension>> {
        Ok(fetch_profile(&self.db, uid, kind).await?)
    }
}
