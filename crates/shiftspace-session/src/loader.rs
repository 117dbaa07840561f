//! User record loader — merges the three remote sub-records into the
//! session's `UserRecord`.
//!
//! Field ownership:
//!
//! | field group                                   | owner            |
//! |-----------------------------------------------|------------------|
//! | uid, email, role, assignments, profile flags, onboarding, metadata | `UserCore` |
//! | display/contact/visibility/completion fields  | `ProfileExtension` |
//! | admin activation, admin roles/rights          | `AdminExtension` |
//!
//! The sub-records are disjoint types, so an update to one cannot
//! overwrite another's fields; [`merge`] is total and commutative-safe
//! with respect to delivery order of the two reactive streams. The
//! admin extension is fetched once, cached, and survives user-core
//! updates until [`UserRecordLoader::refresh`] supersedes it.

use std::time::Duration;

use shiftspace_core::error::{CoreError, CoreResult};
use shiftspace_core::models::user::{
    AdminExtension, ProfileExtension, ProfileKind, UserCore, UserRecord, UserRole,
};
use shiftspace_core::sources::{AdminExtensionSource, ProfileSource, UserRecordSource};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SessionConfig;

/// The already-authenticated identity handed to the engine at sign-in.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub uid: Uuid,
    pub email: String,
}

/// Assemble a user record from its sub-records. This is the only merge
/// in the system; there is no field-level spreading anywhere.
pub fn merge(
    core: UserCore,
    profile: Option<ProfileExtension>,
    admin: Option<AdminExtension>,
) -> UserRecord {
    UserRecord {
        core,
        profile,
        admin,
    }
}

/// Loads and maintains the merged user record for one session.
pub struct UserRecordLoader<U, P, A> {
    users: U,
    profiles: P,
    admins: A,
    config: SessionConfig,
    identity: Option<AuthIdentity>,
    record: Option<UserRecord>,
    admin_fetched: bool,
}

impl<U, P, A> UserRecordLoader<U, P, A>
where
    U: UserRecordSource,
    P: ProfileSource,
    A: AdminExtensionSource,
{
    pub fn new(users: U, profiles: P, admins: A, config: SessionConfig) -> Self {
        Self {
            users,
            profiles,
            admins,
            config,
            identity: None,
            record: None,
            admin_fetched: false,
        }
    }

    pub fn record(&self) -> Option<&UserRecord> {
        self.record.as_ref()
    }

    /// Direct handle to the user record store, for flows that mutate
    /// the record outside the reactive merge (e.g. leaving a facility).
    pub fn users(&self) -> &U {
        &self.users
    }

    /// Whether the admin extension has been fetched for this session
    /// (regardless of whether one exists).
    pub fn admin_fetched(&self) -> bool {
        self.admin_fetched
    }

    /// Initial load at sign-in.
    ///
    /// Fetches the user core with a bounded timeout and retry policy;
    /// exhausting all attempts is non-fatal — the previous record (if
    /// any) is left unchanged and a warning is logged. A missing user
    /// document is replaced by a minimal default derived from the
    /// authentication identity and persisted immediately. The matching
    /// profile extension is fetched best-effort afterwards.
    pub async fn load_initial(&mut self, identity: AuthIdentity) -> CoreResult<()> {
        let uid = identity.uid;
        self.identity = Some(identity.clone());

        let mut core = None;
        for attempt in 1..=self.config.user_fetch_attempts {
            match tokio::time::timeout(self.config.user_fetch_timeout, self.users.get_once(uid))
                .await
            {
                Ok(Ok(fetched)) => {
                    core = Some(fetched);
                    break;
                }
                Ok(Err(CoreError::NotFound { .. })) => {
                    debug!(%uid, "no user document, creating minimal default");
                    let defaults = UserCore::minimal(uid, identity.email.clone());
                    self.users.create(defaults.clone()).await?;
                    core = Some(defaults);
                    break;
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    warn!(%uid, attempt, "user record fetch timed out");
                    if attempt < self.config.user_fetch_attempts {
                        tokio::time::sleep(backoff(self.config.user_fetch_backoff, attempt)).await;
                    }
                }
            }
        }

        let Some(core) = core else {
            warn!(%uid, "user record fetch exhausted retries, keeping previous record");
            return Ok(());
        };

        // Best-effort profile extension for the user's primary track.
        let kind = match core.role {
            UserRole::Facility => ProfileKind::Facility,
            UserRole::Professional => ProfileKind::Professional,
        };
        let profile = match self.profiles.get_once(uid, kind).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(%uid, %kind, error = %e, "profile extension fetch failed");
                self.record.as_ref().and_then(|r| r.profile.clone())
            }
        };

        // Admin extension: fetched once per session. A failure here is
        // non-fatal — resolution defers via `AwaitingAdminData` until a
        // later pass retries.
        let admin = match self.admins.get_once(uid).await {
            Ok(admin) => {
                self.admin_fetched = true;
                admin
            }
            Err(e) => {
                warn!(%uid, error = %e, "admin extension fetch failed at sign-in");
                self.record.take().and_then(|r| r.admin)
            }
        };

        self.record = Some(merge(core, profile, admin));
        Ok(())
    }

    /// Apply a user-core update from the reactive subscription. The
    /// profile and admin sub-records are preserved untouched.
    pub fn apply_core(&mut self, core: UserCore) {
        match self.record.take() {
            Some(record) => self.record = Some(merge(core, record.profile, record.admin)),
            None => self.record = Some(merge(core, None, None)),
        }
    }

    /// Apply a profile-extension update from the reactive subscription.
    /// User-core-owned fields are unreachable from here by construction.
    pub fn apply_profile(&mut self, profile: ProfileExtension) {
        match self.record.take() {
            Some(record) => {
                self.record = Some(merge(record.core, Some(profile), record.admin));
            }
            None => {
                // Profile events may race ahead of the first core fetch;
                // without a core there is nothing to attach them to.
                debug!("dropping profile update delivered before user core");
            }
        }
    }

    /// Fetch the admin extension if it has not been fetched yet.
    /// Returns whether an admin extension is now known to exist.
    pub async fn ensure_admin(&mut self) -> CoreResult<bool> {
        if self.admin_fetched {
            return Ok(self.record.as_ref().is_some_and(|r| r.admin.is_some()));
        }
        let uid = self.require_uid()?;
        let admin = self.admins.get_once(uid).await?;
        self.admin_fetched = true;
        let present = admin.is_some();
        if let Some(record) = self.record.take() {
            self.record = Some(merge(record.core, record.profile, admin));
        }
        Ok(present)
    }

    /// Force a full re-fetch of the user core and admin extension,
    /// used by the recovery flow after its mutations.
    pub async fn refresh(&mut self) -> CoreResult<()> {
        let uid = self.require_uid()?;
        let core = self.users.get_once(uid).await?;
        let admin = self.admins.get_once(uid).await?;
        self.admin_fetched = true;
        let profile = self.record.take().and_then(|r| r.profile);
        self.record = Some(merge(core, profile, admin));
        Ok(())
    }

    /// Drop a facility reference from the in-memory record. The
    /// recovery flow uses this after leaving a facility so the dead
    /// team workspace stays out of enumeration even when the remote
    /// detach could not be confirmed.
    pub fn prune_assignment(&mut self, facility_id: Uuid) {
        if let Some(record) = self.record.as_mut() {
            record
                .core
                .assignments
                .retain(|a| a.facility_id != Some(facility_id));
        }
    }

    /// Drop all session state at sign-out.
    pub fn reset(&mut self) {
        self.identity = None;
        self.record = None;
        self.admin_fetched = false;
    }

    fn require_uid(&self) -> CoreResult<Uuid> {
        self.identity
            .as_ref()
            .map(|i| i.uid)
            .ok_or_else(|| CoreError::Internal("loader used before sign-in".into()))
    }
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    base * attempt
}
