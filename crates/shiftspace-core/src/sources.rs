//! Collaborator contracts consumed by the session engine.
//!
//! All remote operations are async. Subscriptions deliver updates over
//! bounded mpsc channels; a dropped receiver ends the subscription.
//! The engine owns no wire format — implementations live in
//! `shiftspace-db` (remote sources) and `shiftspace-session` (local
//! snapshot store, token service, in-memory router).

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::facility::FacilityRecord;
use crate::models::snapshot::PersistedSnapshot;
use crate::models::user::{AdminExtension, ProfileExtension, ProfileKind, RoleAssignment, UserCore, UserRecord};
use crate::models::workspace::{Workspace, WorkspaceKind};

/// The authoritative user document store.
pub trait UserRecordSource: Send + Sync {
    /// Stream of user-core updates, starting with the current state.
    fn subscribe(
        &self,
        uid: Uuid,
    ) -> impl Future<Output = CoreResult<mpsc::Receiver<UserCore>>> + Send;

    fn get_once(&self, uid: Uuid) -> impl Future<Output = CoreResult<UserCore>> + Send;

    /// Create the user document. Used when a signed-in identity has no
    /// document yet.
    fn create(&self, defaults: UserCore) -> impl Future<Output = CoreResult<()>> + Send;

    /// Replace the user's role-assignment list.
    fn update_assignments(
        &self,
        uid: Uuid,
        assignments: Vec<RoleAssignment>,
    ) -> impl Future<Output = CoreResult<()>> + Send;
}

/// Type-specific profile documents (professional / facility).
pub trait ProfileSource: Send + Sync {
    fn subscribe(
        &self,
        uid: Uuid,
        kind: ProfileKind,
    ) -> impl Future<Output = CoreResult<mpsc::Receiver<ProfileExtension>>> + Send;

    fn get_once(
        &self,
        uid: Uuid,
        kind: ProfileKind,
    ) -> impl Future<Output = CoreResult<Option<ProfileExtension>>> + Send;
}

/// Platform-admin documents. Fetched once per session, cached by the
/// loader.
pub trait AdminExtensionSource: Send + Sync {
    fn get_once(
        &self,
        uid: Uuid,
    ) -> impl Future<Output = CoreResult<Option<AdminExtension>>> + Send;
}

/// Facility documents. `get_once` returning `None` means the facility
/// record does not exist — the signal that drives the recovery flow.
pub trait FacilitySource: Send + Sync {
    fn get_once(
        &self,
        facility_id: Uuid,
    ) -> impl Future<Output = CoreResult<Option<FacilityRecord>>> + Send;

    /// Remove a user from the facility's employee and admin lists.
    /// A no-op (not an error) when the facility record is already gone.
    fn remove_member(
        &self,
        facility_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = CoreResult<()>> + Send;
}

/// Issues and revokes the opaque per-workspace session credential.
pub trait SessionTokenService: Send + Sync {
    /// Mint a credential for the workspace. `Ok(None)` means the
    /// service declined (treated as issuance failure by the caller).
    fn create(
        &self,
        user: &UserRecord,
        workspace: &Workspace,
    ) -> impl Future<Output = CoreResult<Option<String>>> + Send;

    /// Revoke the credential for a workspace kind. Idempotent.
    fn clear(
        &self,
        kind: WorkspaceKind,
        facility_id: Option<Uuid>,
    ) -> impl Future<Output = CoreResult<()>> + Send;

    fn clear_all(&self) -> impl Future<Output = CoreResult<()>> + Send;
}

/// Local persistence for the last confirmed workspace selection.
/// Implementations apply the configured expiry on read.
pub trait SnapshotStore: Send + Sync {
    fn get(&self) -> Option<PersistedSnapshot>;
    fn set(&self, workspace: &Workspace);
    fn clear(&self);
}

/// The host application's navigation surface.
pub trait Router: Send + Sync {
    fn current_path(&self) -> String;
    fn current_query(&self) -> HashMap<String, String>;
    fn navigate(&self, path: &str, replace: bool);
}

// Shared handles: every contract is usable through an `Arc`, so the
// engine and the host application can hold the same collaborator.

impl<T: UserRecordSource> UserRecordSource for Arc<T> {
    fn subscribe(
        &self,
        uid: Uuid,
    ) -> impl Future<Output = CoreResult<mpsc::Receiver<UserCore>>> + Send {
        T::subscribe(self, uid)
    }

    fn get_once(&self, uid: Uuid) -> impl Future<Output = CoreResult<UserCore>> + Send {
        T::get_once(self, uid)
    }

    fn create(&self, defaults: UserCore) -> impl Future<Output = CoreResult<()>> + Send {
        T::create(self, defaults)
    }

    fn update_assignments(
        &self,
        uid: Uuid,
        assignments: Vec<RoleAssignment>,
    ) -> impl Future<Output = CoreResult<()>> + Send {
        T::update_assignments(self, uid, assignments)
    }
}

impl<T: ProfileSource> ProfileSource for Arc<T> {
    fn subscribe(
        &self,
        uid: Uuid,
        kind: ProfileKind,
    ) -> impl Future<Output = CoreResult<mpsc::Receiver<ProfileExtension>>> + Send {
        T::subscribe(self, uid, kind)
    }

    fn get_once(
        &self,
        uid: Uuid,
        kind: ProfileKind,
    ) -> impl Future<Output = CoreResult<Option<ProfileExtension>>> + Send {
        T::get_once(self, uid, kind)
    }
}

impl<T: AdminExtensionSource> AdminExtensionSource for Arc<T> {
    fn get_once(
        &self,
        uid: Uuid,
    ) -> impl Future<Output = CoreResult<Option<AdminExtension>>> + Send {
        T::get_once(self, uid)
    }
}

impl<T: FacilitySource> FacilitySource for Arc<T> {
    fn get_once(
        &self,
        facility_id: Uuid,
    ) -> impl Future<Output = CoreResult<Option<FacilityRecord>>> + Send {
        T::get_once(self, facility_id)
    }

    fn remove_member(
        &self,
        facility_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = CoreResult<()>> + Send {
        T::remove_member(self, facility_id, user_id)
    }
}

impl<T: SessionTokenService> SessionTokenService for Arc<T> {
    fn create(
        &self,
        user: &UserRecord,
        workspace: &Workspace,
    ) -> impl Future<Output = CoreResult<Option<String>>> + Send {
        T::create(self, user, workspace)
    }

    fn clear(
        &self,
        kind: WorkspaceKind,
        facility_id: Option<Uuid>,
    ) -> impl Future<Output = CoreResult<()>> + Send {
        T::clear(self, kind, facility_id)
    }

    fn clear_all(&self) -> impl Future<Output = CoreResult<()>> + Send {
        T::clear_all(self)
    }
}

impl<T: SnapshotStore> SnapshotStore for Arc<T> {
    fn get(&self) -> Option<PersistedSnapshot> {
        T::get(self)
    }

    fn set(&self, workspace: &Workspace) {
        T::set(self, workspace)
    }

    fn clear(&self) {
        T::clear(self)
    }
}

impl<T: Router> Router for Arc<T> {
    fn current_path(&self) -> String {
        T::current_path(self)
    }

    fn current_query(&self) -> HashMap<String, String> {
        T::current_query(self)
    }

    fn navigate(&self, path: &str, replace: bool) {
        T::navigate(self, path, replace)
    }
}
