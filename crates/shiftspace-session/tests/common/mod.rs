//! Shared in-memory collaborators for the engine integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use shiftspace_core::error::{CoreError, CoreResult};
use shiftspace_core::models::facility::{FacilityMember, FacilityRecord};
use shiftspace_core::models::user::{
    AdminExtension, FacilityRole, ProfileExtension, ProfileKind, ProfileVisibility,
    RoleAssignment, UserCore, UserRecord,
};
use shiftspace_core::models::workspace::Workspace;
use shiftspace_core::sources::{
    AdminExtensionSource, FacilitySource, ProfileSource, SessionTokenService, UserRecordSource,
};
use shiftspace_session::SessionConfig;
use shiftspace_session::engine::SessionEngine;
use shiftspace_session::loader::{AuthIdentity, UserRecordLoader};
use shiftspace_session::router::MemoryRouter;
use shiftspace_session::snapshot::MemorySnapshotStore;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Default)]
pub struct MockUsers {
    pub records: Mutex<HashMap<Uuid, UserCore>>,
    pub fail_update: AtomicBool,
}

impl MockUsers {
    pub fn insert(&self, core: UserCore) {
        self.records.lock().unwrap().insert(core.uid, core);
    }
}

impl UserRecordSource for MockUsers {
    async fn subscribe(&self, _uid: Uuid) -> CoreResult<mpsc::Receiver<UserCore>> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn get_once(&self, uid: Uuid) -> CoreResult<UserCore> {
        self.records
            .lock()
            .unwrap()
            .get(&uid)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "user".into(),
                id: uid.to_string(),
            })
    }

    async fn create(&self, defaults: UserCore) -> CoreResult<()> {
        self.records.lock().unwrap().insert(defaults.uid, defaults);
        Ok(())
    }

    async fn update_assignments(
        &self,
        uid: Uuid,
        assignments: Vec<RoleAssignment>,
    ) -> CoreResult<()> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(CoreError::Store("write rejected".into()));
        }
        let mut records = self.records.lock().unwrap();
        let core = records.get_mut(&uid).ok_or_else(|| CoreError::NotFound {
            entity: "user".into(),
            id: uid.to_string(),
        })?;
        core.assignments = assignments;
        core.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct MockProfiles {
    pub profiles: Mutex<HashMap<(Uuid, ProfileKind), ProfileExtension>>,
}

impl ProfileSource for MockProfiles {
    async fn subscribe(
        &self,
        _uid: Uuid,
        _kind: ProfileKind,
    ) -> CoreResult<mpsc::Receiver<ProfileExtension>> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn get_once(&self, uid: Uuid, kind: ProfileKind) -> CoreResult<Option<ProfileExtension>> {
        Ok(self.profiles.lock().unwrap().get(&(uid, kind)).cloned())
    }
}

#[derive(Default)]
pub struct MockAdmins {
    pub admins: Mutex<HashMap<Uuid, AdminExtension>>,
    pub fail: AtomicBool,
}

impl AdminExtensionSource for MockAdmins {
    async fn get_once(&self, uid: Uuid) -> CoreResult<Option<AdminExtension>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::PermissionDenied {
                reason: "admin lookup denied".into(),
            });
        }
        Ok(self.admins.lock().unwrap().get(&uid).cloned())
    }
}

#[derive(Default)]
pub struct MockFacilities {
    pub facilities: Mutex<HashMap<Uuid, FacilityRecord>>,
}

impl MockFacilities {
    pub fn insert(&self, facility: FacilityRecord) {
        self.facilities.lock().unwrap().insert(facility.id, facility);
    }

    pub fn delete(&self, id: Uuid) {
        self.facilities.lock().unwrap().remove(&id);
    }
}

impl FacilitySource for MockFacilities {
    async fn get_once(&self, facility_id: Uuid) -> CoreResult<Option<FacilityRecord>> {
        Ok(self.facilities.lock().unwrap().get(&facility_id).cloned())
    }

    async fn remove_member(&self, facility_id: Uuid, user_id: Uuid) -> CoreResult<()> {
        let mut facilities = self.facilities.lock().unwrap();
        // Skipped, not an error, when the record is already gone.
        if let Some(facility) = facilities.get_mut(&facility_id) {
            facility.employees.retain(|m| m.user_id != user_id);
            facility.admins.retain(|a| *a != user_id);
        }
        Ok(())
    }
}

/// Token service that records issuance/revocation and can be switched
/// into a failing mode.
#[derive(Default)]
pub struct MockTokens {
    pub active: Mutex<HashMap<String, String>>,
    pub fail_create: AtomicBool,
    pub created: Mutex<Vec<String>>,
    pub cleared: Mutex<Vec<String>>,
}

fn token_key(
    kind: shiftspace_core::models::workspace::WorkspaceKind,
    facility_id: Option<Uuid>,
) -> String {
    match facility_id {
        Some(fid) => format!("{kind}_{fid}"),
        None => kind.to_string(),
    }
}

impl SessionTokenService for MockTokens {
    async fn create(&self, _user: &UserRecord, workspace: &Workspace) -> CoreResult<Option<String>> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let key = token_key(workspace.kind, workspace.facility_id);
        self.created.lock().unwrap().push(key.clone());
        let token = Uuid::new_v4().to_string();
        self.active.lock().unwrap().insert(key, token.clone());
        Ok(Some(token))
    }

    async fn clear(
        &self,
        kind: shiftspace_core::models::workspace::WorkspaceKind,
        facility_id: Option<Uuid>,
    ) -> CoreResult<()> {
        let key = token_key(kind, facility_id);
        self.cleared.lock().unwrap().push(key.clone());
        self.active.lock().unwrap().remove(&key);
        Ok(())
    }

    async fn clear_all(&self) -> CoreResult<()> {
        self.active.lock().unwrap().clear();
        Ok(())
    }
}

pub type TestEngine = SessionEngine<
    Arc<MockUsers>,
    Arc<MockProfiles>,
    Arc<MockAdmins>,
    Arc<MockFacilities>,
    Arc<MockTokens>,
    Arc<MemorySnapshotStore>,
    Arc<MemoryRouter>,
>;

/// All collaborator handles the tests keep for inspection.
pub struct World {
    pub users: Arc<MockUsers>,
    pub profiles: Arc<MockProfiles>,
    pub admins: Arc<MockAdmins>,
    pub facilities: Arc<MockFacilities>,
    pub tokens: Arc<MockTokens>,
    pub snapshots: Arc<MemorySnapshotStore>,
    pub router: Arc<MemoryRouter>,
}

impl World {
    pub fn new(initial_path: &str) -> Self {
        World {
            users: Arc::new(MockUsers::default()),
            profiles: Arc::new(MockProfiles::default()),
            admins: Arc::new(MockAdmins::default()),
            facilities: Arc::new(MockFacilities::default()),
            tokens: Arc::new(MockTokens::default()),
            snapshots: Arc::new(MemorySnapshotStore::new(30)),
            router: Arc::new(MemoryRouter::new(initial_path)),
        }
    }

    pub fn engine(&self) -> TestEngine {
        let loader = UserRecordLoader::new(
            Arc::clone(&self.users),
            Arc::clone(&self.profiles),
            Arc::clone(&self.admins),
            SessionConfig::default(),
        );
        SessionEngine::new(
            loader,
            Arc::clone(&self.facilities),
            Arc::clone(&self.tokens),
            Arc::clone(&self.snapshots),
            Arc::clone(&self.router),
        )
    }
}

pub fn identity_for(core: &UserCore) -> AuthIdentity {
    AuthIdentity {
        uid: core.uid,
        email: core.email.clone(),
    }
}

pub fn professional_core(uid: Uuid) -> UserCore {
    let mut core = UserCore::minimal(uid, "pro@example.com");
    core.has_professional_profile = true;
    core.onboarding.professional_completed = true;
    core
}

pub fn facility_assignment(fid: Uuid, roles: Vec<FacilityRole>) -> RoleAssignment {
    RoleAssignment {
        facility_id: Some(fid),
        roles,
    }
}

pub fn facility_record(fid: Uuid, name: &str, members: Vec<(Uuid, Vec<FacilityRole>)>) -> FacilityRecord {
    let now = Utc::now();
    FacilityRecord {
        id: fid,
        name: name.into(),
        admins: members
            .iter()
            .filter(|(_, roles)| roles.contains(&FacilityRole::Admin))
            .map(|(uid, _)| *uid)
            .collect(),
        employees: members
            .into_iter()
            .map(|(user_id, roles)| FacilityMember { user_id, roles })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

pub fn admin_extension() -> AdminExtension {
    AdminExtension {
        is_active: true,
        roles: vec!["super_admin".into()],
        rights: vec!["admin.all".into()],
        granted_at: Utc::now(),
    }
}

pub fn profile_extension(kind: ProfileKind) -> ProfileExtension {
    ProfileExtension {
        kind,
        display_name: "Example".into(),
        contact_email: None,
        contact_phone: None,
        visibility: ProfileVisibility::Public,
        completion_percent: 100,
        metadata: serde_json::json!({}),
        updated_at: Utc::now(),
    }
}
