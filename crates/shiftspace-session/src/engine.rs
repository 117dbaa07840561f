//! The session engine — owns the resolver state for one signed-in
//! session and executes its effects.
//!
//! One engine instance is constructed at sign-in and torn down at
//! sign-out; consumers receive it by reference, never through ambient
//! global state. All triggers (record updates, path changes, sign-out)
//! funnel through [`SessionEngine::dispatch`], the single ingress of
//! the state machine. Re-entrancy is prevented structurally: the
//! selection digest skips passes for irrelevant record changes, and
//! the resolver's stability bias produces zero effects when nothing
//! moved.

use shiftspace_core::digest::selection_digest;
use shiftspace_core::enumerate::enumerate;
use shiftspace_core::error::CoreResult;
use shiftspace_core::models::user::{ProfileExtension, ProfileKind, UserCore};
use shiftspace_core::models::workspace::{Workspace, WorkspaceKind};
use shiftspace_core::routes;
use shiftspace_core::sources::{
    AdminExtensionSource, FacilitySource, ProfileSource, Router, SessionTokenService,
    SnapshotStore, UserRecordSource,
};
use tracing::{debug, warn};

use crate::error::SwitchError;
use crate::loader::{AuthIdentity, UserRecordLoader};
use crate::resolver::{Effect, ReconcileInput, Resolution, ResolverState, navigation_for, resolve};
use crate::signal::Signal;

/// Reconciliation triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The merged user record changed (core, profile, or admin
    /// sub-record).
    UserRecordChanged,
    /// The navigation path or query changed.
    PathChanged,
    /// The user signed out.
    SignedOut,
}

/// The workspace resolution and session engine.
pub struct SessionEngine<U, P, A, F, T, S, R> {
    pub(crate) loader: UserRecordLoader<U, P, A>,
    pub(crate) facilities: F,
    pub(crate) tokens: T,
    pub(crate) snapshots: S,
    pub(crate) router: R,
    pub(crate) state: ResolverState,
    pub(crate) selection: Option<Workspace>,
    pub(crate) workspaces: Vec<Workspace>,
    pub(crate) last_digest: Option<String>,
    pub(crate) ready: bool,
}

impl<U, P, A, F, T, S, R> SessionEngine<U, P, A, F, T, S, R>
where
    U: UserRecordSource,
    P: ProfileSource,
    A: AdminExtensionSource,
    F: FacilitySource,
    T: SessionTokenService,
    S: SnapshotStore,
    R: Router,
{
    pub fn new(
        loader: UserRecordLoader<U, P, A>,
        facilities: F,
        tokens: T,
        snapshots: S,
        router: R,
    ) -> Self {
        Self {
            loader,
            facilities,
            tokens,
            snapshots,
            router,
            state: ResolverState::Uninitialized,
            selection: None,
            workspaces: Vec::new(),
            last_digest: None,
            ready: false,
        }
    }

    /// The currently active workspace, if any.
    pub fn selection(&self) -> Option<&Workspace> {
        self.selection.as_ref()
    }

    /// The workspaces enumerated on the last reconciliation pass.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// Whether the initial load has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The profile kind matching the active workspace, for hosts
    /// (re-)subscribing to the profile extension stream.
    pub fn active_profile_kind(&self) -> ProfileKind {
        self.selection
            .as_ref()
            .map(|w| ProfileKind::for_workspace(w.kind))
            .unwrap_or(ProfileKind::Professional)
    }

    pub fn record(&self) -> Option<&shiftspace_core::models::user::UserRecord> {
        self.loader.record()
    }

    /// Load the user record for an authenticated identity and run the
    /// first reconciliation pass.
    pub async fn sign_in(&mut self, identity: AuthIdentity) -> CoreResult<Vec<Signal>> {
        self.loader.load_initial(identity).await?;
        self.ready = true;
        self.dispatch(SessionEvent::UserRecordChanged).await
    }

    /// Tear down all session state: selection, snapshot, tokens.
    pub async fn sign_out(&mut self) {
        if let Err(e) = self.tokens.clear_all().await {
            warn!(error = %e, "session token teardown failed");
        }
        self.snapshots.clear();
        self.loader.reset();
        self.selection = None;
        self.workspaces.clear();
        self.state = ResolverState::Uninitialized;
        self.last_digest = None;
        self.ready = false;
    }

    /// Deliver a user-core update from the reactive subscription.
    pub async fn handle_core_update(&mut self, core: UserCore) -> CoreResult<Vec<Signal>> {
        self.loader.apply_core(core);
        self.dispatch(SessionEvent::UserRecordChanged).await
    }

    /// Deliver a profile-extension update from the reactive
    /// subscription.
    pub async fn handle_profile_update(
        &mut self,
        profile: ProfileExtension,
    ) -> CoreResult<Vec<Signal>> {
        self.loader.apply_profile(profile);
        self.dispatch(SessionEvent::UserRecordChanged).await
    }

    /// Notify the engine that the navigation path changed.
    pub async fn handle_path_change(&mut self) -> CoreResult<Vec<Signal>> {
        self.dispatch(SessionEvent::PathChanged).await
    }

    /// Single ingress of the state machine.
    pub async fn dispatch(&mut self, event: SessionEvent) -> CoreResult<Vec<Signal>> {
        match event {
            SessionEvent::UserRecordChanged => {
                if let Some(user) = self.loader.record() {
                    let digest = selection_digest(user);
                    if self.last_digest.as_deref() == Some(digest.as_str()) {
                        debug!("selection digest unchanged, skipping reconciliation");
                        return Ok(Vec::new());
                    }
                }
                self.reconcile(true).await
            }
            SessionEvent::PathChanged => self.reconcile(false).await,
            SessionEvent::SignedOut => {
                self.sign_out().await;
                Ok(Vec::new())
            }
        }
    }

    async fn reconcile(&mut self, record_changed: bool) -> CoreResult<Vec<Signal>> {
        let path = self.router.current_path();
        let query = self.router.current_query();

        // Lazy admin-extension load: only when the path explicitly
        // asks for the admin area and the extension is still unknown.
        if routes::requests_admin(&path, &query)
            && !self.loader.admin_fetched()
            && self.loader.record().is_some()
        {
            if let Err(e) = self.loader.ensure_admin().await {
                warn!(error = %e, "admin extension fetch failed, deferring resolution");
            }
        }

        let snapshot = self.snapshots.get();
        let resolution = resolve(ReconcileInput {
            user: self.loader.record(),
            admin_fetched: self.loader.admin_fetched(),
            path: &path,
            query: &query,
            snapshot: snapshot.as_ref(),
            selection: self.selection.as_ref(),
        });

        self.apply_resolution(resolution, record_changed).await
    }

    async fn apply_resolution(
        &mut self,
        resolution: Resolution,
        record_changed: bool,
    ) -> CoreResult<Vec<Signal>> {
        self.state = resolution.state;
        self.selection = resolution.selection;
        self.workspaces = self.loader.record().map(enumerate).unwrap_or_default();

        self.execute_effects(resolution.effects).await;

        // The digest marks the record as fully processed; a deferred
        // pass must reconcile again when the record next changes.
        if record_changed && self.state != ResolverState::AwaitingAdminData {
            self.last_digest = self.loader.record().map(selection_digest);
        }

        Ok(resolution.signals)
    }

    /// Execute resolver effects in order. Token failures during an
    /// auto-selection pass are non-fatal — the selection stands and
    /// the failure is logged.
    async fn execute_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RevokeToken { kind, facility_id } => {
                    if let Err(e) = self.tokens.clear(kind, facility_id).await {
                        warn!(%kind, error = %e, "session token revocation failed");
                    }
                }
                Effect::IssueToken(workspace) => {
                    let Some(user) = self.loader.record() else {
                        continue;
                    };
                    match self.tokens.create(user, &workspace).await {
                        Ok(Some(_)) => {}
                        Ok(None) => {
                            warn!(workspace = %workspace.id, "token service declined issuance")
                        }
                        Err(e) => {
                            warn!(workspace = %workspace.id, error = %e, "session token issuance failed")
                        }
                    }
                }
                Effect::PersistSnapshot(workspace) => self.snapshots.set(&workspace),
                Effect::ClearSnapshot => self.snapshots.clear(),
                Effect::Navigate { path, replace } => self.router.navigate(&path, replace),
            }
        }
    }

    /// Explicitly switch to a workspace.
    ///
    /// Every step is a hard precondition: a failure aborts the switch
    /// with the previous selection untouched.
    pub async fn switch_workspace(&mut self, target: Workspace) -> Result<(), SwitchError> {
        if target.id.kind() != target.kind || target.facility_id != target.id.facility_id() {
            return Err(SwitchError::InvalidTarget {
                message: format!("kind {} does not match id {}", target.kind, target.id),
            });
        }

        let user = self.loader.record().ok_or(SwitchError::NoUser)?;

        // 1. Onboarding gates for non-admins. Admins bypass these but
        //    never the existence check below.
        if !user.is_admin() {
            match target.kind {
                WorkspaceKind::Personal if !user.core.has_professional_profile => {
                    return Err(SwitchError::NeedsOnboarding(ProfileKind::Professional));
                }
                WorkspaceKind::Team
                    if target.facility_id == Some(user.uid())
                        && !user.core.has_facility_profile =>
                {
                    return Err(SwitchError::NeedsOnboarding(ProfileKind::Facility));
                }
                _ => {}
            }
        }

        // 2. Team targets: the backing facility record must exist.
        let mut target = target;
        if let Some(fid) = target.facility_id {
            match self.facilities.get_once(fid).await? {
                Some(facility) => {
                    target.name = facility.name.clone();
                    if target.roles.is_empty() {
                        if let Some(member) = facility.member(user.uid()) {
                            target.roles = member.roles.clone();
                        }
                    }
                }
                None => return Err(SwitchError::FacilityMissing(target)),
            }
        }

        // 3. Revoke the previous workspace's token (idempotent).
        if let Some(prev) = &self.selection {
            self.tokens
                .clear(prev.kind, prev.facility_id)
                .await
                .map_err(SwitchError::Core)?;
        }

        // 4. Issue the new token. For team targets an issuance failure
        //    is indistinguishable from a missing facility to the user,
        //    so it is folded into FacilityMissing.
        match self.tokens.create(user, &target).await {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => {
                if target.kind == WorkspaceKind::Team {
                    return Err(SwitchError::FacilityMissing(target));
                }
                return Err(SwitchError::SessionCreation { kind: target.kind });
            }
        }

        // 5. Commit.
        let prev = self.selection.take();
        self.selection = Some(target.clone());
        self.state = ResolverState::Stable(target.clone());
        self.snapshots.set(&target);

        // 6. Navigate.
        let path = self.router.current_path();
        if let Some(Effect::Navigate { path, replace }) =
            navigation_for(prev.as_ref(), &target, &path)
        {
            self.router.navigate(&path, replace);
        }

        Ok(())
    }
}
