//! The workspace resolver — a pure transition function.
//!
//! Reconciliation takes the current world (user record, navigation
//! path, persisted snapshot, current selection) and produces the next
//! state plus the effects to execute and the signals to surface. The
//! function itself performs no I/O; the engine executes the effects
//! sequentially afterwards. Rules short-circuit in a fixed order:
//!
//! 1. no user record → `Uninitialized`, selection cleared
//! 2. admin requested but extension unknown → `AwaitingAdminData`,
//!    selection kept
//! 3. enumerate; empty set → `Empty` (snapshot cleared, onboarding
//!    signalled, **no navigation** — the explicit guard against
//!    redirect loops between onboarding and dashboard routes)
//! 4. path-encoded workspace that is enumerated → select it
//! 5. current selection still enumerated → keep it (stability bias)
//! 6. snapshot id enumerated → select it, refresh the snapshot
//! 7. admin user with an admin workspace → select it
//! 8. primary workspace

use std::collections::HashMap;

use shiftspace_core::enumerate::{enumerate, primary_workspace};
use shiftspace_core::models::snapshot::PersistedSnapshot;
use shiftspace_core::models::user::UserRecord;
use shiftspace_core::models::workspace::{Workspace, WorkspaceKind};
use shiftspace_core::routes;
use uuid::Uuid;

use crate::signal::Signal;

/// Resolver states.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverState {
    Uninitialized,
    Stable(Workspace),
    /// No workspace selectable.
    Empty,
    /// The path requests the admin workspace but the admin extension
    /// has not been loaded yet; resolution is deferred.
    AwaitingAdminData,
}

/// Everything a reconciliation pass reads. Borrowed — the pass never
/// mutates its inputs.
pub struct ReconcileInput<'a> {
    pub user: Option<&'a UserRecord>,
    /// Whether the admin extension fetch has completed this session.
    pub admin_fetched: bool,
    pub path: &'a str,
    pub query: &'a HashMap<String, String>,
    pub snapshot: Option<&'a PersistedSnapshot>,
    pub selection: Option<&'a Workspace>,
}

/// Side effects requested by a reconciliation pass, executed by the
/// engine in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RevokeToken {
        kind: WorkspaceKind,
        facility_id: Option<Uuid>,
    },
    IssueToken(Workspace),
    PersistSnapshot(Workspace),
    ClearSnapshot,
    Navigate {
        path: String,
        replace: bool,
    },
}

/// The outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub state: ResolverState,
    pub selection: Option<Workspace>,
    pub effects: Vec<Effect>,
    pub signals: Vec<Signal>,
}

impl Resolution {
    fn keep(workspace: Workspace) -> Self {
        Resolution {
            selection: Some(workspace.clone()),
            state: ResolverState::Stable(workspace),
            effects: Vec::new(),
            signals: Vec::new(),
        }
    }
}

/// Run one reconciliation pass.
pub fn resolve(input: ReconcileInput<'_>) -> Resolution {
    // 1. Nothing loaded yet.
    let Some(user) = input.user else {
        return Resolution {
            state: ResolverState::Uninitialized,
            selection: None,
            effects: Vec::new(),
            signals: Vec::new(),
        };
    };

    // 2. Admin requested, extension not yet known — defer without
    //    clearing the existing selection.
    if routes::requests_admin(input.path, input.query)
        && user.admin.is_none()
        && !input.admin_fetched
    {
        return Resolution {
            state: ResolverState::AwaitingAdminData,
            selection: input.selection.cloned(),
            effects: Vec::new(),
            signals: Vec::new(),
        };
    }

    // 3.
    let enumerated = enumerate(user);

    if enumerated.is_empty() {
        return resolve_empty(user, input.selection);
    }

    // 4. An enumerated workspace encoded in the path always wins.
    if let Some(id) = routes::workspace_id_in_path(input.path) {
        if let Some(target) = enumerated.iter().find(|w| w.id == id) {
            if input.selection.is_some_and(|sel| sel.id == target.id) {
                return Resolution::keep(target.clone());
            }
            return commit(input.selection, target.clone(), input.path);
        }
    }

    // 5. Stability bias: an unrelated pass never moves a valid
    //    selection.
    if let Some(sel) = input.selection {
        if enumerated.iter().any(|w| w.id == sel.id) {
            return Resolution::keep(sel.clone());
        }
    }

    // 6. The snapshot is trusted only while its id is enumerated.
    if let Some(snap) = input.snapshot {
        if let Some(target) = enumerated.iter().find(|w| w.id == snap.id) {
            return commit(input.selection, target.clone(), input.path);
        }
    }

    // 7. Administrators default to the admin workspace.
    if user.is_admin() {
        if let Some(admin_ws) = enumerated.iter().find(|w| w.kind == WorkspaceKind::Admin) {
            return commit(input.selection, admin_ws.clone(), input.path);
        }
    }

    // 8.
    match primary_workspace(user, &enumerated) {
        Some(target) => commit(input.selection, target, input.path),
        None => resolve_empty(user, input.selection),
    }
}

fn resolve_empty(user: &UserRecord, selection: Option<&Workspace>) -> Resolution {
    let mut effects = Vec::new();
    if let Some(prev) = selection {
        effects.push(Effect::RevokeToken {
            kind: prev.kind,
            facility_id: prev.facility_id,
        });
    }
    effects.push(Effect::ClearSnapshot);

    let mut signals = Vec::new();
    if !user.is_admin() && !user.onboarding_complete() {
        signals.push(Signal::NeedsOnboarding(user.onboarding_kind()));
    }

    // Deliberately no Navigate effect here, even inside the dashboard
    // area — the UI decides how to route an onboarding-incomplete user.
    Resolution {
        state: ResolverState::Empty,
        selection: None,
        effects,
        signals,
    }
}

fn commit(prev: Option<&Workspace>, target: Workspace, path: &str) -> Resolution {
    let mut effects = Vec::new();
    if let Some(prev) = prev {
        effects.push(Effect::RevokeToken {
            kind: prev.kind,
            facility_id: prev.facility_id,
        });
    }
    effects.push(Effect::IssueToken(target.clone()));
    effects.push(Effect::PersistSnapshot(target.clone()));
    if let Some(nav) = navigation_for(prev, &target, path) {
        effects.push(nav);
    }

    Resolution {
        selection: Some(target.clone()),
        state: ResolverState::Stable(target),
        effects,
        signals: Vec::new(),
    }
}

/// The navigation side effect of a selection change: rebase the current
/// dashboard sub-path onto the new workspace when it is valid there,
/// otherwise land on the new kind's default route. Leaving the admin
/// workspace always forces the default route. Paths outside the
/// dashboard area are never touched.
pub fn navigation_for(
    prev: Option<&Workspace>,
    target: &Workspace,
    path: &str,
) -> Option<Effect> {
    if !routes::is_dashboard_path(path) {
        return None;
    }

    let leaving_admin =
        prev.is_some_and(|p| p.kind == WorkspaceKind::Admin) && target.kind != WorkspaceKind::Admin;
    let sub = routes::sub_path(path).unwrap_or_default();
    let sub = if !leaving_admin && routes::is_sub_path_valid_for(&sub, target.kind) {
        sub
    } else {
        routes::default_sub_path(target.kind).to_string()
    };

    let prefix = routes::path_prefix(path);
    let dest = format!("{prefix}{}", routes::build_dashboard_path(&sub, &target.id));
    if dest == path {
        None
    } else {
        Some(Effect::Navigate {
            path: dest,
            replace: true,
        })
    }
}
