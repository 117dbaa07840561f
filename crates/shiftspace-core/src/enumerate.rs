//! Workspace enumeration.
//!
//! The single place that turns a user record into the set of
//! workspaces the user may select. All access decisions elsewhere go
//! through this module — callers must not re-derive availability from
//! roles or profile flags directly.

use crate::models::user::UserRecord;
use crate::models::workspace::Workspace;

/// Compute all workspaces the user may currently select.
///
/// Rules:
/// - Personal iff a professional profile document exists.
/// - One team workspace per distinct facility id in the role
///   assignments. No existence check here — facility existence is
///   validated lazily when a team workspace is actually selected.
/// - Admin iff an active admin extension is present.
///
/// The order (Personal, teams in assignment order, Admin) is stable for
/// equal inputs so digest-based memoization can compare outputs.
pub fn enumerate(user: &UserRecord) -> Vec<Workspace> {
    let mut workspaces = Vec::new();

    if user.core.has_professional_profile {
        workspaces.push(Workspace::personal());
    }

    for facility_id in user.core.facility_ids() {
        workspaces.push(Workspace::team(
            facility_id,
            user.core.roles_in_facility(facility_id),
        ));
    }

    if user.is_admin() {
        workspaces.push(Workspace::admin());
    }

    workspaces
}

/// The default workspace when neither path nor snapshot determines one:
/// prefer a team workspace if any assignment carries a facility id,
/// else Personal if a professional profile exists, else Admin, else the
/// first enumerated workspace.
pub fn primary_workspace(user: &UserRecord, enumerated: &[Workspace]) -> Option<Workspace> {
    if user.core.assignments.iter().any(|a| a.facility_id.is_some()) {
        if let Some(team) = enumerated
            .iter()
            .find(|w| w.kind == crate::models::workspace::WorkspaceKind::Team)
        {
            return Some(team.clone());
        }
    }

    if user.core.has_professional_profile {
        if let Some(personal) = enumerated
            .iter()
            .find(|w| w.kind == crate::models::workspace::WorkspaceKind::Personal)
        {
            return Some(personal.clone());
        }
    }

    if let Some(admin) = enumerated
        .iter()
        .find(|w| w.kind == crate::models::workspace::WorkspaceKind::Admin)
    {
        return Some(admin.clone());
    }

    enumerated.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{
        AdminExtension, FacilityRole, RoleAssignment, UserCore, UserRecord,
    };
    use crate::models::workspace::{WorkspaceId, WorkspaceKind};
    use chrono::Utc;
    use uuid::Uuid;

    fn record() -> UserRecord {
        UserRecord {
            core: UserCore::minimal(Uuid::new_v4(), "u@example.com"),
            profile: None,
            admin: None,
        }
    }

    fn active_admin() -> AdminExtension {
        AdminExtension {
            is_active: true,
            roles: vec!["super_admin".into()],
            rights: vec![],
            granted_at: Utc::now(),
        }
    }

    #[test]
    fn empty_record_enumerates_nothing() {
        assert!(enumerate(&record()).is_empty());
    }

    #[test]
    fn professional_profile_yields_personal() {
        let mut user = record();
        user.core.has_professional_profile = true;
        let ws = enumerate(&user);
        assert_eq!(ws.len(), 1);
        assert_eq!(ws[0].id, WorkspaceId::Personal);
    }

    #[test]
    fn one_team_per_distinct_facility() {
        let f1 = Uuid::new_v4();
        let f2 = Uuid::new_v4();
        let mut user = record();
        user.core.assignments = vec![
            RoleAssignment {
                facility_id: Some(f1),
                roles: vec![FacilityRole::Admin],
            },
            RoleAssignment {
                facility_id: Some(f2),
                roles: vec![FacilityRole::Employee],
            },
            RoleAssignment {
                facility_id: Some(f1),
                roles: vec![FacilityRole::Scheduler],
            },
        ];
        let ws = enumerate(&user);
        assert_eq!(ws.len(), 2);
        assert_eq!(ws[0].id, WorkspaceId::Team(f1));
        assert_eq!(
            ws[0].roles,
            vec![FacilityRole::Admin, FacilityRole::Scheduler]
        );
        assert_eq!(ws[1].id, WorkspaceId::Team(f2));
    }

    #[test]
    fn inactive_admin_is_excluded() {
        let mut user = record();
        user.admin = Some(AdminExtension {
            is_active: false,
            ..active_admin()
        });
        assert!(enumerate(&user).is_empty());

        user.admin = Some(active_admin());
        let ws = enumerate(&user);
        assert_eq!(ws.len(), 1);
        assert_eq!(ws[0].id, WorkspaceId::Admin);
    }

    #[test]
    fn enumeration_order_is_stable() {
        let f1 = Uuid::new_v4();
        let mut user = record();
        user.core.has_professional_profile = true;
        user.core.assignments = vec![RoleAssignment {
            facility_id: Some(f1),
            roles: vec![FacilityRole::Employee],
        }];
        user.admin = Some(active_admin());

        let first = enumerate(&user);
        let second = enumerate(&user);
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|w| w.kind).collect::<Vec<_>>(),
            vec![
                WorkspaceKind::Personal,
                WorkspaceKind::Team,
                WorkspaceKind::Admin
            ]
        );
    }

    #[test]
    fn primary_prefers_team_then_personal_then_admin() {
        let f1 = Uuid::new_v4();
        let mut user = record();
        user.core.has_professional_profile = true;
        user.core.assignments = vec![RoleAssignment {
            facility_id: Some(f1),
            roles: vec![FacilityRole::Employee],
        }];
        user.admin = Some(active_admin());

        let enumerated = enumerate(&user);
        let primary = primary_workspace(&user, &enumerated).unwrap();
        assert_eq!(primary.id, WorkspaceId::Team(f1));

        user.core.assignments.clear();
        let enumerated = enumerate(&user);
        let primary = primary_workspace(&user, &enumerated).unwrap();
        assert_eq!(primary.id, WorkspaceId::Personal);

        user.core.has_professional_profile = false;
        let enumerated = enumerate(&user);
        let primary = primary_workspace(&user, &enumerated).unwrap();
        assert_eq!(primary.id, WorkspaceId::Admin);
    }

    #[test]
    fn primary_of_empty_set_is_none() {
        let user = record();
        assert!(primary_workspace(&user, &[]).is_none());
    }
}
