//! Dashboard route helpers.
//!
//! Paths look like `[/<prefix>]/dashboard/<workspace>/<sub-path>` where
//! `<workspace>` is `personal`, `admin`, or a bare facility uuid, and
//! the optional prefix (e.g. a locale segment) is preserved when a path
//! is rebased onto another workspace.

use std::collections::HashMap;

use crate::models::workspace::{WorkspaceId, WorkspaceKind};

pub const DASHBOARD_SEGMENT: &str = "dashboard";

/// Sub-path first segments valid inside personal and team workspaces.
pub const VALID_DASHBOARD_ROUTES: &[&str] = &[
    "overview",
    "calendar",
    "profile",
    "communications",
    "entity",
    "marketplace",
    "support",
];

/// Sub-path first segments valid inside the admin workspace only.
pub const ADMIN_DASHBOARD_ROUTES: &[&str] = &["portal", "crm", "analytics"];

/// Static destination of the recovery flow's "contact admin" resolution.
pub const CONTACT_ROUTE: &str = "/contact";

/// Query key that can request a workspace explicitly (`?workspace=admin`).
pub const WORKSPACE_QUERY_KEY: &str = "workspace";

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn dashboard_index(segs: &[&str]) -> Option<usize> {
    segs.iter().position(|s| *s == DASHBOARD_SEGMENT)
}

/// Whether the path is inside the dashboard area at all.
pub fn is_dashboard_path(path: &str) -> bool {
    dashboard_index(&segments(path)).is_some()
}

/// The workspace id encoded in the path, if any.
pub fn workspace_id_in_path(path: &str) -> Option<WorkspaceId> {
    let segs = segments(path);
    let idx = dashboard_index(&segs)?;
    segs.get(idx + 1)
        .and_then(|seg| WorkspaceId::from_url_segment(seg))
}

/// The relative sub-path after the workspace segment (or directly after
/// `dashboard` when the path carries no workspace segment). `None` when
/// the path is outside the dashboard area.
pub fn sub_path(path: &str) -> Option<String> {
    let segs = segments(path);
    let idx = dashboard_index(&segs)?;
    let after = match segs.get(idx + 1) {
        Some(seg) if WorkspaceId::from_url_segment(seg).is_some() => idx + 2,
        _ => idx + 1,
    };
    Some(segs[after..].join("/"))
}

/// Segments before `dashboard`, kept when rebasing (e.g. `/en`).
pub fn path_prefix(path: &str) -> String {
    let segs = segments(path);
    match dashboard_index(&segs) {
        Some(idx) if idx > 0 => format!("/{}", segs[..idx].join("/")),
        _ => String::new(),
    }
}

/// The default landing sub-path for a workspace kind.
pub fn default_sub_path(kind: WorkspaceKind) -> &'static str {
    match kind {
        WorkspaceKind::Admin => "portal",
        _ => "overview",
    }
}

/// Whether a relative sub-path is servable inside a workspace of the
/// given kind. Admin-only sub-paths are never valid elsewhere, and
/// regular dashboard routes are not part of the admin area.
pub fn is_sub_path_valid_for(sub: &str, kind: WorkspaceKind) -> bool {
    let Some(first) = sub.split('/').find(|s| !s.is_empty()) else {
        return false;
    };
    match kind {
        WorkspaceKind::Admin => ADMIN_DASHBOARD_ROUTES.contains(&first),
        _ => VALID_DASHBOARD_ROUTES.contains(&first),
    }
}

/// Build `/dashboard/<workspace>/<sub>`.
pub fn build_dashboard_path(sub: &str, id: &WorkspaceId) -> String {
    let trimmed = sub.trim_matches('/');
    if trimmed.is_empty() {
        format!("/{}/{}", DASHBOARD_SEGMENT, id.url_segment())
    } else {
        format!("/{}/{}/{trimmed}", DASHBOARD_SEGMENT, id.url_segment())
    }
}

/// Whether the path or query explicitly requests the admin workspace.
pub fn requests_admin(path: &str, query: &HashMap<String, String>) -> bool {
    if matches!(workspace_id_in_path(path), Some(WorkspaceId::Admin)) {
        return true;
    }
    query
        .get(WORKSPACE_QUERY_KEY)
        .is_some_and(|v| v == "admin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn workspace_id_extraction() {
        let fid = Uuid::new_v4();
        assert_eq!(
            workspace_id_in_path("/dashboard/personal/calendar"),
            Some(WorkspaceId::Personal)
        );
        assert_eq!(
            workspace_id_in_path(&format!("/en/dashboard/{fid}/overview")),
            Some(WorkspaceId::Team(fid))
        );
        assert_eq!(workspace_id_in_path("/dashboard/overview"), None);
        assert_eq!(workspace_id_in_path("/pricing"), None);
    }

    #[test]
    fn sub_path_with_and_without_workspace_segment() {
        assert_eq!(
            sub_path("/dashboard/personal/calendar/week").as_deref(),
            Some("calendar/week")
        );
        assert_eq!(sub_path("/dashboard/overview").as_deref(), Some("overview"));
        assert_eq!(sub_path("/dashboard/personal").as_deref(), Some(""));
        assert_eq!(sub_path("/pricing"), None);
    }

    #[test]
    fn prefix_is_preserved() {
        assert_eq!(path_prefix("/en/dashboard/personal"), "/en");
        assert_eq!(path_prefix("/dashboard/personal"), "");
    }

    #[test]
    fn sub_path_validity_per_kind() {
        assert!(is_sub_path_valid_for("calendar", WorkspaceKind::Personal));
        assert!(is_sub_path_valid_for(
            "calendar/week",
            WorkspaceKind::Team
        ));
        assert!(!is_sub_path_valid_for("portal", WorkspaceKind::Personal));
        assert!(is_sub_path_valid_for("portal", WorkspaceKind::Admin));
        assert!(!is_sub_path_valid_for("calendar", WorkspaceKind::Admin));
        assert!(!is_sub_path_valid_for("", WorkspaceKind::Personal));
        assert!(!is_sub_path_valid_for("bogus", WorkspaceKind::Personal));
    }

    #[test]
    fn build_path() {
        let fid = Uuid::new_v4();
        assert_eq!(
            build_dashboard_path("overview", &WorkspaceId::Team(fid)),
            format!("/dashboard/{fid}/overview")
        );
        assert_eq!(
            build_dashboard_path("", &WorkspaceId::Personal),
            "/dashboard/personal"
        );
        assert_eq!(
            build_dashboard_path("/portal/", &WorkspaceId::Admin),
            "/dashboard/admin/portal"
        );
    }

    #[test]
    fn admin_request_detection() {
        let empty = HashMap::new();
        assert!(requests_admin("/dashboard/admin/portal", &empty));
        assert!(!requests_admin("/dashboard/personal", &empty));

        let mut query = HashMap::new();
        query.insert("workspace".to_string(), "admin".to_string());
        assert!(requests_admin("/dashboard", &query));
    }
}
