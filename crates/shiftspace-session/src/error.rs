//! Session-layer error types.

use shiftspace_core::CoreError;
use shiftspace_core::models::user::ProfileKind;
use shiftspace_core::models::workspace::{Workspace, WorkspaceKind};
use thiserror::Error;

/// Failure modes of an explicit workspace switch. Every variant leaves
/// the previous selection untouched — a switch either commits fully or
/// changes nothing.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("onboarding incomplete: {0} profile required")]
    NeedsOnboarding(ProfileKind),

    #[error("facility record missing for workspace {}", .0.id)]
    FacilityMissing(Workspace),

    #[error("session token creation failed for {kind} workspace")]
    SessionCreation { kind: WorkspaceKind },

    #[error("no user record loaded")]
    NoUser,

    #[error("invalid switch target: {message}")]
    InvalidTarget { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}
