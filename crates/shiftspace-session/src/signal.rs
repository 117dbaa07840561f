//! Signals surfaced to the consuming UI layer.
//!
//! Signals are data, not errors: the engine raises them and carries
//! on. In particular, a signal never clears an existing selection —
//! any navigation in response is a UI decision.

use shiftspace_core::models::user::ProfileKind;
use shiftspace_core::models::workspace::Workspace;

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The user has no selectable workspace because the referenced
    /// profile has not been created yet.
    NeedsOnboarding(ProfileKind),
    /// A team workspace's backing facility record is missing or
    /// inaccessible; the recovery flow should be offered.
    FacilityMissing(Workspace),
}
