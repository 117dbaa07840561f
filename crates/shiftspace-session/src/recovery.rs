//! Facility recovery flow.
//!
//! Entered when a workspace switch raised
//! [`SwitchError::FacilityMissing`](crate::error::SwitchError): the
//! team workspace's backing facility record is gone. The user picks
//! one of two resolutions; `LeaveFacility` detaches the dead
//! reference from both sides and re-resolves onto a fallback
//! workspace.

use shiftspace_core::error::{CoreError, CoreResult};
use shiftspace_core::models::user::RoleAssignment;
use shiftspace_core::models::workspace::Workspace;
use shiftspace_core::routes;
use shiftspace_core::sources::{
    AdminExtensionSource, FacilitySource, ProfileSource, Router, SessionTokenService,
    SnapshotStore, UserRecordSource,
};
use tracing::{info, warn};

use crate::engine::{SessionEngine, SessionEvent};
use crate::signal::Signal;

/// The two resolutions offered for a missing facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryResolution {
    /// Navigate to the contact page; no state is mutated.
    ContactAdmin,
    /// Detach the dead facility from the user record and the facility
    /// document, then fall back to the primary workspace.
    LeaveFacility,
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
    /// Resolve a `FacilityMissing` condition.
    ///
    /// The two `LeaveFacility` mutations (user-side assignment removal
    /// and facility-side membership removal) are independent and each
    /// is best-effort — a mutation whose target record is already gone
    /// is skipped, not treated as a failure. Afterwards the user
    /// record is force-refreshed and reconciliation picks the fallback
    /// workspace.
    pub async fn resolve_missing_facility(
        &mut self,
        workspace: &Workspace,
        resolution: RecoveryResolution,
    ) -> CoreResult<Vec<Signal>> {
        match resolution {
            RecoveryResolution::ContactAdmin => {
                self.router.navigate(routes::CONTACT_ROUTE, false);
                Ok(Vec::new())
            }
            RecoveryResolution::LeaveFacility => {
                let Some(facility_id) = workspace.facility_id else {
                    return Err(CoreError::Validation {
                        message: format!(
                            "workspace {} has no backing facility to leave",
                            workspace.id
                        ),
                    });
                };
                let user = self.loader.record().ok_or_else(|| {
                    CoreError::Internal("recovery flow entered without a user record".into())
                })?;
                let uid = user.uid();

                info!(%facility_id, "leaving facility with missing record");

                let remaining: Vec<RoleAssignment> = user
                    .core
                    .assignments
                    .iter()
                    .filter(|a| a.facility_id != Some(facility_id))
                    .cloned()
                    .collect();
                if let Err(e) = self
                    .loader
                    .users()
                    .update_assignments(uid, remaining)
                    .await
                {
                    warn!(%facility_id, error = %e, "user-side detach failed, continuing");
                }

                if let Err(e) = self.facilities.remove_member(facility_id, uid).await {
                    warn!(%facility_id, error = %e, "facility-side detach failed, continuing");
                }

                self.loader.refresh().await?;
                // Whatever the remote writes did, this session no
                // longer enumerates the dead workspace.
                self.loader.prune_assignment(facility_id);
                self.last_digest = None;
                self.dispatch(SessionEvent::UserRecordChanged).await
            }
        }
    }
}
