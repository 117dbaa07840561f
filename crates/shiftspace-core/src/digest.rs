//! Selection digest — the memoization guard for reconciliation.
//!
//! The digest covers exactly the user-record fields that influence
//! workspace enumeration or selection precedence. The resolver skips a
//! reconciliation pass when the digest is unchanged, which is what
//! keeps unrelated record mutations (tutorial progress, contact edits)
//! from re-triggering resolution.

use sha2::{Digest, Sha256};

use crate::models::user::UserRecord;

/// SHA-256 (hex) over the selection-relevant subset of the record:
/// uid, primary role, profile-existence flags, sorted assignment
/// facility ids, admin roles, and admin activation.
pub fn selection_digest(user: &UserRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(user.core.uid.as_bytes());
    hasher.update([match user.core.role {
        crate::models::user::UserRole::Professional => 0u8,
        crate::models::user::UserRole::Facility => 1u8,
    }]);
    hasher.update([
        user.core.has_professional_profile as u8,
        user.core.has_facility_profile as u8,
    ]);

    let mut facility_ids = user.core.facility_ids();
    facility_ids.sort();
    for fid in facility_ids {
        hasher.update(fid.as_bytes());
    }

    match &user.admin {
        Some(admin) => {
            hasher.update([1u8, admin.is_active as u8]);
            for role in &admin.roles {
                hasher.update(role.as_bytes());
                hasher.update([0u8]);
            }
        }
        None => hasher.update([0u8]),
    }

    hex::encode(hasher.finalize())
}
