//! Domain models for shiftspace.
//!
//! These are the core types shared across all crates. The user record
//! is deliberately split into disjoint sub-records (core / profile
//! extension / admin extension) so that independently-delivered remote
//! updates cannot overwrite each other's fields.

pub mod facility;
pub mod snapshot;
pub mod user;
pub mod workspace;
