//! Shiftspace Core — domain models, collaborator contracts, and the
//! pure workspace computations (enumeration, selection digest, route
//! helpers) shared across all crates.

pub mod digest;
pub mod enumerate;
pub mod error;
pub mod models;
pub mod routes;
pub mod sources;

pub use error::{CoreError, CoreResult};
