//! Shiftspace DB — SurrealDB connection management and remote source
//! implementations.
//!
//! This crate provides:
//! - Connection management ([`DbConfig`], [`DbManager`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - SurrealDB implementations of the `shiftspace-core` source traits
//!   ([`sources`])

mod connection;
mod error;
mod schema;
pub mod sources;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
