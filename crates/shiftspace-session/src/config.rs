//! Session engine configuration.

use std::time::Duration;

/// Configuration for the session engine and its local collaborators.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Timeout for one attempt of the initial user-record fetch
    /// (default: 15 s).
    pub user_fetch_timeout: Duration,
    /// Bounded attempts for the initial user-record fetch (default: 3).
    pub user_fetch_attempts: u32,
    /// Linear backoff between attempts (default: 500 ms, doubled per
    /// attempt number).
    pub user_fetch_backoff: Duration,
    /// Persisted snapshot lifetime in days (default: 30).
    pub snapshot_expiry_days: i64,
    /// Session token lifetime in seconds (default: 3600 = 1 hour).
    pub token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// PEM-encoded Ed25519 private key for token signing. Empty keys
    /// switch the token service to opaque random tokens.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for token verification.
    pub jwt_public_key_pem: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_fetch_timeout: Duration::from_secs(15),
            user_fetch_attempts: 3,
            user_fetch_backoff: Duration::from_millis(500),
            snapshot_expiry_days: 30,
            token_lifetime_secs: 3600,
            jwt_issuer: "shiftspace".into(),
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
        }
    }
}
